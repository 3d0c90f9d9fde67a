use crate::cli::support::{header, kbsync_in, setup_vault, write_note, FakeKnowledgeBase};
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_sync_uploads_then_skips() {
    let server = FakeKnowledgeBase::start();
    let vault = setup_vault(&server.url);
    write_note(vault.path(), "Note.md", "hello");
    write_note(vault.path(), "projects/Plan.md", "# Plan");

    kbsync_in(vault.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced 2 files, skipped 0"));

    let writes = server.writes();
    assert_eq!(writes.len(), 2);
    assert!(writes
        .iter()
        .all(|r| r.url.path() == "/v1/datasets/ds-1/document/create_by_text"));
    assert_eq!(
        header(&writes[0], "authorization").as_deref(),
        Some("Bearer test-key")
    );

    let ledger: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(vault.path().join("historyContentHash")).unwrap())
            .unwrap();
    assert_eq!(ledger["Note.md"]["hash"], "5e918d2");

    kbsync_in(vault.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced 0 files, skipped 2"));
    assert_eq!(server.writes().len(), 2);
}

#[test]
fn test_sync_updates_existing_remote_document() {
    let server = FakeKnowledgeBase::with_documents(&[("d-42", "Note.md")]);
    let vault = setup_vault(&server.url);
    write_note(vault.path(), "Note.md", "hello");

    kbsync_in(vault.path()).arg("sync").assert().success();

    let writes = server.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(
        writes[0].url.path(),
        "/v1/datasets/ds-1/documents/d-42/update_by_text"
    );
    let body: serde_json::Value = serde_json::from_slice(&writes[0].body).unwrap();
    assert_eq!(body, serde_json::json!({"name": "Note.md", "text": "hello"}));
}

#[test]
fn test_sync_resyncs_edited_document() {
    let server = FakeKnowledgeBase::with_documents(&[("d-1", "Note.md")]);
    let vault = setup_vault(&server.url);
    write_note(vault.path(), "Note.md", "hello");
    kbsync_in(vault.path()).arg("sync").assert().success();

    write_note(vault.path(), "Note.md", "hello again");

    kbsync_in(vault.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced 1 files, skipped 0"));

    let writes = server.writes();
    assert_eq!(writes.len(), 2);
    let body: serde_json::Value = serde_json::from_slice(&writes[1].body).unwrap();
    assert_eq!(body["text"], "hello again");
    assert!(writes[1].url.path().ends_with("/documents/d-1/update_by_text"));
}

#[test]
fn test_sync_failure_is_reported_and_not_recorded() {
    let server = FakeKnowledgeBase::failing_writes(500);
    let vault = setup_vault(&server.url);
    write_note(vault.path(), "Note.md", "hello");

    kbsync_in(vault.path())
        .arg("sync")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("sync failed at Note.md"))
        .stderr(predicate::str::contains("HTTP 500"));

    let ledger = fs::read_to_string(vault.path().join("historyContentHash")).unwrap();
    assert!(!ledger.contains("Note.md"));

    let settings = fs::read_to_string(vault.path().join(".kbsync/config.toml")).unwrap();
    assert!(!settings.contains("last_sync_time"));
}

#[test]
fn test_sync_failure_json_envelope() {
    let server = FakeKnowledgeBase::failing_writes(503);
    let vault = setup_vault(&server.url);
    write_note(vault.path(), "a.md", "a");

    let output = kbsync_in(vault.path())
        .args(["--format", "json", "sync"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(json["error"]["type"], "pass_failed");
    assert_eq!(json["error"]["path"], "a.md");
    assert_eq!(json["error"]["cause"]["type"], "remote_error");
}

#[test]
fn test_sync_respects_scope_folders() {
    let server = FakeKnowledgeBase::start();
    let vault = setup_vault(&server.url);
    write_note(vault.path(), "notes/a.md", "a");
    write_note(vault.path(), "other/b.md", "b");

    kbsync_in(vault.path())
        .args(["config", "add-folder", "notes"])
        .assert()
        .success();

    let output = kbsync_in(vault.path())
        .args(["--format", "json", "sync"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["report"]["synced"], 1);
    assert_eq!(json["report"]["skipped"], 0);
    assert!(json["report"]["completed_at"].is_string());
}

#[test]
fn test_sync_without_credentials_is_config_error() {
    let server = FakeKnowledgeBase::start();
    let dir = tempdir().unwrap();
    kbsync_in(dir.path())
        .args(["init", "--api-url", &server.url])
        .assert()
        .success();
    write_note(dir.path(), "a.md", "a");

    kbsync_in(dir.path())
        .arg("sync")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("API key not configured"));
    assert!(server.requests().is_empty());
}

#[test]
fn test_sync_without_settings_is_data_error() {
    let dir = tempdir().unwrap();

    kbsync_in(dir.path())
        .arg("sync")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("kbsync init"));
}

#[test]
fn test_env_overrides_credentials() {
    let server = FakeKnowledgeBase::start();
    let dir = tempdir().unwrap();
    kbsync_in(dir.path()).arg("init").assert().success();
    write_note(dir.path(), "a.md", "a");

    kbsync_in(dir.path())
        .env("KBSYNC_API_URL", &server.url)
        .env("KBSYNC_API_KEY", "env-key")
        .env("KBSYNC_DATASET_ID", "env-ds")
        .arg("sync")
        .assert()
        .success();

    let writes = server.writes();
    assert_eq!(
        header(&writes[0], "authorization").as_deref(),
        Some("Bearer env-key")
    );
    assert!(writes[0].url.path().starts_with("/v1/datasets/env-ds/"));

    let settings = fs::read_to_string(dir.path().join(".kbsync/config.toml")).unwrap();
    assert!(!settings.contains("env-key"));
}

#[test]
fn test_legacy_history_is_migrated() {
    let server = FakeKnowledgeBase::start();
    let vault = setup_vault(&server.url);
    write_note(vault.path(), "Note.md", "hello");

    // an entry with the right hash but a stale timestamp
    let settings_path = vault.path().join(".kbsync/config.toml");
    let mut settings = fs::read_to_string(&settings_path).unwrap();
    settings.push_str(
        "\n[fileHashes.\"Note.md\"]\npath = \"Note.md\"\nhash = \"5e918d2\"\nlastModified = 1\n",
    );
    fs::write(&settings_path, settings).unwrap();

    kbsync_in(vault.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("touched"));

    assert!(vault.path().join("historyContentHash").exists());
    let settings = fs::read_to_string(&settings_path).unwrap();
    assert!(!settings.contains("fileHashes"));
}
