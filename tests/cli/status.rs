use crate::cli::support::{kbsync_in, setup_vault, write_note, FakeKnowledgeBase};
use predicates::prelude::*;

#[test]
fn test_status_lists_pending_documents() {
    let vault = setup_vault("http://127.0.0.1:9");
    write_note(vault.path(), "a.md", "a");
    write_note(vault.path(), "sub/b.md", "b");
    write_note(vault.path(), "image.png", "png");

    kbsync_in(vault.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Last sync: never"))
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("sub/b.md"))
        .stdout(predicate::str::contains("2 pending, 0 unchanged"));
}

#[test]
fn test_status_after_sync() {
    let server = FakeKnowledgeBase::start();
    let vault = setup_vault(&server.url);
    write_note(vault.path(), "a.md", "a");
    write_note(vault.path(), "b.md", "b");
    kbsync_in(vault.path()).arg("sync").assert().success();

    write_note(vault.path(), "b.md", "b, edited");

    let output = kbsync_in(vault.path())
        .args(["--format", "json", "status"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["pending"], 1);
    assert_eq!(json["unchanged"], 1);
    assert_eq!(json["tracked"], 2);
    assert_eq!(json["files"][0]["path"], "b.md");
    assert_eq!(json["files"][0]["status"], "content_changed");
    assert!(json["last_sync_time"].is_string());
    assert_eq!(json["last_pass"]["state"], "completed");
    assert_eq!(server.writes().len(), 2);
}

#[test]
fn test_status_quiet_prints_only_changes() {
    let vault = setup_vault("http://127.0.0.1:9");
    write_note(vault.path(), "a.md", "a");

    kbsync_in(vault.path())
        .args(["--quiet", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vault:").not())
        .stdout(predicate::str::contains("1 pending"));
}

#[test]
fn test_status_shows_failed_last_pass() {
    let server = FakeKnowledgeBase::failing_writes(500);
    let vault = setup_vault(&server.url);
    write_note(vault.path(), "a.md", "a");
    kbsync_in(vault.path()).arg("sync").assert().code(1);

    kbsync_in(vault.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Last sync: never"))
        .stdout(predicate::str::contains("Last pass: failed at"))
        .stdout(predicate::str::contains("HTTP 500"));

    let output = kbsync_in(vault.path())
        .args(["--format", "json", "status"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["last_pass"]["state"], "failed");
    assert!(json["last_pass"]["error"]
        .as_str()
        .unwrap()
        .contains("sync failed at a.md"));
    assert!(json["last_sync_time"].is_null());
}
