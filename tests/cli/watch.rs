use crate::cli::support::{kbsync_in, setup_vault, write_note, FakeKnowledgeBase};
use predicates::prelude::*;

#[test]
fn test_watch_requires_auto_sync() {
    let vault = setup_vault("http://127.0.0.1:9");

    kbsync_in(vault.path())
        .args(["watch", "--now", "--max-passes", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("auto sync is disabled"));
}

#[test]
fn test_watch_runs_immediate_pass() {
    let server = FakeKnowledgeBase::start();
    let vault = setup_vault(&server.url);
    write_note(vault.path(), "a.md", "a");
    kbsync_in(vault.path())
        .args(["config", "set", "auto-sync", "on"])
        .assert()
        .success();

    kbsync_in(vault.path())
        .args(["watch", "--now", "--max-passes", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced 1 files, skipped 0"));

    assert_eq!(server.writes().len(), 1);
}

#[test]
fn test_watch_json_lines() {
    let server = FakeKnowledgeBase::start();
    let vault = setup_vault(&server.url);
    write_note(vault.path(), "a.md", "a");
    kbsync_in(vault.path())
        .args(["config", "set", "auto-sync", "true"])
        .assert()
        .success();

    let output = kbsync_in(vault.path())
        .args(["--format", "json", "watch", "--now", "--max-passes", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let line = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(json["synced"], 1);
}
