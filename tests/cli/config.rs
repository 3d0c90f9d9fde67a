use crate::cli::support::{kbsync_in, setup_vault, write_note};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_config_show_masks_api_key() {
    let vault = setup_vault("http://kb.local");

    kbsync_in(vault.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://kb.local"))
        .stdout(predicate::str::contains("****-key"))
        .stdout(predicate::str::contains("test-key").not());
}

#[test]
fn test_config_set_values() {
    let vault = setup_vault("http://kb.local");

    kbsync_in(vault.path())
        .args(["config", "set", "auto-sync", "true"])
        .assert()
        .success();
    kbsync_in(vault.path())
        .args(["config", "set", "sync-interval", "5"])
        .assert()
        .success();

    let output = kbsync_in(vault.path())
        .args(["--format", "json", "config", "show"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["auto_sync"], true);
    assert_eq!(json["sync_interval"], 5);
}

#[test]
fn test_config_set_rejects_bad_values() {
    let vault = setup_vault("http://kb.local");

    kbsync_in(vault.path())
        .args(["config", "set", "sync-interval", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid sync interval"));

    kbsync_in(vault.path())
        .args(["config", "set", "colour", "blue"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unsupported setting"));
}

#[test]
fn test_config_folders() {
    let vault = setup_vault("http://kb.local");
    write_note(vault.path(), "notes/a.md", "a");
    write_note(vault.path(), "journal/2024/b.md", "b");

    kbsync_in(vault.path())
        .args(["config", "add-folder", "notes/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added folder notes"));

    kbsync_in(vault.path())
        .args(["config", "add-folder", "missing"])
        .assert()
        .code(2);

    kbsync_in(vault.path())
        .args(["config", "folders"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* notes"))
        .stdout(predicate::str::contains("  journal/2024"));

    kbsync_in(vault.path())
        .args(["config", "remove-folder", "notes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed folder notes"));

    kbsync_in(vault.path())
        .args(["config", "add-folder", "journal"])
        .assert()
        .success();
    kbsync_in(vault.path())
        .args(["config", "clear-folders"])
        .assert()
        .success();

    let settings = fs::read_to_string(vault.path().join(".kbsync/config.toml")).unwrap();
    assert!(!settings.contains("journal"));
}
