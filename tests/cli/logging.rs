use crate::cli::support::{kbsync_in, setup_vault, write_note};
use predicates::prelude::*;

#[test]
fn test_verbose_logs_to_stderr() {
    let vault = setup_vault("http://127.0.0.1:9");
    write_note(vault.path(), "a.md", "a");

    kbsync_in(vault.path())
        .args(["--verbose", "status"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Enumerated vault documents"));
}

#[test]
fn test_json_logs() {
    let vault = setup_vault("http://127.0.0.1:9");

    kbsync_in(vault.path())
        .args(["--log-level", "debug", "--log-json", "status"])
        .assert()
        .success()
        .stderr(predicate::str::contains("\"level\":\"DEBUG\""));
}

#[test]
fn test_quiet_by_default() {
    let vault = setup_vault("http://127.0.0.1:9");

    kbsync_in(vault.path())
        .arg("status")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}
