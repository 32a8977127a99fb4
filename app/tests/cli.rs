use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_options() {
    let mut cmd = Command::cargo_bin("photoadmin").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--api-url"))
        .stdout(predicate::str::contains("--log-level"))
        .stdout(predicate::str::contains("--thumbnails-preload"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_version_flag() {
    let mut cmd = Command::cargo_bin("photoadmin").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("photoadmin"));
}
