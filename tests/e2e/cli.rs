use super::TestContext;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let ctx = TestContext::new();
    ctx.wingetup()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("update")
                .and(predicate::str::contains("remove"))
                .and(predicate::str::contains("login"))
                .and(predicate::str::contains("logout")),
        );
}

#[test]
fn test_update_help_shows_options() {
    let ctx = TestContext::new();
    ctx.wingetup()
        .args(["update", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--urls")
                .and(predicate::str::contains("--submit"))
                .and(predicate::str::contains("--id")),
        );
}

#[test]
fn test_remove_help_shows_reason() {
    let ctx = TestContext::new();
    ctx.wingetup()
        .args(["remove", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--reason"));
}

#[test]
fn test_unknown_command_fails() {
    let ctx = TestContext::new();
    ctx.wingetup().arg("publish").assert().failure();
}

#[test]
fn test_version_flag() {
    let ctx = TestContext::new();
    ctx.wingetup()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
