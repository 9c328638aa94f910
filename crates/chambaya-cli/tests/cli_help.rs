use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("chambaya")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("notifications"))
        .stdout(predicate::str::contains("works"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_notifications_help_shows_subcommands() {
    cargo_bin_cmd!("chambaya")
        .args(["notifications", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("badge"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("read-all"))
        .stdout(predicate::str::contains("clean"));
}

#[test]
fn test_rate_rejects_out_of_range_score() {
    cargo_bin_cmd!("chambaya")
        .args([
            "rate", "--user", "E1", "--work", "W1", "--score", "9", "--as", "employer",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--score"));
}

#[test]
fn test_login_email_conflicts_with_google_id() {
    cargo_bin_cmd!("chambaya")
        .args(["login", "--email", "a@b.c", "--google-id", "g-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
