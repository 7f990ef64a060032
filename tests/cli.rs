use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn wage(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("wage-explore").unwrap();
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

fn with_demo_data() -> (tempfile::TempDir, String) {
    let home = tempfile::tempdir().unwrap();
    let data = home.path().join("data").to_string_lossy().to_string();
    wage(home.path())
        .args(["--data-dir", &data, "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sample data written"));
    (home, data)
}

#[test]
fn test_budget_json_after_demo() {
    let (home, data) = with_demo_data();
    wage(home.path())
        .args(["--data-dir", &data, "budget", "--year", "2020", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""status": "allocated""#))
        .stdout(predicate::str::contains(r#""trends""#));
}

#[test]
fn test_budget_missing_year_is_not_an_error() {
    let (home, data) = with_demo_data();
    wage(home.path())
        .args(["--data-dir", &data, "budget", "--year", "1900"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No data for 1900."));
}

#[test]
fn test_missing_data_exits_with_error() {
    let home = tempfile::tempdir().unwrap();
    let empty = home.path().join("empty").to_string_lossy().to_string();
    wage(home.path())
        .args(["--data-dir", &empty, "budget", "--year", "2020"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error: Source file not found"));
}

#[test]
fn test_demo_refuses_to_overwrite() {
    let (home, data) = with_demo_data();
    wage(home.path())
        .args(["--data-dir", &data, "demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    wage(home.path())
        .args(["--data-dir", &data, "demo", "--force"])
        .assert()
        .success();
}

#[test]
fn test_table_and_trends() {
    let (home, data) = with_demo_data();
    wage(home.path())
        .args(["--data-dir", &data, "table", "--year", "2023"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2023"));
    wage(home.path())
        .args(["--data-dir", &data, "table", "--year", "1900"])
        .assert()
        .failure();
    wage(home.path())
        .args(["--data-dir", &data, "trends"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1994\u{2013}2023"));
}

#[test]
fn test_init_saves_data_dir() {
    let home = tempfile::tempdir().unwrap();
    let data = home.path().join("data").to_string_lossy().to_string();
    wage(home.path())
        .args(["--data-dir", &data, "init"])
        .assert()
        .success();
    let settings =
        std::fs::read_to_string(home.path().join(".config/wage-explore/settings.json")).unwrap();
    assert!(settings.contains(&data));
    assert!(Path::new(&data).is_dir());

    wage(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("missing"));
}

#[test]
fn test_completions() {
    let home = tempfile::tempdir().unwrap();
    wage(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wage-explore"));
}
