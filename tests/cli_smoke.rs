mod support;

use std::fs;
use std::path::Path;
use assert_cmd::Command;
use predicates::prelude::*;
use support::PLAN;

fn todotab(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("todotab").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("TODOTAB_DATA_DIR", home.join("data"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn progress_prints_phases_and_total() {
    let dir = tempfile::tempdir().unwrap();
    let plan = dir.path().join("plan.json");
    fs::write(&plan, PLAN).unwrap();

    todotab(dir.path())
        .arg("progress")
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("Setup"))
        .stdout(predicate::str::contains(" 67%  2/3"))
        .stdout(predicate::str::contains("Total"))
        .stdout(predicate::str::contains(" 50%  2/4"));
}

#[test]
fn toggle_rewrites_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let plan = dir.path().join("plan.json");
    fs::write(&plan, PLAN).unwrap();

    todotab(dir.path())
        .args(["toggle", plan.to_str().unwrap(), "1", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("phase 1 task 0 is now done"));

    let doc = todotab::store::load(&fs::read_to_string(&plan).unwrap()).unwrap();
    assert!(doc.phases[1].tasks[0].done);

    todotab(dir.path())
        .args(["toggle", plan.to_str().unwrap(), "7", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No task 0 in phase 7"));
}

#[test]
fn export_to_file_and_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let plan = dir.path().join("plan.json");
    fs::write(&plan, PLAN).unwrap();
    let out = dir.path().join("todo-export.json");

    todotab(dir.path())
        .args(["export", plan.to_str().unwrap(), "-o", out.to_str().unwrap()])
        .assert()
        .success();
    let exported: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let original: serde_json::Value = serde_json::from_str(PLAN).unwrap();
    assert_eq!(exported, original);

    todotab(dir.path())
        .args(["export", plan.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[\n  {\n    \"phase\": \"Setup\""));
}

#[test]
fn non_array_document_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let plan = dir.path().join("plan.json");
    fs::write(&plan, r#"{"phase": "x"}"#).unwrap();

    todotab(dir.path())
        .arg("progress")
        .arg(&plan)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected a JSON array"));
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    todotab(dir.path())
        .args(["progress", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn log_outside_repository_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    todotab(dir.path())
        .args(["log", "--repo", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a git repository").or(predicate::str::contains("not installed")));
}

#[test]
fn set_writes_user_config() {
    let dir = tempfile::tempdir().unwrap();
    todotab(dir.path())
        .args(["set", "git_log_limit", "25"])
        .assert()
        .success();
    let config = fs::read_to_string(dir.path().join(".config/todotab/todotab.toml")).unwrap();
    assert!(config.contains("git_log_limit = 25"), "{config}");
    assert!(config.contains("autosave_file = \"autosave.json\""), "{config}");
}
