//! Smoke tests for the ormctl binary

use assert_cmd::Command;
use predicates::prelude::*;

fn ormctl() -> Command {
    let mut cmd = Command::cargo_bin("ormctl").unwrap();
    cmd.env_remove("ORMCTL_CONFIG")
        .env_remove("ORMCTL_MODE")
        .env_remove("ORMCTL_ITEMS_DB")
        .env_remove("ORMCTL_RELATIONS_DB");
    cmd
}

#[test]
fn test_serve_help() {
    ormctl()
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session mode"))
        .stdout(predicate::str::contains("--stream-interval-ms"));
}

#[test]
fn test_init_help() {
    ormctl()
        .arg("init")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--relations-db"));
}

#[test]
fn test_init_creates_databases() {
    let dir = tempfile::tempdir().unwrap();
    let items = dir.path().join("items.db");
    let relations = dir.path().join("relation.db");

    ormctl()
        .arg("init")
        .arg("--items-db")
        .arg(&items)
        .arg("--relations-db")
        .arg(&relations)
        .assert()
        .success();

    assert!(items.exists());
    assert!(relations.exists());
}

#[test]
fn test_init_blocking_mode() {
    let dir = tempfile::tempdir().unwrap();
    let items = dir.path().join("items.db");
    let relations = dir.path().join("relation.db");

    ormctl()
        .env("ORMCTL_MODE", "blocking")
        .arg("init")
        .arg("--items-db")
        .arg(&items)
        .arg("--relations-db")
        .arg(&relations)
        .assert()
        .success();

    assert!(items.exists());
    assert!(relations.exists());
}

#[test]
fn test_bad_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("ormctl.toml");
    std::fs::write(&config, "port = 8000\n").unwrap();

    ormctl()
        .arg("init")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config file"));
}

#[test]
fn test_unknown_mode_fails() {
    ormctl()
        .arg("init")
        .arg("--mode")
        .arg("threaded")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown session mode"));
}
