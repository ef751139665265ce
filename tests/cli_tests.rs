//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;

/// Command with config and data isolated under a temp home
fn voicenotes(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("voicenotes").unwrap();
    cmd.env_remove("GEMINI_API_KEY")
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"));
    cmd
}

#[test]
fn help_output() {
    let home = tempfile::tempdir().unwrap();
    voicenotes(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("record"))
        .stdout(predicate::str::contains("repolish"))
        .stdout(predicate::str::contains("retry"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_output() {
    let home = tempfile::tempdir().unwrap();
    voicenotes(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("voicenotes"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_path_command() {
    let home = tempfile::tempdir().unwrap();
    voicenotes(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_set_then_get() {
    let home = tempfile::tempdir().unwrap();

    voicenotes(&home)
        .args(["config", "set", "language", "fr"])
        .assert()
        .success();

    voicenotes(&home)
        .args(["config", "get", "language"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fr"));
}

#[test]
fn config_get_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    voicenotes(&home)
        .args(["config", "get", "unknown_key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_rejects_bad_bool() {
    let home = tempfile::tempdir().unwrap();
    voicenotes(&home)
        .args(["config", "set", "auto_polish", "maybe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("true"));
}

#[test]
fn record_without_api_key_fails_fast() {
    let home = tempfile::tempdir().unwrap();
    let db = home.path().join("notes.db");

    voicenotes(&home)
        .args(["record", "missing.webm", "--db"])
        .arg(&db)
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key"));
}

#[test]
fn record_missing_file_fails() {
    let home = tempfile::tempdir().unwrap();
    let db = home.path().join("notes.db");

    voicenotes(&home)
        .env("GEMINI_API_KEY", "test-key")
        .args(["record", "/nonexistent/clip.webm", "--db"])
        .arg(&db)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no such file"));
}

#[test]
fn record_invalid_language_is_a_usage_error() {
    let home = tempfile::tempdir().unwrap();
    let db = home.path().join("notes.db");

    voicenotes(&home)
        .env("GEMINI_API_KEY", "test-key")
        .args(["record", "clip.webm", "--language", "not a tag", "--db"])
        .arg(&db)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("language tag"));
}

#[test]
fn list_on_fresh_database_is_empty() {
    let home = tempfile::tempdir().unwrap();
    let db = home.path().join("notes.db");

    voicenotes(&home)
        .args(["list", "--db"])
        .arg(&db)
        .assert()
        .success()
        .stderr(predicate::str::contains("No notes yet"));
}

#[test]
fn show_unknown_id_fails() {
    let home = tempfile::tempdir().unwrap();
    let db = home.path().join("notes.db");

    voicenotes(&home)
        .args(["show", "deadbeef", "--db"])
        .arg(&db)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No note"));
}

#[test]
fn delete_unknown_id_fails() {
    let home = tempfile::tempdir().unwrap();
    let db = home.path().join("notes.db");

    voicenotes(&home)
        .args(["delete", "deadbeef", "--db"])
        .arg(&db)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No note"));
}
