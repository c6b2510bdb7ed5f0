//! End-to-end CLI tests for the imgur-folder binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn imgur_folder() -> Command {
    Command::cargo_bin("imgur-folder").unwrap()
}

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    imgur_folder()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Archive Imgur albums"))
        .stdout(predicate::str::contains("download"))
        .stdout(predicate::str::contains("favorites"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    imgur_folder()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

/// Test that a missing subcommand causes non-zero exit.
#[test]
fn test_binary_without_command_fails() {
    imgur_folder().assert().failure();
}

/// Test that invalid flags cause non-zero exit.
#[test]
fn test_binary_invalid_flag_returns_error() {
    imgur_folder()
        .arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_config_set_client_then_show_round_trips_through_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    imgur_folder()
        .args(["-q", "--config"])
        .arg(&config)
        .args(["config", "set-client", "my-id", "my-secret"])
        .assert()
        .success();

    imgur_folder()
        .args(["-q", "--config"])
        .arg(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("    \"client_id\": \"my-id\""))
        .stdout(predicate::str::contains("\"client_secret\": \"my-secret\""));
}

#[test]
fn test_download_without_client_id_fails_with_suggestion() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    imgur_folder()
        .arg("--config")
        .arg(&config)
        .args(["download", "https://imgur.com/a/abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("set-client"));
}

#[test]
fn test_refresh_without_token_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    imgur_folder()
        .arg("--config")
        .arg(&config)
        .arg("refresh")
        .assert()
        .failure()
        .stderr(predicate::str::contains("imgur-folder auth"));
}
