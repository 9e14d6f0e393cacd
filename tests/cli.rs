//! Integration tests for CLI commands

#![allow(deprecated)]

use assert_cmd::{assert::OutputAssertExt, cargo::CommandCargoExt};
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

/// `ora` with an isolated config file and no ambient endpoint override
fn ora(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ora").unwrap();
    cmd.env_remove("ORA_API_URL")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(tmp.path().join("config.toml"));
    cmd
}

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("ora").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("upload"))
        .stdout(predicate::str::contains("--api-url"));
}

#[test]
fn test_ask_unreachable_backend() {
    let tmp = TempDir::new().unwrap();
    let mut cmd = ora(&tmp);
    cmd.arg("--api-url")
        .arg("http://127.0.0.1:9/ask")
        .arg("ask")
        .arg("What is in the report?");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error querying the backend."));
}

#[test]
fn test_ask_env_url_is_used() {
    let tmp = TempDir::new().unwrap();
    let mut cmd = ora(&tmp);
    cmd.env("ORA_API_URL", "ftp://example.com/ask")
        .arg("ask")
        .arg("q");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("ftp://example.com/ask"));
}

#[test]
fn test_invalid_api_url_rejected() {
    let tmp = TempDir::new().unwrap();
    let mut cmd = ora(&tmp);
    cmd.arg("--api-url").arg("not a url").arg("ask").arg("q");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("ask_url"));
}

#[test]
fn test_upload_missing_file() {
    let tmp = TempDir::new().unwrap();
    let mut cmd = ora(&tmp);
    cmd.arg("upload").arg(tmp.path().join("missing.pdf"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Upload failed."));
}

#[test]
fn test_docs_unreachable_backend() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("config.toml"),
        "[backend]\ndocs_url = \"http://127.0.0.1:9/docs\"\n",
    )
    .unwrap();
    let mut cmd = ora(&tmp);
    cmd.arg("docs");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Backend not running or no docs indexed"));
}

#[test]
fn test_malformed_config_reported() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("config.toml"), "[backend\n").unwrap();
    let mut cmd = ora(&tmp);
    cmd.arg("docs");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}
