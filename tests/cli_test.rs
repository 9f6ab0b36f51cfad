#![allow(deprecated)]

//! Binary-level tests for the synthdata CLI
//!
//! Each test points the binary at a throwaway config path and client
//! database so nothing touches the user's real state.
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use synthdata::api::endpoints;
use synthdata::storage::{keys, KeyValueStore, SqliteStore};

mod common;

/// Command with isolated config, store, and no inherited overrides
fn synthdata(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("synthdata").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("SYNTHDATA_BACKEND_URL")
        .env_remove("SYNTHDATA_TIMEOUT_SECONDS")
        .env_remove("SYNTHDATA_STORE")
        .env_remove("SYNTHDATA_MODEL")
        .env_remove("SYNTHDATA_PASSWORD")
        .env_remove("RUST_LOG")
        .current_dir(dir)
        .arg("--config")
        .arg(dir.join("missing.yaml"))
        .arg("--store")
        .arg(store_path(dir));
    cmd
}

fn store_path(dir: &Path) -> PathBuf {
    dir.join("client.db")
}

#[test]
fn test_quota_on_fresh_store() {
    let dir = TempDir::new().unwrap();

    synthdata(dir.path())
        .arg("quota")
        .assert()
        .success()
        .stdout(predicate::str::contains("10 requests remaining today"));
}

#[test]
fn test_whoami_requires_login() {
    let dir = TempDir::new().unwrap();

    synthdata(dir.path())
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "No authentication token found. Please log in.",
        ));
}

#[test]
fn test_signup_requires_terms() {
    let dir = TempDir::new().unwrap();

    synthdata(dir.path())
        .args(["signup", "--name", "Ada", "--email", "ada@example.com"])
        .env("SYNTHDATA_PASSWORD", "pw")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Please accept the terms and conditions",
        ));
}

#[test]
fn test_invalid_backend_url_rejected() {
    let dir = TempDir::new().unwrap();

    synthdata(dir.path())
        .args(["--backend-url", "not a url", "quota"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid api.base_url"));
}

#[test]
fn test_invalid_config_file_rejected() {
    let (dir, config_path) =
        common::temp_file("defaults:\n  column_count: 40\n", "config.yaml");

    Command::cargo_bin("synthdata")
        .unwrap()
        .env_remove("SYNTHDATA_STORE")
        .arg("--config")
        .arg(config_path)
        .arg("--store")
        .arg(store_path(dir.path()))
        .arg("quota")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "defaults.column_count must be between 1 and 15",
        ));
}

#[test]
fn test_export_csv_to_stdout() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("rows.json"),
        r#"{"count": 2, "data": [{"name": "Doe, Jane", "age": 41}, {"name": "Roe", "age": 7}]}"#,
    )
    .unwrap();

    synthdata(dir.path())
        .args(["export", "-i", "rows.json", "-f", "csv"])
        .assert()
        .success()
        .stdout("name,age\n\"Doe, Jane\",41\nRoe,7\n");
}

#[test]
fn test_export_empty_rows_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("rows.json"), "[]").unwrap();

    synthdata(dir.path())
        .args(["export", "-i", "rows.json", "-f", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No data to export"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_schema_command_writes_file_and_counts_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoints::GENERATE_SCHEMA))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::schema_body()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    SqliteStore::new_with_path(store_path(dir.path()))
        .unwrap()
        .set(keys::SESSION_TOKEN, "tok")
        .unwrap();

    let uri = server.uri();
    let cwd = dir.path().to_path_buf();
    tokio::task::spawn_blocking(move || {
        synthdata(&cwd)
            .args(["--backend-url", uri.as_str(), "schema", "-d", "bike shop customers"])
            .args(["-m", "llama", "--columns", "3", "-o", "customers.json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Saved schema to customers.json"));

        synthdata(&cwd)
            .arg("quota")
            .assert()
            .success()
            .stdout(predicate::str::contains("9 requests remaining today"));
    })
    .await
    .unwrap();

    let saved = std::fs::read_to_string(dir.path().join("customers.json")).unwrap();
    let schema = synthdata::workflow::apply_schema_edit(&saved).unwrap();
    assert_eq!(schema.column_count, 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_session_clears_store() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    SqliteStore::new_with_path(store_path(dir.path()))
        .unwrap()
        .set(keys::SESSION_TOKEN, "stale")
        .unwrap();

    let uri = server.uri();
    let cwd = dir.path().to_path_buf();
    tokio::task::spawn_blocking(move || {
        synthdata(&cwd)
            .args(["--backend-url", uri.as_str(), "schema", "-d", "anything"])
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "Session expired. Please log in again.",
            ));
    })
    .await
    .unwrap();

    let store = SqliteStore::new_with_path(store_path(dir.path())).unwrap();
    assert_eq!(store.get(keys::SESSION_TOKEN).unwrap(), None);
}
