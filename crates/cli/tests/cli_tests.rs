//! End-to-end CLI tests.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("fortigate-cli").expect("binary builds");
    // Isolate from the developer's environment.
    cmd.env_remove("FORTIGATE_RPC_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn config_file(host: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    let config = json!({
        "devices": {
            "fw1": {"host": host, "api_token": "test-token", "verify_tls": false}
        }
    });
    write!(file, "{}", config).expect("write config");
    file
}

#[test]
fn test_help_lists_command_families() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("policy"))
        .stdout(predicate::str::contains("address"))
        .stdout(predicate::str::contains("route"))
        .stdout(predicate::str::contains("interface"));
}

#[test]
fn test_unknown_subcommand_fails_fast() {
    cli().arg("frobnicate").assert().failure();
}

#[test]
fn test_missing_config_is_general_error() {
    cli()
        .args(["device", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_device_scoped_command_requires_device_flag() {
    let config = config_file("192.0.2.1");
    cli()
        .args(["--config"])
        .arg(config.path())
        .args(["policy", "list"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("--device"));
}

#[test]
fn test_unknown_device_maps_to_not_found_exit_code() {
    let config = config_file("192.0.2.1");
    cli()
        .args(["--config"])
        .arg(config.path())
        .args(["--device", "fw9", "policy", "list"])
        .assert()
        .code(4)
        .stdout(predicate::str::contains("device_not_found"));
}

#[test]
fn test_malformed_set_json_is_validation_error() {
    let config = config_file("192.0.2.1");
    cli()
        .args(["--config"])
        .arg(config.path())
        .args(["--device", "fw1", "route", "update", "3", "--set", "{not json"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("JSON object"));
}

#[tokio::test]
async fn test_policy_list_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/policy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"policyid": 1, "name": "allow-web", "action": "accept"}],
            "http_status": 200
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_file(&server.uri());
    let assert = tokio::task::spawn_blocking(move || {
        let output = cli()
            .args(["--config"])
            .arg(config.path())
            .args(["--device", "fw1", "policy", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("allow-web"));
        drop(output);
        drop(config);
    });
    assert.await.expect("assert task");
}

#[tokio::test]
async fn test_table_output_renders_columns() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/address"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"name": "internal-net", "type": "ipmask", "subnet": "10.0.0.0 255.255.255.0"}
            ],
            "http_status": 200
        })))
        .mount(&server)
        .await;

    let config = config_file(&server.uri());
    tokio::task::spawn_blocking(move || {
        cli()
            .args(["--config"])
            .arg(config.path())
            .args(["--device", "fw1", "--output", "table", "address", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("name"))
            .stdout(predicate::str::contains("internal-net"));
        drop(config);
    })
    .await
    .expect("assert task");
}

#[tokio::test]
async fn test_remote_error_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/cmdb/firewall/policy"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": -3})))
        .mount(&server)
        .await;

    let config = config_file(&server.uri());
    tokio::task::spawn_blocking(move || {
        cli()
            .args(["--config"])
            .arg(config.path())
            .args(["--device", "fw1", "policy", "list"])
            .assert()
            .code(6)
            .stdout(predicate::str::contains("remote_api_error"));
        drop(config);
    })
    .await
    .expect("assert task");
}
