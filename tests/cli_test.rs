mod common;

use assert_cmd::Command;
use common::{closed_endpoint, OneShotServer};
use predicates::str::contains;
use std::path::Path;

const PROXY_VARS: [&str; 6] = [
    "http_proxy",
    "HTTP_PROXY",
    "https_proxy",
    "HTTPS_PROXY",
    "all_proxy",
    "ALL_PROXY",
];

fn cmd(config_dir: &Path) -> Command {
    // Keep the user's own config and logs out of the way
    let config = config_dir.join("config.toml");
    std::fs::write(&config, "[client]\ntransport = \"http\"\n").unwrap();

    let mut cmd = Command::cargo_bin("langcurl").unwrap();
    cmd.env("HOME", config_dir).env_remove("RUST_LOG");
    for var in PROXY_VARS {
        cmd.env_remove(var);
    }
    cmd.arg("--config").arg(config);
    cmd
}

#[test]
fn help_lists_options() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--query"))
        .stdout(contains("--language"))
        .stdout(contains("--json"));
}

#[test]
fn json_output_on_success() {
    let dir = tempfile::tempdir().unwrap();
    let server = OneShotServer::start(200, "OK", r#"{"lemma":"lupus","senses":["wolf"]}"#);

    cmd(dir.path())
        .args(["--endpoint", &server.endpoint, "--query", "lupus", "--language", "lat", "--json"])
        .assert()
        .success()
        .stdout(contains("\"lemma\": \"lupus\""));

    let request_line = server.join();
    assert!(request_line.contains("s=lupus&l=lat"));
}

#[test]
fn formatted_output_on_400_error_body() {
    let dir = tempfile::tempdir().unwrap();
    let server = OneShotServer::start(400, "Bad Request", r#"{"error":"unknown language"}"#);

    cmd(dir.path())
        .args(["--endpoint", &server.endpoint, "--language", "xx"])
        .assert()
        .success()
        .stdout(contains("langnet API Response"))
        .stdout(contains("unknown language"));
    server.join();
}

#[test]
fn server_error_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let server = OneShotServer::start(500, "Internal Server Error", "boom");

    cmd(dir.path())
        .args(["--endpoint", &server.endpoint])
        .assert()
        .failure()
        .stderr(contains("Error: API request failed with exit code 500. Raw output: boom"));
    server.join();
}

#[test]
fn decode_failure_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let server = OneShotServer::start(200, "OK", "not json");

    cmd(dir.path())
        .args(["--endpoint", &server.endpoint])
        .assert()
        .failure()
        .stderr(contains("Failed to parse JSON response"))
        .stderr(contains("Raw response: not json"));
    server.join();
}

#[test]
fn unreachable_service_is_transport_failure() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .args(["--endpoint", &closed_endpoint()])
        .assert()
        .failure()
        .stderr(contains("Error: API request failed with exit code -1. Raw output: "));
}

#[test]
fn json_mode_emits_tagged_failure() {
    let dir = tempfile::tempdir().unwrap();
    let server = OneShotServer::start(502, "Bad Gateway", "upstream down");

    let output = cmd(dir.path())
        .args(["--endpoint", &server.endpoint, "--json"])
        .assert()
        .failure()
        .stderr(contains("exit code 502"))
        .get_output()
        .stdout
        .clone();
    server.join();

    let failure: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(failure["kind"], "transport_failure");
    assert_eq!(failure["exit_status"], 502);
    assert_eq!(failure["raw_output"], "upstream down");
}

#[test]
fn missing_curl_program_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("curl.toml");
    std::fs::write(
        &config,
        "[client]\ntransport = \"curl\"\ncurl_program = \"langcurl-no-such-curl\"\n",
    )
    .unwrap();

    Command::cargo_bin("langcurl")
        .unwrap()
        .env("HOME", dir.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(contains("Error: API request could not be sent"))
        .stderr(contains("langcurl-no-such-curl"));
}

#[test]
fn empty_query_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .args(["--query", " ", "--endpoint", &closed_endpoint()])
        .assert()
        .failure()
        .stderr(contains("Invalid query"));
}

#[test]
fn generate_config_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested").join("langcurl.toml");

    let mut cmd = Command::cargo_bin("langcurl").unwrap();
    cmd.env("HOME", dir.path())
        .arg("--generate-config")
        .arg("--config")
        .arg(&target)
        .assert()
        .success()
        .stdout(contains("Configuration file created at"));

    let written = std::fs::read_to_string(&target).unwrap();
    assert!(written.contains("accepted_statuses = [0, 200, 400]"));
}
