//! Integration tests for the splunk-export binary.
//!
//! These tests verify the exit-code contract and that the run summary is the
//! only thing written to stdout.

mod common;

use common::{export_cmd, write_config};
use predicates::prelude::*;
use splunk_client::testing::load_fixture_text;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn summary_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout should be the run summary JSON")
}

#[test]
fn test_help_lists_exit_codes() {
    export_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("130 interrupted"));
}

#[test]
fn test_missing_explicit_config_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    export_cmd()
        .arg("--config")
        .arg(dir.path().join("nope.toml"))
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to read configuration file"));
}

#[test]
fn test_no_sink_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &["sh1".to_string()], "");
    std::fs::write(
        &config,
        std::fs::read_to_string(&config)
            .unwrap()
            .replace("write_to_local_file = true", "write_to_local_file = false"),
    )
    .unwrap();

    export_cmd()
        .env("SPLUNK_EXPORT_CONFIG", &config)
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
}

#[tokio::test]
async fn test_successful_export_exits_0() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/search/v2/jobs/export"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(load_fixture_text("search/export_results.ndjson")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &[server.uri()], "");

    let assert = export_cmd().arg("--config").arg(&config).assert().code(0);

    let summary = summary_json(&assert.get_output().stdout);
    assert_eq!(summary["status"], "Success");
    assert_eq!(summary["targets"][0]["records"], 3);

    let artifact = dir.path().join("out").join("127.0.0.1.json");
    let contents = std::fs::read_to_string(artifact).unwrap();
    assert_eq!(contents.lines().count(), 3);
}

#[tokio::test]
async fn test_all_targets_failed_exits_4() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/search/v2/jobs/export"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "messages": [{ "type": "FATAL", "text": "Unknown search command 'foo'" }]
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &[server.uri()], "");

    let assert = export_cmd().arg("--config").arg(&config).assert().code(4);

    let summary = summary_json(&assert.get_output().stdout);
    assert_eq!(summary["status"], "Failed");
    assert_eq!(
        summary["targets"][0]["jobs"][0]["error_kind"],
        "search_execution"
    );
}

#[tokio::test]
async fn test_unresolvable_vip_exits_3() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/shcluster/member/members"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &[], "vip_to_hostname = true");

    let assert = export_cmd()
        .arg("--config")
        .arg(&config)
        .env("SPLUNK_VIP", server.uri())
        .assert()
        .code(3);

    let summary = summary_json(&assert.get_output().stdout);
    assert_eq!(summary["status"], "Failed");
    assert_eq!(summary["error_kind"], "resolution");
    assert!(summary["targets"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_hosts_flag_overrides_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/search/v2/jobs/export"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &["unreachable.invalid".to_string()], "");

    let assert = export_cmd()
        .arg("--config")
        .arg(&config)
        .arg("--hosts")
        .arg(server.uri())
        .assert()
        .code(0);

    let summary = summary_json(&assert.get_output().stdout);
    assert_eq!(summary["targets"].as_array().unwrap().len(), 1);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("out").join("127.0.0.1.json")).unwrap(),
        ""
    );
}
