//! Integration tests for configuration loading through the public API.
//!
//! These tests exercise the `ConfigLoader` builder chain the way the binary
//! does: file first, then overrides, then validation.

use splunk_export_config::{
    AuthStrategy, ConfigError, ConfigLoader, OutputFormat, PartialMembers, ResolutionFallback,
    Scheme, SearchMode, env_var_or_none,
};
use std::path::Path;
use std::time::Duration;

const FULL_TOML: &str = r#"
vip_to_hostname = true
write_to_s3 = true
write_to_local_file = true
debug_mode = true

[connection]
vip = "splunk-vip.example.com"
hosts = ["sh1.example.com"]
port = 8089
scheme = "https"
timeout = 60

[auth]
username = "exporter"
password = "hunter2"

[search]
query = "index=web sourcetype=access_combined"
mode = "job"
sample_ratio = 10

[search.window]
start = "2023-10-17 00:00"
periods = 24
freq = "1h"

[execution]
concurrency = 4
timeout_retries = 3
resolution_fallback = "explicit_hosts"
partial_members = "fail"

[output]
format = "json"
file_name_template = "bot_signal_raw_<ts>_<freq>.json"

[output.local]
root = "/var/lib/splunk-export"

[output.s3]
bucket = "splunk-archive"
key_prefix = "raw/"
"#;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_full_file_round_trips_into_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "export.toml", FULL_TOML);

    let config = ConfigLoader::new()
        .with_config_path(path)
        .from_file()
        .unwrap()
        .build()
        .unwrap();

    assert!(config.vip_to_hostname && config.write_to_s3 && config.write_to_local_file);
    assert_eq!(config.connection.vip.as_deref(), Some("splunk-vip.example.com"));
    assert_eq!(config.connection.scheme, Scheme::Https);
    assert_eq!(config.connection.timeout, Duration::from_secs(60));
    assert_eq!(config.search.mode, SearchMode::Job);
    assert!(config.search.is_sampled());
    assert_eq!(config.execution.concurrency, 4);
    assert_eq!(
        config.execution.resolution_fallback,
        ResolutionFallback::ExplicitHosts
    );
    assert_eq!(config.execution.partial_members, PartialMembers::Fail);
    assert_eq!(config.output.format, OutputFormat::Json);
    assert_eq!(config.output.s3.bucket.as_deref(), Some("splunk-archive"));

    let window = config.search.window.as_ref().unwrap();
    assert_eq!(window.frequency().unwrap().as_secs(), 3600);
    assert!(matches!(
        config.auth.strategy(),
        Some(AuthStrategy::SessionToken { .. })
    ));
}

#[test]
fn test_builder_overrides_take_precedence_over_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "export.toml", FULL_TOML);

    let config = ConfigLoader::new()
        .with_config_path(path)
        .from_file()
        .unwrap()
        .with_vip("override-vip.example.com".to_string())
        .with_api_token("override-token".to_string())
        .with_timeout(Duration::from_secs(15))
        .build()
        .unwrap();

    assert_eq!(
        config.connection.vip.as_deref(),
        Some("override-vip.example.com")
    );
    assert_eq!(config.connection.timeout, Duration::from_secs(15));
    assert!(matches!(
        config.auth.strategy(),
        Some(AuthStrategy::ApiToken { .. })
    ));
}

#[test]
fn test_empty_loader_reports_missing_sink_first() {
    let err = ConfigLoader::new().build().unwrap_err();
    assert!(matches!(err, ConfigError::NoSinkEnabled));
}

#[test]
fn test_unparseable_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "broken.toml", "write_to_s3 = maybe");

    let err = ConfigLoader::new()
        .with_config_path(&path)
        .from_file()
        .err()
        .unwrap();

    assert!(matches!(err, ConfigError::ConfigFileParse { .. }));
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn test_env_var_or_none_is_exported() {
    assert!(env_var_or_none("_SPLUNK_EXPORT_INTEGRATION_UNSET").is_none());
}
