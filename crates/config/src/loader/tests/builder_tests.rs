//! Builder precedence and file loading tests.

use secrecy::ExposeSecret;
use std::time::Duration;
use tempfile::TempDir;

use super::{VALID_TOML, write_config};
use crate::loader::builder::ConfigLoader;
use crate::loader::error::ConfigError;
use crate::types::{AuthStrategy, OutputFormat, SearchMode};

#[test]
fn test_build_from_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "export.toml", VALID_TOML);

    let config = ConfigLoader::new()
        .with_config_path(path)
        .from_file()
        .unwrap()
        .build()
        .unwrap();

    assert!(config.write_to_local_file);
    assert_eq!(
        config.connection.hosts,
        vec!["sh1.example.com", "sh2.example.com:9089"]
    );
    assert_eq!(config.search.mode, SearchMode::Export);
    assert_eq!(config.output.format, OutputFormat::Ndjson);
    assert!(matches!(
        config.auth.strategy(),
        Some(AuthStrategy::ApiToken { .. })
    ));
}

#[test]
fn test_build_from_json_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        "export.json",
        r#"{
            "write_to_s3": true,
            "vip_to_hostname": true,
            "connection": {"vip": "splunk-vip.example.com"},
            "auth": {"username": "admin", "password": "changeme"},
            "search": {"query": "index=_internal", "mode": "job"},
            "output": {"s3": {"bucket": "archive", "key_prefix": "raw/"}}
        }"#,
    );

    let config = ConfigLoader::new()
        .with_config_path(path)
        .from_file()
        .unwrap()
        .build()
        .unwrap();

    assert!(config.vip_to_hostname);
    assert_eq!(config.search.mode, SearchMode::Job);
    assert_eq!(config.output.s3.bucket.as_deref(), Some("archive"));
    match config.auth.strategy() {
        Some(AuthStrategy::SessionToken { username, password }) => {
            assert_eq!(username, "admin");
            assert_eq!(password.expose_secret(), "changeme");
        }
        other => panic!("expected session auth, got {other:?}"),
    }
}

#[test]
fn test_builder_overrides_file_values() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "export.toml", VALID_TOML);

    let config = ConfigLoader::new()
        .with_config_path(path)
        .from_file()
        .unwrap()
        .with_hosts(vec!["override.example.com".to_string()])
        .with_api_token("override-token".to_string())
        .with_timeout(Duration::from_secs(90))
        .with_skip_verify(true)
        .with_debug_mode(true)
        .build()
        .unwrap();

    assert_eq!(config.connection.hosts, vec!["override.example.com"]);
    assert_eq!(config.connection.timeout, Duration::from_secs(90));
    assert!(config.connection.skip_verify);
    assert!(config.debug_mode);
    assert_eq!(
        config.auth.token.as_ref().unwrap().expose_secret(),
        "override-token"
    );
}

#[test]
fn test_from_file_without_path_uses_defaults() {
    let result = ConfigLoader::new().from_file().unwrap().build();
    assert!(matches!(result, Err(ConfigError::NoSinkEnabled)));
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let result = ConfigLoader::new()
        .with_config_path(dir.path().join("missing.toml"))
        .from_file();
    assert!(matches!(result, Err(ConfigError::ConfigFileRead { .. })));
}
