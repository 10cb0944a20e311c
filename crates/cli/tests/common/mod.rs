//! Shared test utilities for splunk-export integration tests.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper are hermetic: no `.env`, no
//!   inherited `SPLUNK_*` variables.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};

/// Returns a hermetic `splunk-export` command for integration testing.
pub fn export_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("splunk-export");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    cmd.env_remove("SPLUNK_EXPORT_CONFIG")
        .env_remove("SPLUNK_VIP")
        .env_remove("SPLUNK_HOSTS")
        .env_remove("SPLUNK_USERNAME")
        .env_remove("SPLUNK_PASSWORD")
        .env_remove("SPLUNK_API_TOKEN")
        .env_remove("SPLUNK_SKIP_VERIFY")
        .env_remove("SPLUNK_TIMEOUT")
        .env_remove("SPLUNK_MAX_RETRIES")
        .env_remove("SPLUNK_EXPORT_DEBUG")
        .env_remove("AWS_REGION")
        .env_remove("RUST_LOG");

    cmd
}

/// Write a local-only TOML config targeting `hosts` and return its path.
///
/// `extra` is appended verbatim, so it may add top-level keys only before any
/// table header it introduces.
pub fn write_config(dir: &Path, hosts: &[String], extra: &str) -> PathBuf {
    let hosts = hosts
        .iter()
        .map(|h| format!("\"{h}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let root = dir.join("out");
    let contents = format!(
        r#"write_to_local_file = true
{extra}

[connection]
hosts = [{hosts}]
max_retries = 0

[auth]
token = "test-token"

[search]
query = "index=main"
earliest_time = "-1h"

[execution]
retry_delay_ms = 0

[output]
file_name_template = "<host>.json"
date_partition = false

[output.local]
root = "{root}"
"#,
        root = root.display().to_string().replace('\\', "/"),
    );
    let path = dir.join("splunk-export.toml");
    std::fs::write(&path, contents).expect("write config");
    path
}
