//! Connection configuration and the top-level `Config` structure.
//!
//! Responsibilities:
//! - Define connection settings (VIP, explicit hosts, port, TLS, timeouts, retries).
//! - Define the main `Config` structure combining every section.
//!
//! Does NOT handle:
//! - Configuration loading from files/env (see `loader` module).
//! - Resolving the VIP into member hosts (see the export crate).
//!
//! Invariants:
//! - All duration fields are serialized as seconds (integers).
//! - Default values are provided via `Default` impl, not magic numbers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use super::duration_seconds;
use super::{AuthConfig, ExecutionConfig, OutputConfig, SearchConfig, TelemetryConfig};
use crate::constants::{
    DEFAULT_EXPIRY_BUFFER_SECS, DEFAULT_MAX_RETRIES, DEFAULT_SESSION_TTL_SECS,
    DEFAULT_SPLUNK_PORT, DEFAULT_TIMEOUT_SECS,
};

/// URL scheme used to reach search heads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Https,
    Http,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Https => write!(f, "https"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Connection configuration for the Splunk deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Load-balancer address fronting the search head cluster.
    pub vip: Option<String>,
    /// Explicit search-head hostnames (`host` or `host:port`).
    pub hosts: Vec<String>,
    /// Management port used when a host entry carries none.
    pub port: u16,
    /// URL scheme for every REST call.
    pub scheme: Scheme,
    /// Whether to skip TLS verification (for self-signed certificates)
    pub skip_verify: bool,
    /// Per-request timeout (serialized as seconds)
    #[serde(with = "duration_seconds")]
    pub timeout: Duration,
    /// Maximum number of retries for rate-limited requests
    pub max_retries: usize,
    /// Session time-to-live in seconds (how long tokens remain valid)
    pub session_ttl_seconds: u64,
    /// Buffer time before session expiry to proactively refresh tokens (in seconds)
    pub session_expiry_buffer_seconds: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            vip: None,
            hosts: Vec::new(),
            port: DEFAULT_SPLUNK_PORT,
            scheme: Scheme::default(),
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECS,
            session_expiry_buffer_seconds: DEFAULT_EXPIRY_BUFFER_SECS,
        }
    }
}

/// Main configuration structure.
///
/// The four top-level switches mirror the operator-facing options of the
/// export job: VIP indirection, the two sinks and verbose logging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resolve search heads by asking the VIP for its cluster members.
    pub vip_to_hostname: bool,
    /// Upload artifacts to object storage.
    pub write_to_s3: bool,
    /// Write artifacts under the local output root.
    pub write_to_local_file: bool,
    /// Verbose (debug level) logging.
    pub debug_mode: bool,
    pub connection: ConnectionConfig,
    pub auth: AuthConfig,
    pub search: SearchConfig,
    pub execution: ExecutionConfig,
    pub output: OutputConfig,
    pub telemetry: TelemetryConfig,
}

impl Config {
    /// True if at least one sink is switched on.
    pub fn any_sink_enabled(&self) -> bool {
        self.write_to_s3 || self.write_to_local_file
    }
}
