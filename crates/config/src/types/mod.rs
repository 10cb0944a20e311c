//! Configuration type definitions for splunk-export.
//!
//! Responsibilities:
//! - Define the export configuration: connection, auth, search, execution,
//!   output and telemetry sections.
//! - Provide serialization helpers for sensitive types (secrets, durations).
//! - Keep defaults in `Default` impls backed by [`crate::constants`].
//!
//! Does NOT handle:
//! - Loading from files or environment variables (see `loader` module).
//! - Cross-field validation (see `loader::validate`).
//! - Actual network connections or authentication flows (see client crate).
//!
//! Invariants:
//! - All secret types use `secrecy::SecretString` to prevent accidental logging.
//! - Every section deserializes with `#[serde(default)]`, so a partial file is valid input.

mod auth;
mod connection;
mod execution;
mod output;
mod search;
mod telemetry;

pub use auth::{AuthConfig, AuthStrategy};
pub use connection::{Config, ConnectionConfig, Scheme};
pub use execution::{Backoff, ExecutionConfig, PartialMembers, ResolutionFallback};
pub use output::{LocalOutputConfig, OutputConfig, OutputFormat, S3OutputConfig};
pub use search::{Frequency, SearchConfig, SearchMode, WindowConfig};
pub use telemetry::{LogFormat, TelemetryConfig};

/// Module for serializing optional SecretString values as plain strings.
pub(crate) mod opt_secret_string {
    use secrecy::{ExposeSecret, SecretString};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(secret: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        secret
            .as_ref()
            .map(|s| s.expose_secret().to_string())
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.map(|s| SecretString::new(s.into())))
    }
}

/// Module for serializing Duration as seconds (integer).
pub(crate) mod duration_seconds {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
