//! Configuration management for splunk-export.
//!
//! This crate provides the types, defaults and loader used to build a
//! validated export [`Config`] from a TOML/JSON file, environment variables
//! and explicit overrides.

pub mod constants;
mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, env_var_or_none};
pub use types::{
    AuthConfig, AuthStrategy, Backoff, Config, ConnectionConfig, ExecutionConfig, Frequency,
    LocalOutputConfig, LogFormat, OutputConfig, OutputFormat, PartialMembers, ResolutionFallback,
    S3OutputConfig, Scheme, SearchConfig, SearchMode, TelemetryConfig, WindowConfig,
};

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, OnceLock};

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }
}
