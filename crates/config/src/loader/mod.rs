//! Configuration loader for environment variables and config files.
//!
//! Responsibilities:
//! - Load configuration from `.env` files, environment variables and a TOML/JSON file.
//! - Provide a builder-pattern `ConfigLoader` for hierarchical configuration merging.
//! - Validate the merged configuration before handing it to the pipeline.
//! - Enforce `DOTENV_DISABLED` gate to prevent accidental dotenv loading in tests.
//!
//! Does NOT handle:
//! - Persisting configuration back to disk.
//! - Resolving hosts or talking to Splunk.
//!
//! Invariants / Assumptions:
//! - Environment variables take precedence over config file values.
//! - Builder methods take precedence over environment variables.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

mod builder;
mod env;
mod error;
mod file;
mod validate;

#[cfg(test)]
mod tests;

pub use builder::ConfigLoader;
pub use env::env_var_or_none;
pub use error::ConfigError;
