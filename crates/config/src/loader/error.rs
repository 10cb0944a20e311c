//! Error types for configuration loading.
//!
//! Responsibilities:
//! - Define error variants for every configuration loading and validation failure.
//!
//! Invariants:
//! - All error variants include context for debugging (variable names, paths, etc.).
//! - Dotenv and parse errors NEVER include raw file contents to prevent secret leakage.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Failed to read config file at {path}: {kind}")]
    ConfigFileRead { path: PathBuf, kind: ErrorKind },

    #[error("Failed to parse config file at {path}: {message}")]
    ConfigFileParse { path: PathBuf, message: String },

    #[error("No output sink enabled. Set write_to_s3 and/or write_to_local_file.")]
    NoSinkEnabled,

    #[error("vip_to_hostname is enabled but no VIP is configured. Set connection.vip or SPLUNK_VIP.")]
    MissingVip,

    #[error("No search heads configured. Set connection.hosts or SPLUNK_HOSTS.")]
    MissingHosts,

    #[error("Authentication configuration is required (either username/password or API token)")]
    MissingAuth,

    #[error("search.query must not be empty")]
    MissingQuery,

    #[error("write_to_s3 is enabled but output.s3.bucket is not set")]
    MissingBucket,

    #[error("write_to_local_file is enabled but output.local.root is empty")]
    MissingLocalRoot,

    #[error("invalid timeout: {message}")]
    InvalidTimeout { message: String },

    #[error("invalid session TTL configuration: {message}")]
    InvalidSessionTtl { message: String },

    #[error("invalid max_retries: {message}")]
    InvalidMaxRetries { message: String },

    #[error("invalid execution settings: {message}")]
    InvalidExecution { message: String },

    #[error("invalid search window: {message}")]
    InvalidWindow { message: String },

    #[error("invalid sample_ratio: must be at least 1 (got {0})")]
    InvalidSampleRatio(u32),

    #[error("invalid output settings: {message}")]
    InvalidOutput { message: String },

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}
