//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for hierarchical configuration merging.
//! - Support loading from a config file, environment variables and direct builder methods.
//! - Build and validate the final `Config`.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//! - File format detection (delegated to file.rs).
//! - Cross-field validation rules (delegated to validate.rs).
//!
//! Invariants / Assumptions:
//! - Environment variables take precedence over config file values.
//! - Builder methods take precedence over environment variables.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.

use secrecy::SecretString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::env::apply_env;
use super::error::ConfigError;
use super::file::read_config_file;
use super::validate::validate;
use crate::types::Config;

/// Configuration loader that builds config from a file, the environment and overrides.
#[derive(Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    file: Option<Config>,
    vip: Option<String>,
    hosts: Option<Vec<String>>,
    username: Option<String>,
    password: Option<SecretString>,
    api_token: Option<SecretString>,
    skip_verify: Option<bool>,
    timeout: Option<Duration>,
    max_retries: Option<usize>,
    debug_mode: Option<bool>,
    s3_region: Option<String>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` environment variable is set to "true" or "1",
    /// the .env file will not be loaded (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The `.env` file exists but has invalid syntax (`ConfigError::DotenvParse`)
    /// - The `.env` file exists but cannot be read due to I/O errors (`ConfigError::DotenvIo`)
    ///
    /// Missing `.env` files are silently ignored (returns `Ok(self)`).
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Set the config file path read by [`ConfigLoader::from_file`].
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Read the config file, if a path was given.
    ///
    /// Without a path this is a no-op and the build starts from defaults.
    pub fn from_file(mut self) -> Result<Self, ConfigError> {
        if let Some(path) = &self.config_path {
            self.file = Some(read_config_file(path)?);
        }
        Ok(self)
    }

    /// Read configuration from environment variables.
    ///
    /// Environment variables take precedence over config file values.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Set the VIP address.
    pub fn with_vip(mut self, vip: String) -> Self {
        self.vip = Some(vip);
        self
    }

    /// Set the explicit host list.
    pub fn with_hosts(mut self, hosts: Vec<String>) -> Self {
        self.hosts = Some(hosts);
        self
    }

    /// Set the username.
    pub fn with_username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    /// Set the password.
    pub fn with_password(mut self, password: String) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    /// Set the API token.
    pub fn with_api_token(mut self, token: String) -> Self {
        self.api_token = Some(SecretString::new(token.into()));
        self
    }

    /// Set whether to skip TLS verification.
    pub fn with_skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = Some(skip);
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the maximum number of rate-limit retries.
    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Enable or disable debug logging.
    pub fn with_debug_mode(mut self, debug: bool) -> Self {
        self.debug_mode = Some(debug);
        self
    }

    /// Merge file, environment and overrides, then validate.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut config = self.file.unwrap_or_default();

        if let Some(vip) = self.vip {
            config.connection.vip = Some(vip);
        }
        if let Some(hosts) = self.hosts {
            config.connection.hosts = hosts;
        }
        if let Some(username) = self.username {
            config.auth.username = Some(username);
        }
        if let Some(password) = self.password {
            config.auth.password = Some(password);
        }
        if let Some(token) = self.api_token {
            config.auth.token = Some(token);
        }
        if let Some(skip) = self.skip_verify {
            config.connection.skip_verify = skip;
        }
        if let Some(timeout) = self.timeout {
            config.connection.timeout = timeout;
        }
        if let Some(retries) = self.max_retries {
            config.connection.max_retries = retries;
        }
        if let Some(debug) = self.debug_mode {
            config.debug_mode = debug;
        }
        // AWS_REGION only fills a gap; an explicit region in the file wins.
        if config.output.s3.region.is_none() {
            config.output.s3.region = self.s3_region;
        }

        validate(&config)?;
        Ok(config)
    }

    // Internal accessor methods for use by other loader modules

    pub(crate) fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub(crate) fn set_vip(&mut self, vip: Option<String>) {
        self.vip = vip;
    }

    pub(crate) fn set_hosts(&mut self, hosts: Option<Vec<String>>) {
        self.hosts = hosts;
    }

    pub(crate) fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    pub(crate) fn set_password(&mut self, password: Option<SecretString>) {
        self.password = password;
    }

    pub(crate) fn set_api_token(&mut self, token: Option<SecretString>) {
        self.api_token = token;
    }

    pub(crate) fn set_skip_verify(&mut self, skip: Option<bool>) {
        self.skip_verify = skip;
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub(crate) fn set_max_retries(&mut self, retries: Option<usize>) {
        self.max_retries = retries;
    }

    pub(crate) fn set_debug_mode(&mut self, debug: Option<bool>) {
        self.debug_mode = debug;
    }

    pub(crate) fn set_s3_region(&mut self, region: Option<String>) {
        self.s3_region = region;
    }
}
