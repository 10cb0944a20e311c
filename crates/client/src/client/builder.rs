//! Client builder for constructing [`SplunkClient`] instances.
//!
//! Invariants:
//! - `base_url` and `auth_strategy` must be set before `build()`.
//! - The base URL never keeps trailing slashes.
//! - No whole-request timeout is set: export bodies stream for as long as the
//!   search produces rows. `timeout` bounds connecting, `read_timeout` bounds
//!   silence between reads.

use std::time::Duration;

use crate::auth::{AuthStrategy, SessionManager};
use crate::client::SplunkClient;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use splunk_export_config::{
    Config,
    constants::{
        DEFAULT_EXPIRY_BUFFER_SECS, DEFAULT_MAX_REDIRECTS, DEFAULT_MAX_RETRIES,
        DEFAULT_SESSION_TTL_SECS, DEFAULT_TIMEOUT_SECS,
    },
};

/// Builder for a per-host [`SplunkClient`].
///
/// One builder is usually prepared with [`Self::from_config`] and cloned for
/// every host, sharing a single HTTP connection pool:
///
/// ```rust,ignore
/// let template = SplunkClient::builder().from_config(&config);
/// let http = template.build_http_client()?;
/// let client = template
///     .clone()
///     .base_url("https://sh1.example.com:8089".to_string())
///     .http_client(http)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct SplunkClientBuilder {
    base_url: Option<String>,
    auth_strategy: Option<AuthStrategy>,
    skip_verify: bool,
    timeout: Duration,
    read_timeout: Option<Duration>,
    max_retries: usize,
    session_ttl_seconds: u64,
    session_expiry_buffer_seconds: u64,
    metrics: Option<MetricsCollector>,
    http: Option<reqwest::Client>,
}

impl Default for SplunkClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            auth_strategy: None,
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            read_timeout: None,
            max_retries: DEFAULT_MAX_RETRIES,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECS,
            session_expiry_buffer_seconds: DEFAULT_EXPIRY_BUFFER_SECS,
            metrics: None,
            http: None,
        }
    }
}

impl SplunkClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheme, host and port, e.g. `https://sh1.example.com:8089`.
    pub fn base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    pub fn auth_strategy(mut self, strategy: AuthStrategy) -> Self {
        self.auth_strategy = Some(strategy);
        self
    }

    /// Accept invalid TLS certificates. Has no effect on `http://` URLs.
    pub fn skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = skip;
        self
    }

    /// Use an existing HTTP client instead of building one.
    ///
    /// Timeout and TLS settings on this builder are ignored when a client is
    /// supplied; they belong to whoever built it.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Retries for 429/5xx responses, with exponential backoff.
    pub fn max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    /// Copy auth, TLS, timeout, retry and session settings from `config`.
    ///
    /// The base URL is not taken from the config: one configuration fans out
    /// to many hosts, so callers set it per host with [`Self::base_url`].
    ///
    /// The read timeout is raised to the search progress timeout so a quiet
    /// but healthy export is not cut off by the transport. API metrics are
    /// collected when a metrics endpoint is configured.
    pub fn from_config(mut self, config: &Config) -> Self {
        if let Some(strategy) = config.auth.strategy() {
            self.auth_strategy = Some(AuthStrategy::from(&strategy));
        }
        self.skip_verify = config.connection.skip_verify;
        self.timeout = config.connection.timeout;
        self.read_timeout = Some(config.connection.timeout.max(config.search.progress_timeout()));
        self.max_retries = config.connection.max_retries;
        self.session_ttl_seconds = config.connection.session_ttl_seconds;
        self.session_expiry_buffer_seconds = config.connection.session_expiry_buffer_seconds;
        if config.telemetry.metrics_bind.is_some() {
            self.metrics = Some(MetricsCollector::new());
        }
        self
    }

    /// Build the shared HTTP client described by this builder's settings.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::HttpError` if the HTTP client fails to build.
    pub fn build_http_client(&self) -> Result<reqwest::Client> {
        let mut http_builder = reqwest::Client::builder()
            .connect_timeout(self.timeout)
            .read_timeout(self.read_timeout.unwrap_or(self.timeout))
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS));

        if self.skip_verify {
            http_builder = http_builder.danger_accept_invalid_certs(true);
        }

        Ok(http_builder.build()?)
    }

    fn normalize_base_url(url: String) -> String {
        url.trim_end_matches('/').to_string()
    }

    /// Build the [`SplunkClient`] with the configured options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `base_url` was not provided.
    /// Returns [`ClientError::AuthFailed`] if `auth_strategy` was not provided.
    /// Returns `ClientError::HttpError` if the HTTP client fails to build.
    pub fn build(self) -> Result<SplunkClient> {
        let base_url = self
            .base_url
            .clone()
            .ok_or_else(|| ClientError::InvalidUrl("base_url is required".to_string()))?;
        let base_url = Self::normalize_base_url(base_url);

        let auth_strategy = self
            .auth_strategy
            .clone()
            .ok_or_else(|| ClientError::AuthFailed("auth_strategy is required".to_string()))?;

        if self.skip_verify && !base_url.starts_with("https://") {
            tracing::warn!(base_url = %base_url, "skip_verify has no effect on plain HTTP");
        }

        let http = match self.http.clone() {
            Some(http) => http,
            None => self.build_http_client()?,
        };

        Ok(SplunkClient {
            http,
            base_url,
            session_manager: SessionManager::new(auth_strategy),
            max_retries: self.max_retries,
            session_ttl_seconds: self.session_ttl_seconds,
            session_expiry_buffer_seconds: self.session_expiry_buffer_seconds,
            metrics: self.metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn config_with_token() -> Config {
        let mut config = Config::default();
        config.auth.token = Some(SecretString::new("test-token".to_string().into()));
        config
    }

    #[test]
    fn test_from_config_with_api_token() {
        let config = config_with_token();

        let client = SplunkClient::builder()
            .from_config(&config)
            .base_url("https://splunk.example.com:8089".to_string())
            .build();

        assert!(client.is_ok());
        let client = client.unwrap();
        assert_eq!(client.base_url(), "https://splunk.example.com:8089");
        assert!(client.is_api_token_auth());
    }

    #[test]
    fn test_from_config_with_session_token() {
        let mut config = Config::default();
        config.auth.username = Some("admin".to_string());
        config.auth.password = Some(SecretString::new("test-password".to_string().into()));

        let client = SplunkClient::builder()
            .from_config(&config)
            .base_url("https://splunk.example.com:8089".to_string())
            .build()
            .unwrap();

        assert!(!client.is_api_token_auth());
    }

    #[test]
    fn test_from_config_without_credentials_fails_build() {
        let client = SplunkClient::builder()
            .from_config(&Config::default())
            .base_url("https://splunk.example.com:8089".to_string())
            .build();

        assert!(matches!(client.unwrap_err(), ClientError::AuthFailed(_)));
    }

    #[test]
    fn test_from_config_preserves_settings() {
        let mut config = config_with_token();
        config.connection.skip_verify = true;
        config.connection.timeout = Duration::from_secs(120);
        config.connection.max_retries = 5;
        config.connection.session_ttl_seconds = 7200;
        config.connection.session_expiry_buffer_seconds = 120;
        config.search.progress_timeout_secs = 600;

        let builder = SplunkClient::builder().from_config(&config);

        assert!(builder.base_url.is_none());
        assert!(builder.skip_verify);
        assert_eq!(builder.timeout, Duration::from_secs(120));
        assert_eq!(builder.read_timeout, Some(Duration::from_secs(600)));
        assert_eq!(builder.max_retries, 5);
        assert_eq!(builder.session_ttl_seconds, 7200);
        assert_eq!(builder.session_expiry_buffer_seconds, 120);
    }

    #[test]
    fn test_shared_http_client_is_reused() {
        let builder = SplunkClient::builder().from_config(&config_with_token());
        let http = builder.build_http_client().unwrap();

        let a = SplunkClient::builder()
            .from_config(&config_with_token())
            .http_client(http.clone())
            .base_url("https://sh1:8089".to_string())
            .build()
            .unwrap();
        let b = SplunkClient::builder()
            .from_config(&config_with_token())
            .http_client(http)
            .base_url("https://sh2:8089/".to_string())
            .build()
            .unwrap();

        assert_eq!(a.base_url(), "https://sh1:8089");
        assert_eq!(b.base_url(), "https://sh2:8089");
    }

    #[test]
    fn test_normalize_base_url_strips_every_trailing_slash() {
        for input in ["https://sh1:8089", "https://sh1:8089/", "https://sh1:8089//"] {
            assert_eq!(
                SplunkClientBuilder::normalize_base_url(input.to_string()),
                "https://sh1:8089"
            );
        }
    }

    #[test]
    fn test_metrics_follow_telemetry_settings() {
        let mut config = config_with_token();
        assert!(SplunkClient::builder().from_config(&config).metrics.is_none());

        config.telemetry.metrics_bind = Some("127.0.0.1:9898".to_string());
        assert!(SplunkClient::builder().from_config(&config).metrics.is_some());
    }
}
