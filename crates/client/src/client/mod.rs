//! Main Splunk REST API client and API methods.
//!
//! This module provides the primary [`SplunkClient`] for interacting with the
//! Splunk Enterprise REST API. It automatically handles authentication and
//! session management.
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//! - `session`: Session token management helpers (private module)
//! - `search`: Export and search job methods
//! - `shc`: Search Head Cluster membership
//!
//! # What this module does NOT handle:
//! - Direct HTTP request implementation (delegated to [`crate::endpoints`])
//! - Low-level session token storage (delegated to [`crate::auth::SessionManager`])
//! - Authentication strategy configuration (handled by [`builder::SplunkClientBuilder`])
//!
//! # Invariants
//! - All API methods handle 401/403 authentication errors by refreshing the session
//!   and retrying once (for session-based authentication only; API tokens do not trigger retries)
//! - The `retry_call!` macro centralizes this retry pattern across all API methods

pub mod builder;
mod session;

// API method submodules
mod search;
mod shc;

use crate::auth::SessionManager;
use crate::metrics::MetricsCollector;

/// Macro to wrap an async API call with automatic session retry on 401/403 errors.
///
/// This macro centralizes the authentication retry pattern used across all API methods.
/// When a 401 or 403 error is received and the client is using session-based auth
/// (not API token auth), it clears the session, re-authenticates, and retries the call once.
///
/// # Usage
///
/// ```ignore
/// retry_call!(self, __token, endpoints::some_endpoint(&self.http, &self.base_url, __token, arg1, arg2).await)
/// ```
///
/// The placeholder `__token` will be replaced with the actual auth token.
#[macro_export]
macro_rules! retry_call {
    ($self:expr, $token:ident, $call:expr) => {{
        let $token = $self.get_auth_token().await?;
        let result = $call;

        match result {
            Ok(data) => Ok(data),
            Err($crate::error::ClientError::ApiError { status, .. })
                if (status == 401 || status == 403) && !$self.is_api_token_auth() =>
            {
                ::tracing::debug!(
                    "Session expired (status {}), clearing and re-authenticating...",
                    status
                );
                $self.session_manager.clear_session();
                let $token = $self.get_auth_token().await?;
                $call
            }
            Err(e) => Err(e),
        }
    }};
}

/// Splunk REST API client.
///
/// This client provides methods for interacting with the Splunk Enterprise
/// REST API. It automatically handles authentication and session management.
///
/// One client talks to one host. Clients built for different hosts can
/// share a `reqwest::Client` through [`builder::SplunkClientBuilder::http_client`].
///
/// # Creating a Client
///
/// Use [`SplunkClient::builder()`] to create a new client:
///
/// ```rust,ignore
/// use splunk_client::{SplunkClient, AuthStrategy};
/// use secrecy::SecretString;
///
/// let client = SplunkClient::builder()
///     .base_url("https://localhost:8089".to_string())
///     .auth_strategy(AuthStrategy::ApiToken {
///         token: SecretString::new("my-token".to_string().into()),
///     })
///     .build()?;
/// ```
///
/// # Authentication
///
/// The client supports two authentication strategies:
/// - `AuthStrategy::SessionToken`: Username/password with automatic session management
/// - `AuthStrategy::ApiToken`: Static API token (no session management needed)
#[derive(Debug)]
pub struct SplunkClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) session_manager: SessionManager,
    pub(crate) max_retries: usize,
    pub(crate) session_ttl_seconds: u64,
    pub(crate) session_expiry_buffer_seconds: u64,
    pub(crate) metrics: Option<MetricsCollector>,
}

impl SplunkClient {
    /// Create a new client builder.
    ///
    /// This is the entry point for constructing a [`SplunkClient`].
    pub fn builder() -> builder::SplunkClientBuilder {
        builder::SplunkClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Maximum number of retries for transient HTTP failures.
    pub fn max_retries(&self) -> usize {
        self.max_retries
    }
}
