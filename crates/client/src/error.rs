//! Error types for the Splunk client.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during Splunk client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API error response from Splunk.
    #[error("API error ({status}) at {url}: {message}{}", .request_id.as_ref().map(|id| format!(" [Request ID: {id}]")).unwrap_or_default())]
    ApiError {
        status: u16,
        url: String,
        message: String,
        request_id: Option<String>,
    },

    /// Session expired and could not be renewed.
    #[error("Session expired for user '{username}', please re-authenticate")]
    SessionExpired { username: String },

    /// Invalid response format from Splunk.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// An operation did not finish within its time budget.
    #[error("Operation '{operation}' timed out after {timeout:?}")]
    OperationTimeout {
        operation: &'static str,
        timeout: Duration,
    },

    /// The search itself reported a fatal condition.
    #[error("Search failed: {0}")]
    SearchFailed(String),

    /// Maximum retries exceeded.
    #[error("Maximum retries exceeded ({0} attempts)")]
    MaxRetriesExceeded(usize),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::HttpError(_) | Self::OperationTimeout { .. })
    }

    /// Check if an HTTP status code is retryable.
    ///
    /// Retryable status codes:
    /// - 429: Too Many Requests (rate limiting)
    /// - 502: Bad Gateway (transient server error)
    /// - 503: Service Unavailable (transient server error)
    /// - 504: Gateway Timeout (transient server error)
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(status, 429 | 502 | 503 | 504)
    }

    /// Check if this error indicates authentication failure.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Self::AuthFailed(_) | Self::SessionExpired { .. } => true,
            Self::ApiError { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }

    /// Check if this error means the remote side stopped making progress in time.
    ///
    /// Covers reqwest's own request/read timeouts as well as operation
    /// budgets enforced by this crate.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::OperationTimeout { .. } => true,
            Self::HttpError(e) => e.is_timeout(),
            Self::ApiError { status, .. } => *status == 504,
            _ => false,
        }
    }
}
