//! REST call metrics.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! binary installs a recorder.
//!
//! # Invariants
//! - Every metric carries `endpoint` and `method` labels.
//! - Recording never fails.

use crate::error::ClientError;
use std::time::Duration;

/// Request latency histogram, labelled with the response status.
pub const METRIC_REQUEST_DURATION: &str = "splunk_api_request_duration_seconds";

/// Every attempt, retries included.
pub const METRIC_REQUESTS_TOTAL: &str = "splunk_api_requests_total";

pub const METRIC_RETRIES_TOTAL: &str = "splunk_api_retries_total";

pub const METRIC_ERRORS_TOTAL: &str = "splunk_api_errors_total";

/// Coarse failure class used as the `error_category` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Timeout,
    Auth,
    Client,
    Server,
    Response,
    Other,
}

impl ErrorCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Transport => "transport",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Client => "http_4xx",
            ErrorCategory::Server => "http_5xx",
            ErrorCategory::Response => "response",
            ErrorCategory::Other => "other",
        }
    }
}

impl From<&ClientError> for ErrorCategory {
    fn from(error: &ClientError) -> Self {
        if error.is_timeout() {
            return ErrorCategory::Timeout;
        }
        if error.is_auth_error() {
            return ErrorCategory::Auth;
        }
        match error {
            ClientError::ApiError { status, .. } if *status >= 500 => ErrorCategory::Server,
            ClientError::ApiError { status, .. } if *status >= 400 => ErrorCategory::Client,
            ClientError::HttpError(e) if e.is_connect() => ErrorCategory::Transport,
            ClientError::HttpError(e) if e.is_decode() => ErrorCategory::Response,
            ClientError::InvalidResponse(_) | ClientError::SearchFailed(_) => {
                ErrorCategory::Response
            }
            _ => ErrorCategory::Other,
        }
    }
}

/// Records per-endpoint request metrics for one client.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector;

impl MetricsCollector {
    pub fn new() -> Self {
        Self
    }

    /// `status` is `None` when no response was received.
    pub fn record_request_duration(
        &self,
        endpoint: &str,
        method: &str,
        duration: Duration,
        status: Option<u16>,
    ) {
        let status = status.map_or_else(|| "error".to_string(), |s| s.to_string());
        metrics::histogram!(METRIC_REQUEST_DURATION,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
            "status" => status,
        )
        .record(duration.as_secs_f64());
    }

    pub fn record_request(&self, endpoint: &str, method: &str) {
        metrics::counter!(METRIC_REQUESTS_TOTAL,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
        )
        .increment(1);
    }

    /// `attempt` is the 1-based retry number.
    pub fn record_retry(&self, endpoint: &str, method: &str, attempt: usize) {
        metrics::counter!(METRIC_RETRIES_TOTAL,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
            "attempt" => attempt.to_string(),
        )
        .increment(1);
    }

    pub fn record_client_error(&self, endpoint: &str, method: &str, error: &ClientError) {
        metrics::counter!(METRIC_ERRORS_TOTAL,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
            "error_category" => ErrorCategory::from(error).as_str(),
        )
        .increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16) -> ClientError {
        ClientError::ApiError {
            status,
            url: "https://sh1:8089/services/search/jobs".to_string(),
            message: "failed".to_string(),
            request_id: None,
        }
    }

    #[test]
    fn test_status_categories() {
        assert_eq!(ErrorCategory::from(&api_error(400)), ErrorCategory::Client);
        assert_eq!(ErrorCategory::from(&api_error(503)), ErrorCategory::Server);
        assert_eq!(ErrorCategory::from(&api_error(500)).as_str(), "http_5xx");
    }

    #[test]
    fn test_timeouts_and_auth_are_distinct() {
        let timeout = ClientError::OperationTimeout {
            operation: "export",
            timeout: Duration::from_secs(1),
        };
        assert_eq!(ErrorCategory::from(&timeout), ErrorCategory::Timeout);

        let auth = ClientError::AuthFailed("bad password".to_string());
        assert_eq!(ErrorCategory::from(&auth), ErrorCategory::Auth);
    }

    #[test]
    fn test_search_failure_is_response_category() {
        let err = ClientError::SearchFailed("Error in 'search' command".to_string());
        assert_eq!(ErrorCategory::from(&err), ErrorCategory::Response);
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        let collector = MetricsCollector::new();
        collector.record_request("/services/search/jobs", "POST");
        collector.record_client_error("/services/search/jobs", "POST", &api_error(502));
    }
}
