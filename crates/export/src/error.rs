//! Error taxonomy for the export pipeline.
//!
//! Responsibilities:
//! - Separate fatal run-level errors ([`ExportError`]) from per-job errors
//!   ([`SearchError`]) and per-sink errors ([`LocalWriteError`], [`RemoteWriteError`]).
//! - Provide a serializable [`ErrorKind`] tag recorded in the run summary.
//!
//! Does NOT handle:
//! - Deciding what is retried (see `orchestrator`).
//!
//! Invariants:
//! - Only `SearchError::Timeout` is ever retried.
//! - Error messages never include credentials or raw queries.

use serde::{Deserialize, Serialize};
use splunk_client::ClientError;
use splunk_export_config::ConfigError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that abort a run before any job executes.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Host resolution failed: {0}")]
    Resolution(#[from] ResolutionError),
}

impl ExportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Resolution(_) => ErrorKind::Resolution,
        }
    }
}

impl From<ConfigError> for ExportError {
    fn from(err: ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Why the VIP could not be turned into a target list.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("VIP {vip} is unreachable: {source}")]
    Unreachable {
        vip: String,
        #[source]
        source: ClientError,
    },

    #[error("VIP {vip} returned a malformed member list: {message}")]
    Malformed { vip: String, message: String },

    #[error("VIP {vip} returned no usable cluster members")]
    NoMembers { vip: String },

    #[error("VIP {vip} reported members that are not up: {}", .members.join(", "))]
    UnhealthyMembers { vip: String, members: Vec<String> },
}

/// Failure of one search execution against one target.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search on {host} failed: {message}")]
    Execution { host: String, message: String },

    #[error("Search on {host} made no progress for {after:?}")]
    Timeout { host: String, after: Duration },

    #[error("Search cancelled")]
    Cancelled,
}

impl SearchError {
    /// Classify a client error raised while talking to `host`.
    ///
    /// Transport timeouts and gateway timeouts count as a timeout of the
    /// execution; everything else is an execution failure.
    pub fn from_client(host: &str, err: ClientError, after: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                host: host.to_string(),
                after,
            }
        } else {
            Self::Execution {
                host: host.to_string(),
                message: err.to_string(),
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Execution { .. } => ErrorKind::SearchExecution,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }
}

/// Failure of the local-file sink for one job.
#[derive(Debug, Error)]
pub enum LocalWriteError {
    #[error("Path {} is written by another job in this run", .path.display())]
    PathCollision { path: PathBuf },

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of the object-storage sink for one job.
#[derive(Debug, Error)]
pub enum RemoteWriteError {
    #[error("Failed to spool object {key}: {source}")]
    Spool {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to upload object {key}: {source}")]
    Upload {
        key: String,
        #[source]
        source: opendal::Error,
    },
}

/// Serializable error tag recorded in the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Resolution,
    SearchExecution,
    Timeout,
    Cancelled,
    LocalWrite,
    RemoteWrite,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_timeout_maps_to_timeout() {
        let err = SearchError::from_client(
            "sh1",
            ClientError::OperationTimeout {
                operation: "export",
                timeout: Duration::from_secs(5),
            },
            Duration::from_secs(300),
        );
        assert!(err.is_timeout());
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn test_gateway_timeout_maps_to_timeout() {
        let err = SearchError::from_client(
            "sh1",
            ClientError::ApiError {
                status: 504,
                url: "https://sh1:8089/services/search/v2/jobs/export".to_string(),
                message: "Gateway Timeout".to_string(),
                request_id: None,
            },
            Duration::from_secs(300),
        );
        assert!(err.is_timeout());
    }

    #[test]
    fn test_auth_failure_is_execution_error() {
        let err = SearchError::from_client(
            "sh1",
            ClientError::ApiError {
                status: 401,
                url: "https://sh1:8089/services/auth/login".to_string(),
                message: "Login failed".to_string(),
                request_id: Some("abc".to_string()),
            },
            Duration::from_secs(300),
        );
        assert_eq!(err.kind(), ErrorKind::SearchExecution);
        assert!(err.to_string().contains("sh1"));
    }

    #[test]
    fn test_error_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::SearchExecution).unwrap(),
            "\"search_execution\""
        );
        assert_eq!(
            serde_json::to_string(&ErrorKind::RemoteWrite).unwrap(),
            "\"remote_write\""
        );
    }

    #[test]
    fn test_unhealthy_members_message() {
        let err = ResolutionError::UnhealthyMembers {
            vip: "vip.example.com:8089".to_string(),
            members: vec!["sh2".to_string(), "sh3".to_string()],
        };
        assert!(err.to_string().ends_with("sh2, sh3"));
    }
}
