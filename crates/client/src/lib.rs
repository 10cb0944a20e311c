//! Splunk REST API client.
//!
//! This crate provides a type-safe client for the parts of the Splunk
//! Enterprise REST API an export pipeline needs: streaming exports, search
//! jobs with paged results, and Search Head Cluster membership. It supports
//! both session token and API token authentication with automatic session
//! renewal.

mod auth;
pub mod client;
pub mod error;
pub mod metrics;
pub mod models;
mod redaction;
mod serde_helpers;

pub mod endpoints;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use auth::{AuthStrategy, SessionManager};
pub use client::SplunkClient;
pub use client::builder::SplunkClientBuilder;
pub use endpoints::{ExportRow, ExportStream, SearchOptions};
pub use error::{ClientError, Result};
pub use metrics::{ErrorCategory, MetricsCollector};
pub use models::{
    MessageType, SearchJobResults, SearchJobStatus, ShcMember, ShcMemberStatus, SplunkMessage,
    SplunkMessages,
};
pub use redaction::redact_query;
