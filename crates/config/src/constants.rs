//! Centralized constants for the splunk-export workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication and improve maintainability.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default session time-to-live in seconds (1 hour).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

/// Default buffer time before session expiry to proactively refresh tokens.
pub const DEFAULT_EXPIRY_BUFFER_SECS: u64 = 60;

/// Maximum allowed connection timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Maximum allowed session TTL in seconds (24 hours).
pub const MAX_SESSION_TTL_SECS: u64 = 86400;

/// Default Splunk management port.
pub const DEFAULT_SPLUNK_PORT: u16 = 8089;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Default maximum number of retries for rate-limited requests.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Upper bound for `connection.max_retries`.
pub const MAX_MAX_RETRIES: usize = 10;

// =============================================================================
// Search & Polling Defaults
// =============================================================================

/// Default polling interval for job status checks in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Default time without progress before a search execution is timed out.
pub const DEFAULT_PROGRESS_TIMEOUT_SECS: u64 = 300;

/// Maximum allowed progress timeout in seconds (24 hours).
pub const MAX_PROGRESS_TIMEOUT_SECS: u64 = 86400;

/// Default page size when paging through job results.
pub const DEFAULT_SEARCH_PAGE_SIZE: u64 = 1000;

/// Upper bound for a results page; Splunk's default `maxresultrows`.
pub const MAX_SEARCH_PAGE_SIZE: u64 = 50_000;

/// Upper bound for `search.window.periods`.
pub const MAX_WINDOW_PERIODS: u32 = 10_000;

/// Zone naive window start times are read in.
pub const DEFAULT_WINDOW_TIMEZONE: &str = "UTC";

/// Default sampling ratio (1 = no sampling).
pub const DEFAULT_SAMPLE_RATIO: u32 = 1;

// =============================================================================
// Execution Defaults
// =============================================================================

/// Default number of search executions running at the same time.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Upper bound for concurrent executions. Splunk's default per-user
/// search concurrency limit is 50.
pub const MAX_CONCURRENCY: usize = 50;

/// Default number of retries after a search execution times out.
pub const DEFAULT_TIMEOUT_RETRIES: u32 = 2;

/// Upper bound for `execution.timeout_retries`.
pub const MAX_TIMEOUT_RETRIES: u32 = 10;

/// Default delay between timeout retries in milliseconds.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

// =============================================================================
// Output Defaults
// =============================================================================

/// Default number of records held in memory between producer and sinks.
pub const DEFAULT_CHUNK_RECORDS: usize = 1000;

/// Default artifact file name template.
pub const DEFAULT_FILE_NAME_TEMPLATE: &str = "splunk_export_<host>_<ts>_<freq>.json";

/// Default root directory for the local file sink.
pub const DEFAULT_LOCAL_ROOT: &str = "exports";

/// Default configuration file looked up by the binary.
pub const DEFAULT_CONFIG_FILE: &str = "splunk-export.toml";
