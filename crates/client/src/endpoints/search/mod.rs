//! Search job endpoints.
//!
//! # What this module handles:
//! - Search job creation, status, results paging and cancellation
//! - The shared [`SearchOptions`] form parameters (also used by export)
//!
//! # What this module does NOT handle:
//! - Polling policy and progress timeouts (see the export pipeline)
//! - Streaming export (see [`super::export`])

pub mod jobs;
pub mod types;

pub use jobs::{cancel_job, create_job, get_job_status, get_results};
pub use types::SearchOptions;
