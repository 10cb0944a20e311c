//! Search job models for Splunk search API.
//!
//! # What this module handles:
//! - Search job status and results pages
//!
//! # What this module does NOT handle:
//! - HTTP transport (see [`crate::endpoints::search`])

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Search job status (detailed).
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SearchJobStatus {
    pub sid: String,
    #[serde(
        default,
        rename = "isDone",
        deserialize_with = "crate::serde_helpers::bool_from_bool_or_number"
    )]
    pub is_done: bool,
    #[serde(
        default,
        rename = "isFailed",
        deserialize_with = "crate::serde_helpers::bool_from_bool_or_number"
    )]
    pub is_failed: bool,
    #[serde(
        default,
        rename = "isFinalized",
        deserialize_with = "crate::serde_helpers::bool_from_bool_or_number"
    )]
    pub is_finalized: bool,
    /// `QUEUED`, `PARSING`, `RUNNING`, `FINALIZING`, `DONE` or `FAILED`.
    #[serde(default, rename = "dispatchState")]
    pub dispatch_state: Option<String>,
    #[serde(rename = "doneProgress", default)]
    pub done_progress: f64,
    #[serde(rename = "runDuration", default)]
    pub run_duration: f64,
    #[serde(
        rename = "scanCount",
        default,
        deserialize_with = "crate::serde_helpers::usize_from_string_or_number"
    )]
    pub scan_count: usize,
    #[serde(
        rename = "eventCount",
        default,
        deserialize_with = "crate::serde_helpers::usize_from_string_or_number"
    )]
    pub event_count: usize,
    #[serde(
        rename = "resultCount",
        default,
        deserialize_with = "crate::serde_helpers::usize_from_string_or_number"
    )]
    pub result_count: usize,
    /// Job-level messages, keyed by severity (`{"fatal": ["..."]}`).
    #[serde(default)]
    pub messages: Option<Value>,
}

impl SearchJobStatus {
    /// True when Splunk reports the job as failed.
    pub fn has_failed(&self) -> bool {
        self.is_failed
            || self
                .dispatch_state
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case("FAILED"))
    }

    /// Fatal and error texts attached to the job, joined for reporting.
    pub fn failure_message(&self) -> Option<String> {
        let messages = self.messages.as_ref()?.as_object()?;
        let texts: Vec<String> = ["fatal", "error"]
            .iter()
            .filter_map(|level| messages.get(*level).and_then(|v| v.as_array()))
            .flatten()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        (!texts.is_empty()).then(|| texts.join("; "))
    }

    /// Snapshot used to detect whether a running job is still moving.
    pub fn progress_marker(&self) -> (Option<String>, u64, usize, usize, usize) {
        (
            self.dispatch_state.clone(),
            (self.done_progress * 1000.0) as u64,
            self.scan_count,
            self.event_count,
            self.result_count,
        )
    }
}

/// One page of search job results.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SearchJobResults {
    #[serde(default)]
    pub results: Vec<Map<String, Value>>,
    #[serde(default)]
    pub preview: bool,
    #[serde(
        default,
        rename = "init_offset",
        deserialize_with = "crate::serde_helpers::opt_usize_from_string_or_number"
    )]
    pub offset: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_search_job_status() {
        let json = r#"{
            "sid": "1697545200.42",
            "isDone": "1",
            "isFailed": false,
            "dispatchState": "DONE",
            "doneProgress": 1.0,
            "scanCount": "1200",
            "eventCount": 1200,
            "resultCount": "3"
        }"#;
        let status: SearchJobStatus = serde_json::from_str(json).unwrap();
        assert!(status.is_done);
        assert!(!status.has_failed());
        assert_eq!(status.result_count, 3);
        assert_eq!(status.scan_count, 1200);
    }

    #[test]
    fn test_failed_job_detection() {
        let status: SearchJobStatus = serde_json::from_str(
            r#"{
                "sid": "x",
                "dispatchState": "FAILED",
                "messages": {"fatal": ["Error in 'search' command"], "info": ["ignored"]}
            }"#,
        )
        .unwrap();
        assert!(status.has_failed());
        assert_eq!(
            status.failure_message().as_deref(),
            Some("Error in 'search' command")
        );
    }

    #[test]
    fn test_results_page_preserves_field_order() {
        let page: SearchJobResults = serde_json::from_str(
            r#"{"preview": false, "init_offset": 0, "results": [{"z": "1", "a": "2"}]}"#,
        )
        .unwrap();
        let keys: Vec<_> = page.results[0].keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }
}
