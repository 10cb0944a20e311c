//! REST API endpoint implementations.
//!
//! Every function here is a thin, stateless wrapper around one HTTP call:
//! it takes the shared `reqwest::Client`, the host's base URL and a ready
//! `Authorization` header value, and returns parsed models.
//!
//! # What this module does NOT handle:
//! - Session lifecycle and re-authentication (see [`crate::client`])
//! - Pipeline policy such as progress timeouts (callers decide)

mod auth;
mod export;
mod request;
pub mod search;
mod shc;
pub mod url_encoding;

pub use auth::login;
pub use export::{ExportRow, ExportStream, export_search};
pub use request::send_request_with_retry;
pub use search::{SearchOptions, cancel_job, create_job, get_job_status, get_results};
pub use shc::get_shc_members;
pub use url_encoding::encode_path_segment;

use crate::error::{ClientError, Result};

/// Return the `content` object of the first entry in an Atom-style JSON response.
pub(crate) fn extract_entry_content(resp: &serde_json::Value) -> Result<&serde_json::Value> {
    resp.get("entry")
        .and_then(|e| e.get(0))
        .and_then(|e| e.get("content"))
        .ok_or_else(|| ClientError::InvalidResponse("Missing entry content in response".into()))
}

/// Prefix a query with the `search` command unless it already starts with
/// a command (`search ...`) or a generating pipe (`| tstats ...`).
pub fn normalize_query(query: &str) -> String {
    let trimmed = query.trim();
    let starts_with_search = trimmed
        .split_whitespace()
        .next()
        .is_some_and(|first| first.eq_ignore_ascii_case("search"));
    if starts_with_search || trimmed.starts_with('|') {
        trimmed.to_string()
    } else {
        format!("search {}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("index=main"), "search index=main");
        assert_eq!(
            normalize_query("  search index=_internal | head 100 "),
            "search index=_internal | head 100"
        );
        assert_eq!(normalize_query("| tstats count"), "| tstats count");
        assert_eq!(normalize_query("Search index=a"), "Search index=a");
        assert_eq!(normalize_query("searchable=1"), "search searchable=1");
    }

    #[test]
    fn test_extract_entry_content() {
        let resp = serde_json::json!({"entry": [{"content": {"sid": "1"}}]});
        assert_eq!(extract_entry_content(&resp).unwrap()["sid"], "1");

        let empty = serde_json::json!({"entry": []});
        assert!(extract_entry_content(&empty).is_err());
    }
}
