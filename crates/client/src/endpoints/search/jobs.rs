//! Search job operations.
//!
//! # What this module handles:
//! - Creating search jobs
//! - Getting job status
//! - Retrieving one page of results
//! - Cancelling a job
//!
//! # What this module does NOT handle:
//! - Deciding when to poll or give up (see the export pipeline)

use reqwest::Client;
use tracing::debug;

use super::types::SearchOptions;
use crate::endpoints::{encode_path_segment, extract_entry_content, send_request_with_retry};
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{SearchJobResults, SearchJobStatus};
use crate::redact_query;

/// Create a new search job, returning its SID.
#[allow(clippy::too_many_arguments)]
pub async fn create_job(
    client: &Client,
    base_url: &str,
    authorization: &str,
    query: &str,
    options: &SearchOptions,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<String> {
    debug!("Creating search job: {}", redact_query(query));

    let url = format!("{}/services/search/jobs", base_url);

    let mut form_data: Vec<(&str, String)> = vec![
        ("search", query.to_string()),
        ("output_mode", "json".to_string()),
        ("exec_mode", "normal".to_string()),
    ];
    form_data.extend(options.form_params());

    let builder = client
        .post(&url)
        .header("Authorization", authorization)
        .form(&form_data);
    let response =
        send_request_with_retry(builder, max_retries, "/services/search/jobs", "POST", metrics)
            .await?;

    let resp: serde_json::Value = response.json().await?;

    // Splunk can return either:
    // - `{ "sid": "<sid>" }` (common on newer versions / certain output modes)
    // - `{ "entry": [ { "content": { "sid": "<sid>" } } ] }` (older/alternate shape)
    let sid = resp
        .get("sid")
        .and_then(|v| v.as_str())
        .or_else(|| {
            resp.get("entry")?
                .get(0)?
                .get("content")?
                .get("sid")?
                .as_str()
        })
        .ok_or_else(|| ClientError::InvalidResponse("Missing sid in response".to_string()))?;

    Ok(sid.to_string())
}

/// Get the status of a search job.
pub async fn get_job_status(
    client: &Client,
    base_url: &str,
    authorization: &str,
    sid: &str,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<SearchJobStatus> {
    debug!("Getting status for job: {}", sid);

    let url = format!(
        "{}/services/search/jobs/{}",
        base_url,
        encode_path_segment(sid)
    );

    let builder = client
        .get(&url)
        .header("Authorization", authorization)
        .query(&[("output_mode", "json")]);
    let response = send_request_with_retry(
        builder,
        max_retries,
        "/services/search/jobs/{sid}",
        "GET",
        metrics,
    )
    .await?;

    let resp: serde_json::Value = response.json().await?;

    let content = extract_entry_content(&resp)?;
    serde_json::from_value(content.clone())
        .map_err(|e| ClientError::InvalidResponse(format!("Failed to parse job status: {}", e)))
}

/// Get one page of results from a finished search job.
#[allow(clippy::too_many_arguments)]
pub async fn get_results(
    client: &Client,
    base_url: &str,
    authorization: &str,
    sid: &str,
    count: u64,
    offset: u64,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<SearchJobResults> {
    debug!(sid, count, offset, "Getting results page");

    let url = format!(
        "{}/services/search/jobs/{}/results",
        base_url,
        encode_path_segment(sid)
    );

    let builder = client
        .get(&url)
        .header("Authorization", authorization)
        .query(&[
            ("output_mode", "json".to_string()),
            ("count", count.to_string()),
            ("offset", offset.to_string()),
        ]);
    let response = send_request_with_retry(
        builder,
        max_retries,
        "/services/search/jobs/{sid}/results",
        "GET",
        metrics,
    )
    .await?;

    let body = response.text().await?;
    if body.trim().is_empty() {
        return Ok(SearchJobResults::default());
    }

    serde_json::from_str(&body).map_err(|e| {
        ClientError::InvalidResponse(format!("Failed to parse search results response: {}", e))
    })
}

/// Cancel a search job and release its artifacts on the server.
pub async fn cancel_job(
    client: &Client,
    base_url: &str,
    authorization: &str,
    sid: &str,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<()> {
    debug!("Cancelling job: {}", sid);

    let url = format!(
        "{}/services/search/jobs/{}/control",
        base_url,
        encode_path_segment(sid)
    );

    let builder = client
        .post(&url)
        .header("Authorization", authorization)
        .form(&[("action", "cancel"), ("output_mode", "json")]);
    send_request_with_retry(
        builder,
        max_retries,
        "/services/search/jobs/{sid}/control",
        "POST",
        metrics,
    )
    .await?;

    Ok(())
}
