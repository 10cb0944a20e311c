//! Streaming search export (`/services/search/v2/jobs/export`).
//!
//! Responsibilities:
//! - Submit a one-shot search whose results stream back in the response body.
//! - Split the newline-delimited JSON body into [`ExportRow`]s as bytes arrive.
//!
//! Does NOT handle:
//! - Skipping preview rows or deciding which messages are fatal (callers do).
//! - Bounding how long a row may take to arrive.
//!
//! Invariants:
//! - At most one partial line is buffered; complete lines are parsed and released.
//! - A trailing line without a newline is still parsed at end of body.

use bytes::BytesMut;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::search::SearchOptions;
use crate::endpoints::send_request_with_retry;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::SplunkMessage;
use crate::redact_query;

/// One line of export output.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportRow {
    /// Set on rows produced while a reporting search is still running.
    #[serde(default)]
    pub preview: bool,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub lastrow: Option<bool>,
    /// The result record, fields in server order.
    #[serde(default)]
    pub result: Option<Map<String, Value>>,
    #[serde(default)]
    pub messages: Vec<SplunkMessage>,
}

/// Incremental reader over an export response body.
#[derive(Debug)]
pub struct ExportStream {
    response: Response,
    buffer: BytesMut,
    finished: bool,
    bytes_read: u64,
}

impl ExportStream {
    pub(crate) fn new(response: Response) -> Self {
        Self {
            response,
            buffer: BytesMut::new(),
            finished: false,
            bytes_read: 0,
        }
    }

    /// Total body bytes received so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Read the next row, or `None` once the body is exhausted.
    ///
    /// Blank lines are skipped. A line that is not valid JSON fails with
    /// [`ClientError::InvalidResponse`].
    pub async fn next_row(&mut self) -> Result<Option<ExportRow>> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
                let line = self.buffer.split_to(pos + 1);
                if let Some(row) = parse_line(&line[..pos])? {
                    return Ok(Some(row));
                }
                continue;
            }

            if self.finished {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let rest = self.buffer.split();
                return parse_line(&rest);
            }

            match self.response.chunk().await? {
                Some(chunk) => {
                    self.bytes_read += chunk.len() as u64;
                    self.buffer.extend_from_slice(&chunk);
                }
                None => self.finished = true,
            }
        }
    }
}

fn parse_line(line: &[u8]) -> Result<Option<ExportRow>> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(line)
        .map(Some)
        .map_err(|e| ClientError::InvalidResponse(format!("Malformed export row: {}", e)))
}

/// Start a streaming export and return a reader over its rows.
///
/// The HTTP status is checked before any row is read, so an invalid query
/// fails here rather than mid-stream.
#[allow(clippy::too_many_arguments)]
pub async fn export_search(
    client: &Client,
    base_url: &str,
    authorization: &str,
    query: &str,
    options: &SearchOptions,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<ExportStream> {
    debug!("Starting export: {}", redact_query(query));

    let url = format!("{}/services/search/v2/jobs/export", base_url);

    let mut form_data: Vec<(&str, String)> = vec![
        ("search", query.to_string()),
        ("output_mode", "json".to_string()),
    ];
    form_data.extend(options.form_params());

    let builder = client
        .post(&url)
        .header("Authorization", authorization)
        .form(&form_data);
    let response = send_request_with_retry(
        builder,
        max_retries,
        "/services/search/v2/jobs/export",
        "POST",
        metrics,
    )
    .await?;

    Ok(ExportStream::new(response))
}
