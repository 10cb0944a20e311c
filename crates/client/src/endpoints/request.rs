//! Retry helper for HTTP requests with exponential backoff.
//!
//! Responsibilities:
//! - Retry transient statuses (429, 502, 503, 504) with `2^attempt` second backoff.
//! - Turn every other non-success response into [`ClientError::ApiError`],
//!   carrying Splunk's messages and the `X-Splunk-Request-Id` header.
//! - Record request/retry/error metrics when a collector is supplied.
//!
//! Does NOT handle:
//! - Re-authentication on 401/403 (see the `retry_call!` macro).
//! - Timeouts of long-running streams (callers bound those themselves).

use reqwest::{RequestBuilder, Response};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::SplunkMessages;

/// Sends an HTTP request, retrying transient failures.
///
/// `max_retries` counts retries after the first attempt; zero means a
/// single attempt. When retries are exhausted the last response is returned
/// as an [`ClientError::ApiError`].
pub async fn send_request_with_retry(
    builder: RequestBuilder,
    max_retries: usize,
    endpoint: &str,
    method: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    for attempt in 0..=max_retries {
        let attempt_builder = match builder.try_clone() {
            Some(cloned) => cloned,
            None if attempt == 0 => {
                debug!("Request builder cannot be cloned, single attempt only");
                let response = builder.send().await?;
                return check_status(response).await;
            }
            None => return Err(ClientError::MaxRetriesExceeded(attempt)),
        };

        if let Some(m) = metrics {
            m.record_request(endpoint, method);
            if attempt > 0 {
                m.record_retry(endpoint, method, attempt);
            }
        }

        let started = Instant::now();
        let response = match attempt_builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = ClientError::from(e);
                if let Some(m) = metrics {
                    m.record_request_duration(endpoint, method, started.elapsed(), None);
                    m.record_client_error(endpoint, method, &err);
                }
                return Err(err);
            }
        };

        let status = response.status().as_u16();
        if let Some(m) = metrics {
            m.record_request_duration(endpoint, method, started.elapsed(), Some(status));
        }

        if ClientError::is_retryable_status(status) && attempt < max_retries {
            let backoff_secs = 2u64.pow(attempt as u32);
            debug!(
                status,
                attempt = attempt + 1,
                max_attempts = max_retries + 1,
                backoff_secs,
                "Transient HTTP status, retrying with exponential backoff"
            );
            tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
            continue;
        }

        if attempt > 0 && response.status().is_success() {
            debug!(attempt = attempt + 1, "Request succeeded after retry");
        }

        let result = check_status(response).await;
        if let (Err(err), Some(m)) = (&result, metrics) {
            m.record_client_error(endpoint, method, err);
        }
        return result;
    }

    Err(ClientError::MaxRetriesExceeded(max_retries + 1))
}

/// Pass successful responses through; convert failures to `ApiError`.
async fn check_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let url = response.url().to_string();
    let request_id = response
        .headers()
        .get("X-Splunk-Request-Id")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response body".to_string());

    Err(ClientError::ApiError {
        status,
        url,
        message: error_message(&body),
        request_id,
    })
}

/// Prefer Splunk's structured `messages` over the raw body.
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<SplunkMessages>(body) {
        Ok(m) if !m.messages.is_empty() => m
            .messages
            .iter()
            .map(|msg| format!("{}: {}", msg.message_type, msg.text))
            .collect::<Vec<_>>()
            .join("; "),
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_splunk_messages() {
        let body = r#"{"messages":[{"type":"FATAL","text":"Unknown search command 'foo'."}]}"#;
        assert_eq!(error_message(body), "FATAL: Unknown search command 'foo'.");
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");
    }
}
