//! Transient HTTP failure retry tests.
//!
//! # Invariants
//! - 429/502/503/504 are retried up to `max_retries` times
//! - Other error statuses fail immediately
//! - Exhausted retries surface the last response as `ApiError`

mod common;

use common::*;
use splunk_client::ClientError;
use wiremock::matchers::{method, path};

async fn create_job(server: &MockServer, max_retries: usize) -> Result<String, ClientError> {
    endpoints::create_job(
        &Client::new(),
        &server.uri(),
        "Bearer test-token",
        "search index=main",
        &endpoints::SearchOptions::default(),
        max_retries,
        None,
    )
    .await
}

#[tokio::test]
async fn test_retry_after_rate_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/search/jobs"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/services/search/jobs"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(load_fixture("search/create_job_success.json")),
        )
        .mount(&mock_server)
        .await;

    let sid = create_job(&mock_server, 1).await.unwrap();
    assert_eq!(sid, "1697545200.42");
}

#[tokio::test]
async fn test_exhausted_retries_return_last_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/search/jobs"))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
            "messages": [{"type": "ERROR", "text": "Search head is restarting"}]
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let err = create_job(&mock_server, 1).await.unwrap_err();

    match err {
        ClientError::ApiError {
            status, message, ..
        } => {
            assert_eq!(status, 503);
            assert!(message.contains("restarting"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_client_error_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/search/jobs"))
        .respond_with(
            ResponseTemplate::new(400)
                .insert_header("X-Splunk-Request-Id", "req-abc")
                .set_body_json(serde_json::json!({
                    "messages": [{"type": "FATAL", "text": "Unknown search command 'foo'"}]
                })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = create_job(&mock_server, 3).await.unwrap_err();

    assert!(!err.is_retryable());
    match err {
        ClientError::ApiError {
            status,
            request_id,
            message,
            ..
        } => {
            assert_eq!(status, 400);
            assert_eq!(request_id.as_deref(), Some("req-abc"));
            assert!(message.contains("Unknown search command"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
