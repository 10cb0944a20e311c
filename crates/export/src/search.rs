//! Search execution against one target.
//!
//! Responsibilities:
//! - Define the [`SearchClient`] seam the orchestrator drives.
//! - Run a job in `export` mode (streamed NDJSON) or `job` mode (create,
//!   poll, page) and feed its records into a bounded [`RecordStream`].
//! - Detect stalled executions and report them as timeouts.
//!
//! Does NOT handle:
//! - Retrying timed-out executions (see `orchestrator`).
//! - HTTP-level 429/5xx retries (see `splunk_client::endpoints`).
//!
//! Invariants:
//! - Every call to [`SearchClient::execute`] submits a fresh search.
//! - One authenticated client per host is shared by that host's jobs, so a
//!   session login happens once per host.
//! - Preview rows never reach the consumer.
//! - The progress timeout covers a call, never the wait for the host's client.

use splunk_client::{ClientError, SearchJobStatus, SplunkClient, SplunkClientBuilder};
use splunk_export_config::{Config, SearchMode};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{Instrument, debug, info_span, warn};

use crate::error::SearchError;
use crate::job::SearchJob;
use crate::record::{ExecutionState, RecordSender, RecordStream};

/// Executes one search job and yields its records lazily.
pub trait SearchClient: Send + Sync {
    fn execute(&self, job: &SearchJob) -> RecordStream;
}

/// Timing and buffering knobs for executions.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionSettings {
    pub progress_timeout: Duration,
    pub poll_interval: Duration,
    pub page_size: u64,
    /// Capacity of the record channel.
    pub buffer: usize,
}

impl ExecutionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            progress_timeout: config.search.progress_timeout(),
            poll_interval: Duration::from_millis(config.search.poll_interval_ms),
            page_size: config.search.page_size.max(1),
            buffer: config.output.chunk_records.max(1),
        }
    }
}

type SharedClient = Arc<Mutex<SplunkClient>>;

/// [`SearchClient`] backed by the Splunk REST API.
#[derive(Debug)]
pub struct SplunkSearchClient {
    builder: SplunkClientBuilder,
    http: reqwest::Client,
    settings: ExecutionSettings,
    clients: StdMutex<HashMap<String, SharedClient>>,
}

impl SplunkSearchClient {
    /// Build from configuration. One HTTP connection pool is shared by every host.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let builder = SplunkClient::builder().from_config(config);
        let http = builder.build_http_client()?;
        Ok(Self {
            builder,
            http,
            settings: ExecutionSettings::from_config(config),
            clients: StdMutex::new(HashMap::new()),
        })
    }

    pub fn settings(&self) -> ExecutionSettings {
        self.settings
    }

    fn client_for(&self, base_url: String) -> Result<SharedClient, ClientError> {
        let mut clients = self
            .clients
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(client) = clients.get(&base_url) {
            return Ok(Arc::clone(client));
        }
        let client = self
            .builder
            .clone()
            .base_url(base_url.clone())
            .http_client(self.http.clone())
            .build()?;
        let client = Arc::new(Mutex::new(client));
        clients.insert(base_url, Arc::clone(&client));
        Ok(client)
    }
}

impl SearchClient for SplunkSearchClient {
    fn execute(&self, job: &SearchJob) -> RecordStream {
        let host = job.target.to_string();
        let client = match self.client_for(job.target.base_url()) {
            Ok(client) => client,
            Err(e) => {
                return RecordStream::failed(SearchError::Execution {
                    host,
                    message: e.to_string(),
                });
            }
        };

        let settings = self.settings;
        let job = job.clone();
        let span = info_span!(
            "search",
            host = %host,
            window = %job.window,
            mode = ?job.mode,
        );

        RecordStream::spawn(settings.buffer, move |tx| {
            async move {
                let run = Execution {
                    client,
                    job,
                    host,
                    settings,
                };
                run.drive(tx).await;
            }
            .instrument(span)
        })
    }
}

struct Execution {
    client: SharedClient,
    job: SearchJob,
    host: String,
    settings: ExecutionSettings,
}

impl Execution {
    async fn drive(self, tx: RecordSender) {
        let outcome = match self.job.mode {
            SearchMode::Export => self.export(&tx).await,
            SearchMode::Job => self.poll_and_page(&tx).await,
        };
        match outcome {
            Ok(true) => tx.complete(),
            // Consumer went away.
            Ok(false) => {}
            Err(err) => {
                debug!(error = %err, "Search execution ended with an error");
                tx.fail(err).await;
            }
        }
    }

    fn timed_out(&self) -> SearchError {
        SearchError::Timeout {
            host: self.host.clone(),
            after: self.settings.progress_timeout,
        }
    }

    /// Run `call` under the progress timeout, mapping client errors.
    ///
    /// Callers lock the shared client first so queueing behind another job's
    /// backoff does not count against this job.
    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<T, SearchError> {
        match tokio::time::timeout(self.settings.progress_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(SearchError::from_client(
                &self.host,
                e,
                self.settings.progress_timeout,
            )),
            Err(_) => Err(self.timed_out()),
        }
    }

    async fn export(&self, tx: &RecordSender) -> Result<bool, SearchError> {
        let options = self.job.search_options();
        let mut stream = {
            let mut client = self.client.lock().await;
            self.bounded(client.export(&self.job.query, &options)).await?
        };
        tx.set_state(ExecutionState::Running);

        let mut records = 0u64;
        while let Some(row) = self.bounded(stream.next_row()).await? {
            if let Some(message) = row.messages.iter().find(|m| m.message_type.is_fatal()) {
                return Err(SearchError::Execution {
                    host: self.host.clone(),
                    message: format!("{}: {}", message.message_type, message.text),
                });
            }
            if row.preview {
                continue;
            }
            if let Some(result) = row.result {
                if !tx.send(result.into()).await {
                    return Ok(false);
                }
                records += 1;
            }
        }

        debug!(records, bytes = stream.bytes_read(), "Export stream finished");
        Ok(true)
    }

    async fn poll_and_page(&self, tx: &RecordSender) -> Result<bool, SearchError> {
        let options = self.job.search_options();
        let sid = {
            let mut client = self.client.lock().await;
            self.bounded(client.create_search_job(&self.job.query, &options))
                .await?
        };
        debug!(sid = %sid, "Search job created");
        tx.set_state(ExecutionState::Running);

        let status = match self.wait_for_done(&sid).await {
            Ok(status) => status,
            Err(err) => {
                if err.is_timeout() {
                    self.cancel_quietly(&sid).await;
                }
                return Err(err);
            }
        };

        // Splunk caps a page at `maxresultrows`, so a short page is not the
        // end while `resultCount` says more rows remain.
        let expected = status.result_count as u64;
        let mut offset = 0u64;
        loop {
            let page = {
                let mut client = self.client.lock().await;
                self.bounded(client.job_results(&sid, self.settings.page_size, offset))
                    .await?
            };
            let received = page.results.len() as u64;
            if received == 0 {
                break;
            }
            for result in page.results {
                if !tx.send(result.into()).await {
                    return Ok(false);
                }
            }
            offset += received;
            let more = if expected > 0 {
                offset < expected
            } else {
                received >= self.settings.page_size
            };
            if !more {
                break;
            }
        }

        debug!(sid = %sid, records = offset, "Search job results paged");
        Ok(true)
    }

    async fn wait_for_done(&self, sid: &str) -> Result<SearchJobStatus, SearchError> {
        let mut last_marker = None;
        let mut last_change = Instant::now();
        loop {
            let status = {
                let mut client = self.client.lock().await;
                self.bounded(client.job_status(sid)).await?
            };

            if status.has_failed() {
                return Err(SearchError::Execution {
                    host: self.host.clone(),
                    message: status
                        .failure_message()
                        .unwrap_or_else(|| format!("search job {sid} failed")),
                });
            }
            if status.is_done {
                return Ok(status);
            }

            let marker = status.progress_marker();
            if last_marker.as_ref() != Some(&marker) {
                last_marker = Some(marker);
                last_change = Instant::now();
            } else if last_change.elapsed() >= self.settings.progress_timeout {
                return Err(self.timed_out());
            }

            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }

    async fn cancel_quietly(&self, sid: &str) {
        let mut client = self.client.lock().await;
        if let Err(e) = client.cancel_job(sid).await {
            warn!(sid = %sid, error = %e, "Failed to cancel stalled search job");
        }
    }
}
