//! Run orchestration.
//!
//! Responsibilities:
//! - Validate sink selection before any network call.
//! - Resolve targets once, applying the explicit-hosts fallback when configured.
//! - Plan one job per (target, window) and run them with bounded concurrency.
//! - Retry timed-out executions and record every job outcome in the [`RunSummary`].
//!
//! Does NOT handle:
//! - Installing signal handlers or choosing exit codes (see the binary).
//!
//! Invariants:
//! - Only `SearchError::Timeout` is retried; attempts never exceed
//!   `timeout_retries + 1`.
//! - A job failure is recorded against its target and never aborts the run.
//! - Once cancelled, no new search is started.

use chrono::Utc;
use futures::StreamExt;
use opendal::Operator;
use splunk_export_config::{Config, ExecutionConfig, ResolutionFallback};
use std::time::Instant;
use tracing::{Instrument, error, info, info_span, warn};

use crate::cancellation::CancellationToken;
use crate::error::{ErrorKind, ExportError, SearchError};
use crate::job::{SearchJob, plan_jobs};
use crate::resolver::{HostResolver, MemberDirectory, SplunkMemberDirectory};
use crate::search::{SearchClient, SplunkSearchClient};
use crate::summary::{JobOutcome, JobStatus, RunSummary};
use crate::target::Target;
use crate::telemetry;
use crate::window::plan_windows;
use crate::writer::{ResultWriter, SinkDescriptor, SinkStatus, WriteResult};

/// Drives a whole export run.
#[derive(Debug)]
pub struct ExportOrchestrator<D, S> {
    directory: D,
    search: S,
    cancel: CancellationToken,
    object_store: Option<Operator>,
}

impl ExportOrchestrator<SplunkMemberDirectory, SplunkSearchClient> {
    /// Orchestrator talking to Splunk over HTTP.
    pub fn from_config(config: &Config, cancel: CancellationToken) -> Result<Self, ExportError> {
        let directory = SplunkMemberDirectory::from_config(config)
            .map_err(|e| ExportError::Configuration(format!("failed to build HTTP client: {e}")))?;
        let search = SplunkSearchClient::from_config(config)
            .map_err(|e| ExportError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::new(directory, search, cancel))
    }
}

impl<D: MemberDirectory, S: SearchClient> ExportOrchestrator<D, S> {
    pub fn new(directory: D, search: S, cancel: CancellationToken) -> Self {
        Self {
            directory,
            search,
            cancel,
            object_store: None,
        }
    }

    /// Use `operator` for the object sink instead of building one from `output.s3`.
    pub fn with_object_store(mut self, operator: Operator) -> Self {
        self.object_store = Some(operator);
        self
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn search_client(&self) -> &S {
        &self.search
    }

    /// Run one export.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Configuration`] for invalid sink, window or host
    /// settings, before any search is started. Resolution failures are not
    /// returned as errors: they produce an aborted summary with no targets.
    pub async fn run(&self, config: &Config) -> Result<RunSummary, ExportError> {
        let started_at = Utc::now();
        let mut summary = RunSummary::new(started_at);

        let sinks = SinkDescriptor::from_config(config, self.object_store.clone())?;
        if config.search.query.trim().is_empty() {
            return Err(ExportError::Configuration(
                "search.query must not be empty".to_string(),
            ));
        }
        let windows = plan_windows(&config.search).map_err(ExportError::Configuration)?;
        let writer = ResultWriter::new(sinks, config.output.format, config.output.chunk_records);

        let targets = match self.resolve_targets(config).await {
            Ok(targets) => targets,
            Err(err @ ExportError::Resolution(_)) => {
                error!(error = %err, "Aborting run");
                summary.abort(&err);
                summary.finish(Utc::now(), self.cancel.is_cancelled());
                return Ok(summary);
            }
            Err(err) => return Err(err),
        };

        let jobs = plan_jobs(config, &targets, &windows, started_at, &summary.run_id);
        for target in &targets {
            summary.add_target(target);
        }
        info!(
            run_id = %summary.run_id,
            targets = targets.len(),
            jobs = jobs.len(),
            concurrency = config.execution.concurrency,
            "Starting export run"
        );

        let skip_existing = config.output.skip_existing;
        let mut outcomes = futures::stream::iter(
            jobs.into_iter()
                .map(|job| self.run_job(job, &writer, &config.execution, skip_existing)),
        )
        .buffer_unordered(config.execution.concurrency.max(1));

        while let Some((target, outcome)) = outcomes.next().await {
            summary.record(&target, outcome);
        }

        let interrupted = self.cancel.is_cancelled();
        summary.finish(Utc::now(), interrupted);
        info!(
            run_id = %summary.run_id,
            status = ?summary.status,
            interrupted,
            duration_ms = summary.duration_ms,
            "Export run finished"
        );
        Ok(summary)
    }

    async fn resolve_targets(&self, config: &Config) -> Result<Vec<Target>, ExportError> {
        let resolver = HostResolver::from_config(&self.directory, config);
        let connection = &config.connection;
        match resolver
            .resolve(
                config.vip_to_hostname,
                connection.vip.as_deref(),
                &connection.hosts,
            )
            .await
        {
            Err(ExportError::Resolution(err))
                if config.execution.resolution_fallback == ResolutionFallback::ExplicitHosts
                    && !connection.hosts.is_empty() =>
            {
                warn!(error = %err, "VIP resolution failed, falling back to explicit hosts");
                resolver.resolve(false, None, &connection.hosts).await
            }
            other => other,
        }
    }

    async fn run_job(
        &self,
        job: SearchJob,
        writer: &ResultWriter,
        execution: &ExecutionConfig,
        skip_existing: bool,
    ) -> (Target, JobOutcome) {
        let span = info_span!(
            "job",
            target = %job.target,
            window = %job.window,
            sequence = job.sequence,
        );
        async move {
            let started = Instant::now();
            let (attempts, result) = if self.cancel.is_cancelled() {
                (0, Err(SearchError::Cancelled))
            } else if skip_existing && writer.exists(&job).await {
                info!("Artifacts already exist, skipping");
                (0, Ok(writer.skipped(&job)))
            } else {
                self.attempt(&job, writer, execution).await
            };

            let outcome = job_outcome(&job, attempts, result, started.elapsed().as_millis() as u64);
            telemetry::record_job(
                &outcome_target(&job),
                outcome.status,
                outcome.records,
                outcome.bytes,
                started.elapsed(),
            );
            match outcome.status {
                JobStatus::Success | JobStatus::Skipped => {}
                JobStatus::Cancelled => info!("Job cancelled"),
                _ => warn!(
                    status = ?outcome.status,
                    error = outcome.error.as_deref().unwrap_or(""),
                    "Job did not fully succeed"
                ),
            }
            (job.target.clone(), outcome)
        }
        .instrument(span)
        .await
    }

    /// Execute and write `job`, retrying timeouts.
    async fn attempt(
        &self,
        job: &SearchJob,
        writer: &ResultWriter,
        execution: &ExecutionConfig,
    ) -> (u32, Result<WriteResult, SearchError>) {
        let target = outcome_target(job);
        let mut attempt = 0u32;
        loop {
            if self.cancel.is_cancelled() {
                return (attempt, Err(SearchError::Cancelled));
            }
            attempt += 1;
            telemetry::record_attempt(&target);

            let mut records = self.search.execute(job);
            let result = writer.write(&mut records, job, &self.cancel).await;
            drop(records);

            match result {
                Err(err) if err.is_timeout() && attempt <= execution.timeout_retries => {
                    let delay = execution.retry_delay(attempt);
                    warn!(
                        attempt,
                        max_attempts = execution.timeout_retries + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Search timed out, retrying"
                    );
                    tokio::select! {
                        _ = self.cancel.cancelled() => return (attempt, Err(SearchError::Cancelled)),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                other => return (attempt, other),
            }
        }
    }
}

fn outcome_target(job: &SearchJob) -> String {
    job.target.to_string()
}

fn job_outcome(
    job: &SearchJob,
    attempts: u32,
    result: Result<WriteResult, SearchError>,
    duration_ms: u64,
) -> JobOutcome {
    let mut outcome = JobOutcome {
        window: job.window.to_string(),
        status: JobStatus::Failed,
        attempts,
        records: 0,
        bytes: 0,
        duration_ms,
        sinks: Vec::new(),
        error: None,
        error_kind: None,
        sequence: job.sequence,
    };

    match result {
        Ok(write) => {
            let skipped = !write.sinks.is_empty()
                && write.sinks.iter().all(|s| s.status == SinkStatus::Skipped);
            outcome.status = if skipped {
                JobStatus::Skipped
            } else if write.all_succeeded() {
                JobStatus::Success
            } else if write.delivered() {
                JobStatus::Partial
            } else {
                JobStatus::Failed
            };

            let failures: Vec<&str> = write
                .sinks
                .iter()
                .filter_map(|s| s.error.as_deref())
                .collect();
            if !failures.is_empty() {
                outcome.error = Some(failures.join("; "));
                outcome.error_kind = write.sinks.iter().find_map(|s| s.error_kind);
            }
            if outcome.status != JobStatus::Failed {
                outcome.records = write.records;
                outcome.bytes = write.bytes;
            }
            outcome.sinks = write.sinks;
        }
        Err(SearchError::Cancelled) => {
            outcome.status = JobStatus::Cancelled;
            outcome.error_kind = Some(ErrorKind::Cancelled);
        }
        Err(err) => {
            outcome.error = Some(err.to_string());
            outcome.error_kind = Some(err.kind());
        }
    }
    outcome
}
