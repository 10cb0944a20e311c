//! Pipeline metrics and the Prometheus exporter.
//!
//! Metrics are recorded through the `metrics` facade and are no-ops until a
//! recorder is installed with [`MetricsExporter::install`].
//!
//! # Metrics
//!
//! - `splunk_export_records_total`: records written, by target.
//! - `splunk_export_bytes_total`: encoded bytes written, by target.
//! - `splunk_export_jobs_total`: finished jobs, by status.
//! - `splunk_export_attempts_total`: search executions started.
//! - `splunk_export_job_duration_seconds`: wall time per job, by status.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};
use splunk_client::metrics::METRIC_REQUEST_DURATION;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

use crate::summary::JobStatus;

pub const METRIC_RECORDS_TOTAL: &str = "splunk_export_records_total";
pub const METRIC_BYTES_TOTAL: &str = "splunk_export_bytes_total";
pub const METRIC_JOBS_TOTAL: &str = "splunk_export_jobs_total";
pub const METRIC_ATTEMPTS_TOTAL: &str = "splunk_export_attempts_total";
pub const METRIC_JOB_DURATION: &str = "splunk_export_job_duration_seconds";

const DURATION_BUCKETS: &[f64] = &[
    0.1, 0.5, 1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0, 3600.0,
];

fn status_label(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Success => "success",
        JobStatus::Partial => "partial",
        JobStatus::Failed => "failed",
        JobStatus::Skipped => "skipped",
        JobStatus::Cancelled => "cancelled",
    }
}

pub fn record_attempt(target: &str) {
    counter!(METRIC_ATTEMPTS_TOTAL, "target" => target.to_string()).increment(1);
}

pub fn record_job(target: &str, status: JobStatus, records: u64, bytes: u64, duration: Duration) {
    let status = status_label(status);
    counter!(METRIC_JOBS_TOTAL, "status" => status).increment(1);
    counter!(METRIC_RECORDS_TOTAL, "target" => target.to_string()).increment(records);
    counter!(METRIC_BYTES_TOTAL, "target" => target.to_string()).increment(bytes);
    histogram!(METRIC_JOB_DURATION, "status" => status).record(duration.as_secs_f64());
}

/// Prometheus scrape endpoint serving `/metrics`.
#[derive(Debug)]
pub struct MetricsExporter {
    bind_addr: SocketAddr,
}

impl MetricsExporter {
    /// Install the Prometheus recorder globally and start its HTTP listener.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Returns an error if the bind address is invalid, another recorder is
    /// already installed, or the listener cannot be started.
    pub fn install(bind_addr: &str) -> Result<Self, MetricsExporterError> {
        let addr: SocketAddr = bind_addr
            .parse()
            .map_err(|e| MetricsExporterError::InvalidBindAddress(bind_addr.to_string(), e))?;

        PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(METRIC_JOB_DURATION.to_string()),
                DURATION_BUCKETS,
            )?
            .set_buckets_for_metric(
                Matcher::Full(METRIC_REQUEST_DURATION.to_string()),
                &[0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0],
            )?
            .with_http_listener(addr)
            .install()
            .map_err(|e| match e {
                BuildError::FailedToSetGlobalRecorder(_) => {
                    MetricsExporterError::RecorderAlreadyInstalled
                }
                other => other.into(),
            })?;

        info!("Prometheus metrics exporter started on http://{}/metrics", addr);

        Ok(Self { bind_addr: addr })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

/// Errors that can occur when installing the metrics exporter.
#[derive(Debug, thiserror::Error)]
pub enum MetricsExporterError {
    #[error("Invalid bind address '{0}': {1}")]
    InvalidBindAddress(String, std::net::AddrParseError),

    #[error("A metrics recorder is already installed")]
    RecorderAlreadyInstalled,

    #[error("Failed to build Prometheus recorder: {0}")]
    BuildError(String),
}

impl From<BuildError> for MetricsExporterError {
    fn from(err: BuildError) -> Self {
        MetricsExporterError::BuildError(err.to_string())
    }
}
