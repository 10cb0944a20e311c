//! Run summary: per-job, per-target and overall outcomes.
//!
//! The orchestrator is the single owner of a [`RunSummary`]; it records one
//! [`JobOutcome`] per finished job and calls [`RunSummary::finish`] once.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ErrorKind, ExportError};
use crate::target::Target;
use crate::writer::SinkOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverallStatus {
    Success,
    PartialSuccess,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TargetStatus {
    Success,
    Partial,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobStatus {
    /// Every enabled sink holds the artifact.
    Success,
    /// Some sinks hold the artifact.
    Partial,
    Failed,
    /// Artifacts already existed; the search did not run.
    Skipped,
    Cancelled,
}

impl JobStatus {
    fn delivered(self) -> bool {
        matches!(self, Self::Success | Self::Partial | Self::Skipped)
    }

    fn complete(self) -> bool {
        matches!(self, Self::Success | Self::Skipped)
    }
}

/// Outcome of one (target, window) job.
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    /// Window in display form, e.g. `2023-10-17T12:00:00Z..2023-10-17T13:00:00Z`.
    pub window: String,
    pub status: JobStatus,
    pub attempts: u32,
    pub records: u64,
    pub bytes: u64,
    pub duration_ms: u64,
    pub sinks: Vec<SinkOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip)]
    pub sequence: usize,
}

/// All jobs of one target.
#[derive(Debug, Clone, Serialize)]
pub struct TargetSummary {
    pub target: String,
    pub host: String,
    pub port: u16,
    pub status: TargetStatus,
    pub attempts: u32,
    pub records: u64,
    pub bytes: u64,
    pub jobs: Vec<JobOutcome>,
}

impl TargetSummary {
    fn new(target: &Target) -> Self {
        Self {
            target: target.to_string(),
            host: target.host.clone(),
            port: target.port,
            status: TargetStatus::Failed,
            attempts: 0,
            records: 0,
            bytes: 0,
            jobs: Vec::new(),
        }
    }

    fn settle(&mut self) {
        self.jobs.sort_by_key(|j| j.sequence);
        self.attempts = self.jobs.iter().map(|j| j.attempts).sum();
        self.records = self.jobs.iter().map(|j| j.records).sum();
        self.bytes = self.jobs.iter().map(|j| j.bytes).sum();
        self.status = if !self.jobs.is_empty() && self.jobs.iter().all(|j| j.status.complete()) {
            TargetStatus::Success
        } else if self.jobs.iter().any(|j| j.status.delivered()) {
            TargetStatus::Partial
        } else {
            TargetStatus::Failed
        };
    }
}

/// Report of one run, serialized as JSON on stdout.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    pub duration_ms: u64,
    pub status: OverallStatus,
    pub interrupted: bool,
    pub targets: Vec<TargetSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl RunSummary {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: run_id(started_at),
            started_at,
            finished_at: None,
            duration_ms: 0,
            status: OverallStatus::Failed,
            interrupted: false,
            targets: Vec::new(),
            error: None,
            error_kind: None,
        }
    }

    pub fn add_target(&mut self, target: &Target) {
        let name = target.to_string();
        if !self.targets.iter().any(|t| t.target == name) {
            self.targets.push(TargetSummary::new(target));
        }
    }

    /// Record a finished job against its target.
    pub fn record(&mut self, target: &Target, outcome: JobOutcome) {
        let name = target.to_string();
        match self.targets.iter_mut().find(|t| t.target == name) {
            Some(summary) => summary.jobs.push(outcome),
            None => {
                let mut summary = TargetSummary::new(target);
                summary.jobs.push(outcome);
                self.targets.push(summary);
            }
        }
    }

    /// Mark the run aborted by a fatal error.
    pub fn abort(&mut self, err: &ExportError) {
        self.error = Some(err.to_string());
        self.error_kind = Some(err.kind());
    }

    pub fn target(&self, name: &str) -> Option<&TargetSummary> {
        self.targets.iter().find(|t| t.target == name)
    }

    /// Settle target and overall statuses.
    pub fn finish(&mut self, finished_at: DateTime<Utc>, interrupted: bool) {
        for target in &mut self.targets {
            target.settle();
        }
        self.interrupted = interrupted;
        self.finished_at = Some(finished_at);
        self.duration_ms = (finished_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64;

        let statuses: Vec<TargetStatus> = self.targets.iter().map(|t| t.status).collect();
        self.status = if self.error.is_some()
            || statuses.is_empty()
            || statuses.iter().all(|s| *s == TargetStatus::Failed)
        {
            OverallStatus::Failed
        } else if statuses.iter().all(|s| *s == TargetStatus::Success) {
            OverallStatus::Success
        } else {
            OverallStatus::PartialSuccess
        };
    }

    /// True if any target delivered data.
    pub fn delivered(&self) -> bool {
        self.targets.iter().any(|t| t.status != TargetStatus::Failed)
    }
}

/// Run identifier derived from the start time, e.g. `20231017T120000Z`.
pub fn run_id(started_at: DateTime<Utc>) -> String {
    started_at.format("%Y%m%dT%H%M%SZ").to_string()
}
