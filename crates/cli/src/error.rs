//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that schedulers can use to distinguish outcomes.
//! - Map a finished [`RunSummary`] and fatal errors to those codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//! - Signal handling (see `main`).
//!
//! Invariants:
//! - A run that delivered data for at least one target exits 0.
//! - Exit code 130 is reserved for SIGINT (Unix standard: 128 + SIGINT).

use splunk_export::{ErrorKind, ExportError, OverallStatus, RunSummary};
use splunk_export_config::ConfigError;

/// Structured exit codes for splunk-export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Every target succeeded, or at least one delivered data.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Configuration error - invalid file, environment or sink selection.
    ///
    /// Nothing was contacted; fix the configuration before retrying.
    ConfigurationError = 2,

    /// The VIP could not be resolved into search heads.
    ResolutionFailed = 3,

    /// Every target failed.
    ///
    /// Schedulers may retry the whole run.
    AllTargetsFailed = 4,

    /// Interrupted - SIGINT/Ctrl+C (Unix standard: 128 + 2).
    Interrupted = 130,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&RunSummary> for ExitCode {
    fn from(summary: &RunSummary) -> Self {
        if summary.interrupted {
            return ExitCode::Interrupted;
        }
        match summary.status {
            OverallStatus::Success | OverallStatus::PartialSuccess => ExitCode::Success,
            OverallStatus::Failed => match summary.error_kind {
                Some(ErrorKind::Resolution) => ExitCode::ResolutionFailed,
                Some(ErrorKind::Configuration) => ExitCode::ConfigurationError,
                _ => ExitCode::AllTargetsFailed,
            },
        }
    }
}

/// Extension trait to get an exit code from anyhow::Error.
pub trait ExitCodeExt {
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        if self.downcast_ref::<ConfigError>().is_some() {
            return ExitCode::ConfigurationError;
        }
        match self.downcast_ref::<ExportError>() {
            Some(ExportError::Configuration(_)) => ExitCode::ConfigurationError,
            Some(ExportError::Resolution(_)) => ExitCode::ResolutionFailed,
            None => ExitCode::GeneralError,
        }
    }
}
