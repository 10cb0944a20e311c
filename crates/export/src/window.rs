//! Time windows a search is split into.
//!
//! A configured `[search.window]` block yields `periods` consecutive slices
//! of `freq` starting at `start`. Without one, the configured
//! `earliest_time`/`latest_time` strings are passed through as one window.
//!
//! Invariants:
//! - Slices are half-open `[earliest, latest)` and never overlap.
//! - Slice bounds are sent to Splunk as epoch seconds (`<secs>.000`).

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use splunk_export_config::SearchConfig;
use splunk_export_config::constants::MAX_WINDOW_PERIODS;
use std::fmt;

/// Label used for `<freq>` when the search is not sliced.
pub const UNSLICED_FREQ_LABEL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeWindow {
    /// One slice of a configured window.
    Slice {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        freq: String,
    },
    /// Verbatim Splunk time modifiers.
    Range {
        earliest: Option<String>,
        latest: Option<String>,
    },
}

impl TimeWindow {
    pub fn earliest_param(&self) -> Option<String> {
        match self {
            Self::Slice { start, .. } => Some(epoch_param(start)),
            Self::Range { earliest, .. } => earliest.clone(),
        }
    }

    pub fn latest_param(&self) -> Option<String> {
        match self {
            Self::Slice { end, .. } => Some(epoch_param(end)),
            Self::Range { latest, .. } => latest.clone(),
        }
    }

    /// Timestamp used for `<ts>` and date partitioning.
    pub fn timestamp(&self, run_started: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Slice { start, .. } => *start,
            Self::Range { .. } => run_started,
        }
    }

    pub fn freq_label(&self) -> &str {
        match self {
            Self::Slice { freq, .. } => freq,
            Self::Range { .. } => UNSLICED_FREQ_LABEL,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slice { start, end, .. } => write!(
                f,
                "{}..{}",
                start.format("%Y-%m-%dT%H:%M:%SZ"),
                end.format("%Y-%m-%dT%H:%M:%SZ")
            ),
            Self::Range { earliest, latest } => write!(
                f,
                "{}..{}",
                earliest.as_deref().unwrap_or("-"),
                latest.as_deref().unwrap_or("-")
            ),
        }
    }
}

fn epoch_param(ts: &DateTime<Utc>) -> String {
    format!("{}.000", ts.timestamp())
}

/// Plan the windows for one run.
pub fn plan_windows(search: &SearchConfig) -> Result<Vec<TimeWindow>, String> {
    let Some(window) = &search.window else {
        return Ok(vec![TimeWindow::Range {
            earliest: non_empty(search.earliest_time.as_deref()),
            latest: non_empty(search.latest_time.as_deref()),
        }]);
    };

    if window.periods == 0 || window.periods > MAX_WINDOW_PERIODS {
        return Err(format!(
            "window periods must be between 1 and {} (got {})",
            MAX_WINDOW_PERIODS, window.periods
        ));
    }

    let start = window.start_time()?;
    let freq = window.frequency()?;
    let step = i64::try_from(freq.as_secs())
        .ok()
        .and_then(ChronoDuration::try_seconds)
        .ok_or_else(|| format!("window frequency '{}' is too large", freq.label()))?;

    let mut windows = Vec::with_capacity(window.periods as usize);
    let mut slice_start = start;
    for _ in 0..window.periods {
        let slice_end = slice_start
            .checked_add_signed(step)
            .ok_or_else(|| "window extends past the supported time range".to_string())?;
        windows.push(TimeWindow::Slice {
            start: slice_start,
            end: slice_end,
            freq: freq.label().to_string(),
        });
        slice_start = slice_end;
    }
    Ok(windows)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
