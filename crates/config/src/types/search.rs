//! Search configuration: query, execution mode, time windows and sampling.
//!
//! Responsibilities:
//! - Define what is searched and over which time range.
//! - Parse window start times and pandas-style frequency strings (`5min`, `1h`, `1d`).
//!
//! Does NOT handle:
//! - Splitting a window block into concrete time slices (see the export crate).
//!
//! Invariants:
//! - Window start strings without an offset are read in the window's
//!   `timezone` (UTC by default), DST included.
//! - A frequency is always a positive whole number of seconds.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_PROGRESS_TIMEOUT_SECS, DEFAULT_SAMPLE_RATIO,
    DEFAULT_SEARCH_PAGE_SIZE, DEFAULT_WINDOW_TIMEZONE,
};

/// How results are pulled from a search head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Stream results from the export endpoint.
    #[default]
    Export,
    /// Create a search job, poll until done, then page through results.
    Job,
}

/// Search section of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// SPL query. A leading `search` command is added when missing.
    pub query: String,
    pub mode: SearchMode,
    /// Earliest time passed through verbatim when no window is configured.
    pub earliest_time: Option<String>,
    /// Latest time passed through verbatim when no window is configured.
    pub latest_time: Option<String>,
    /// Fixed-size time slices; one artifact is produced per slice.
    pub window: Option<WindowConfig>,
    /// Splunk event sampling ratio (1 = every event).
    pub sample_ratio: u32,
    /// Maximum number of results a single execution may return.
    pub max_count: Option<u64>,
    /// Seconds Splunk keeps the job after processing stops.
    pub job_ttl_secs: Option<u64>,
    /// Job status polling interval (job mode).
    pub poll_interval_ms: u64,
    /// Result page size (job mode).
    pub page_size: u64,
    /// Time without progress before an execution is declared timed out.
    pub progress_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            query: String::new(),
            mode: SearchMode::default(),
            earliest_time: None,
            latest_time: None,
            window: None,
            sample_ratio: DEFAULT_SAMPLE_RATIO,
            max_count: None,
            job_ttl_secs: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            page_size: DEFAULT_SEARCH_PAGE_SIZE,
            progress_timeout_secs: DEFAULT_PROGRESS_TIMEOUT_SECS,
        }
    }
}

impl SearchConfig {
    /// Progress timeout as a `Duration`.
    pub fn progress_timeout(&self) -> Duration {
        Duration::from_secs(self.progress_timeout_secs)
    }

    /// True when sampling is active (ratio above 1).
    pub fn is_sampled(&self) -> bool {
        self.sample_ratio > 1
    }
}

/// A run split into `periods` consecutive slices of `freq`, starting at `start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// RFC 3339 timestamp, or `YYYY-MM-DD HH:MM[:SS]` / `YYYY-MM-DD` in `timezone`.
    pub start: String,
    /// Number of slices.
    pub periods: u32,
    /// Slice length, e.g. `5min`, `1h`, `1d`.
    pub freq: String,
    /// IANA zone for naive start times, e.g. `US/Pacific` (case-insensitive).
    #[serde(default = "default_window_timezone")]
    pub timezone: String,
}

fn default_window_timezone() -> String {
    DEFAULT_WINDOW_TIMEZONE.to_string()
}

impl WindowConfig {
    /// Parse the configured start into a UTC timestamp.
    pub fn start_time(&self) -> Result<DateTime<Utc>, String> {
        parse_start_time(&self.start, self.zone()?)
    }

    /// Parse the configured zone.
    pub fn zone(&self) -> Result<Tz, String> {
        let name = self.timezone.trim();
        Tz::from_str_insensitive(name).map_err(|_| format!("unknown timezone '{}'", name))
    }

    /// Parse the configured slice length.
    pub fn frequency(&self) -> Result<Frequency, String> {
        self.freq.parse()
    }
}

fn parse_start_time(value: &str, zone: Tz) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return localize(naive, zone, value);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        && let Some(naive) = date.and_hms_opt(0, 0, 0)
    {
        return localize(naive, zone, value);
    }
    Err(format!("unrecognized start time '{}'", value))
}

/// Ambiguous local times (DST fall-back) resolve to the earlier instant.
fn localize(naive: NaiveDateTime, zone: Tz, value: &str) -> Result<DateTime<Utc>, String> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(ts) | LocalResult::Ambiguous(ts, _) => Ok(ts.with_timezone(&Utc)),
        LocalResult::None => Err(format!("start time '{}' does not exist in {}", value, zone)),
    }
}

/// Length of one export window.
///
/// Keeps the operator's spelling as its label so file names carry the same
/// `<freq>` text that was configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frequency {
    seconds: u64,
    label: String,
}

impl Frequency {
    /// Window length.
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.seconds)
    }

    /// Window length in seconds.
    pub fn as_secs(&self) -> u64 {
        self.seconds
    }

    /// The configured spelling, e.g. `1h`.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        let split = label
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(label.len());
        let (digits, unit) = label.split_at(split);

        let count: u64 = if digits.is_empty() {
            1
        } else {
            digits
                .parse()
                .map_err(|_| format!("invalid frequency '{}'", label))?
        };
        if count == 0 {
            return Err(format!("frequency '{}' must be positive", label));
        }

        let unit_secs = match unit.trim().to_ascii_lowercase().as_str() {
            "s" | "sec" | "secs" => 1,
            "t" | "min" | "mins" => 60,
            "h" | "hr" | "hour" | "hours" => 3600,
            "d" | "day" | "days" => 86400,
            other => return Err(format!("unknown frequency unit '{}' in '{}'", other, label)),
        };

        let seconds = count
            .checked_mul(unit_secs)
            .ok_or_else(|| format!("frequency '{}' is too large", label))?;
        Ok(Self {
            seconds,
            label: label.to_string(),
        })
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}
