//! Execution policy: fan-out, timeout retries and host resolution behaviour.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{DEFAULT_CONCURRENCY, DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_RETRIES};

/// Delay growth between timeout retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Backoff {
    /// Same delay before every retry.
    #[default]
    Fixed,
    /// Delay doubles with each retry.
    Exponential,
}

/// What to do when VIP resolution fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionFallback {
    /// Abort the run.
    #[default]
    Abort,
    /// Continue with `connection.hosts` when configured.
    ExplicitHosts,
}

/// What to do when the member list contains members that are not `Up`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PartialMembers {
    /// Drop unhealthy members and continue with the rest.
    #[default]
    Proceed,
    /// Treat any unhealthy member as a resolution failure.
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Maximum number of jobs in flight.
    pub concurrency: usize,
    /// Retries after a timed-out execution (attempts = retries + 1).
    pub timeout_retries: u32,
    /// Base delay between timeout retries.
    pub retry_delay_ms: u64,
    pub backoff: Backoff,
    pub resolution_fallback: ResolutionFallback,
    pub partial_members: PartialMembers,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout_retries: DEFAULT_TIMEOUT_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            backoff: Backoff::default(),
            resolution_fallback: ResolutionFallback::default(),
            partial_members: PartialMembers::default(),
        }
    }
}

impl ExecutionConfig {
    /// Delay before retry number `retry` (1-based).
    pub fn retry_delay(&self, retry: u32) -> Duration {
        let base = Duration::from_millis(self.retry_delay_ms);
        match self.backoff {
            Backoff::Fixed => base,
            Backoff::Exponential => {
                let factor = 2u32.saturating_pow(retry.saturating_sub(1));
                base.saturating_mul(factor)
            }
        }
    }
}
