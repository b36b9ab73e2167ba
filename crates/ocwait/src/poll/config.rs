//! Poll budget configuration.

use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retries after the first attempt when nothing else is configured
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Delay between attempts when nothing else is configured (10 seconds)
pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 10_000;

/// Configuration for one poll
///
/// The budget is `max_retries + 1` attempts: the initial try plus retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay between attempts in milliseconds (must be > 0)
    pub interval_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            interval_ms: DEFAULT_RETRY_INTERVAL_MS,
        }
    }
}

impl PollConfig {
    /// Create a config with explicit budget and interval
    ///
    /// The interval is rounded up to whole milliseconds.
    #[must_use]
    pub const fn new(max_retries: u32, interval: Duration) -> Self {
        Self {
            max_retries,
            interval_ms: ceil_millis(interval),
        }
    }

    /// Set maximum retries
    #[must_use]
    pub const fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set the delay between attempts, rounded up to whole milliseconds
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval_ms = ceil_millis(interval);
        self
    }

    /// Set the delay between attempts in milliseconds
    #[must_use]
    pub const fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Short budget for UI state that settles quickly
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            max_retries: 5,
            interval_ms: 500,
        }
    }

    /// Long budget for operator rollouts and catalog sources
    #[must_use]
    pub const fn slow() -> Self {
        Self {
            max_retries: 6,
            interval_ms: 15_000,
        }
    }

    /// Delay between attempts
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Total attempts allowed
    #[must_use]
    pub const fn attempt_budget(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Reject configurations that cannot be polled
    pub fn validate(&self) -> ProbeResult<()> {
        if self.interval_ms == 0 {
            return Err(ProbeError::InvalidConfig {
                message: "interval must be greater than 0ms".to_string(),
            });
        }
        Ok(())
    }
}

/// Whole milliseconds, rounding any sub-millisecond remainder up
const fn ceil_millis(interval: Duration) -> u64 {
    let ms = interval.as_nanos().div_ceil(1_000_000);
    if ms > u64::MAX as u128 {
        u64::MAX
    } else {
        ms as u64
    }
}
