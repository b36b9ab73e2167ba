//! Bounded polling for eventually-consistent state.
//!
//! The single call a test makes to wait for the cluster or the console to
//! catch up:
//!
//! ```ignore
//! let pod = Poller::new("Running")
//!     .with_max_retries(5)
//!     .with_interval(Duration::from_secs(5))
//!     .wait_until(&mut cli.admin_probe("oc get pod web -o jsonpath={.status.phase}"))
//!     .await?;
//! ```
//!
//! Lifecycle: `Idle → Observing → Evaluating → {Satisfied | WaitingToRetry →
//! Observing | Exhausted}`. A poller holds no state between calls.

mod config;
mod scheduler;

pub use config::{PollConfig, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_INTERVAL_MS};
pub use scheduler::RetryScheduler;

use crate::expect::Expectation;
use crate::observation::Observation;
use crate::observe::Observe;
use crate::result::{ProbeError, ProbeResult};
use std::fmt;
use std::time::Duration;

/// Poll lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollState {
    /// Not started
    Idle,
    /// Waiting for the observer
    Observing,
    /// Judging the observation
    Evaluating,
    /// Suspended before the next attempt
    WaitingToRetry,
    /// Expectation met (terminal)
    Satisfied,
    /// Budget used up (terminal)
    Exhausted,
}

impl PollState {
    /// State reached after an evaluation
    #[must_use]
    pub const fn after_evaluation(met: bool, attempts_remaining: u32) -> Self {
        if met {
            Self::Satisfied
        } else if attempts_remaining > 0 {
            Self::WaitingToRetry
        } else {
            Self::Exhausted
        }
    }

    /// Whether no further transition can happen
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Satisfied | Self::Exhausted)
    }

    /// Get the state name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Observing => "observing",
            Self::Evaluating => "evaluating",
            Self::WaitingToRetry => "waiting_to_retry",
            Self::Satisfied => "satisfied",
            Self::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for PollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of a poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The expectation was met by this observation
    Satisfied(Observation),
    /// The budget ran out; this is the last observation
    Exhausted(Observation),
}

impl PollOutcome {
    /// Check if the expectation was met
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied(_))
    }

    /// The satisfying or last observation
    #[must_use]
    pub const fn observation(&self) -> &Observation {
        match self {
            Self::Satisfied(o) | Self::Exhausted(o) => o,
        }
    }

    /// Number of attempts performed
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.observation().attempt()
    }

    /// Consume into the observation
    #[must_use]
    pub fn into_observation(self) -> Observation {
        match self {
            Self::Satisfied(o) | Self::Exhausted(o) => o,
        }
    }
}

/// Polls a re-observe capability until an expectation is met
///
/// ## Example
///
/// ```ignore
/// let outcome = Poller::new(Expectation::matches("patched")?)
///     .with_config(PollConfig::fast())
///     .poll(&mut probe)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Poller {
    expectation: Expectation,
    config: PollConfig,
    description: Option<String>,
}

impl Poller {
    /// Create a poller with the default budget
    #[must_use]
    pub fn new(expectation: impl Into<Expectation>) -> Self {
        Self {
            expectation: expectation.into(),
            config: PollConfig::default(),
            description: None,
        }
    }

    /// Set the full config
    #[must_use]
    pub const fn with_config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    /// Set maximum retries
    #[must_use]
    pub const fn with_max_retries(mut self, max: u32) -> Self {
        self.config.max_retries = max;
        self
    }

    /// Set the delay between attempts
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.config = self.config.with_interval(interval);
        self
    }

    /// Describe what is polled in failure reports (defaults to the observer's own description)
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Get the config
    #[must_use]
    pub const fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Get the expectation
    #[must_use]
    pub const fn expectation(&self) -> &Expectation {
        &self.expectation
    }

    /// Poll to a terminal outcome; exhaustion is an `Ok` value
    pub async fn poll<O>(&self, observe: &mut O) -> ProbeResult<PollOutcome>
    where
        O: Observe + ?Sized,
    {
        RetryScheduler::new(self.config)
            .run(observe, &self.expectation)
            .await
    }

    /// Poll and treat exhaustion as a failure
    ///
    /// Returns the satisfying observation so the caller can keep asserting
    /// on it.
    pub async fn wait_until<O>(&self, observe: &mut O) -> ProbeResult<Observation>
    where
        O: Observe + ?Sized,
    {
        match self.poll(observe).await? {
            PollOutcome::Satisfied(observation) => Ok(observation),
            PollOutcome::Exhausted(last) => {
                let description = self
                    .description
                    .clone()
                    .unwrap_or_else(|| observe.describe());
                Err(self.exhausted(description, last))
            }
        }
    }

    fn exhausted(&self, description: String, last: Observation) -> ProbeError {
        ProbeError::RetryBudgetExhausted {
            description,
            expectation: self.expectation.to_string(),
            retries: self.config.max_retries,
            attempts: last.attempt(),
            last: last.into_text(),
        }
    }
}

/// Wait for `observe` to satisfy `expectation`, with the default budget when `config` is `None`
pub async fn wait_for<O>(
    observe: &mut O,
    expectation: impl Into<Expectation>,
    config: Option<PollConfig>,
) -> ProbeResult<Observation>
where
    O: Observe + ?Sized,
{
    Poller::new(expectation)
        .with_config(config.unwrap_or_default())
        .wait_until(observe)
        .await
}
