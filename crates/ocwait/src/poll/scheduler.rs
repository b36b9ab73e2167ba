//! Retry scheduler: the bounded attempt loop.

use super::config::PollConfig;
use super::{PollOutcome, PollState};
use crate::expect::Expectation;
use crate::observe::Observe;
use crate::result::ProbeResult;
use tracing::{debug, error, warn};

/// Drives observe → evaluate → wait cycles within a fixed budget
#[derive(Debug, Clone, Copy)]
pub struct RetryScheduler {
    config: PollConfig,
}

impl RetryScheduler {
    /// Create a scheduler for one poll
    #[must_use]
    pub const fn new(config: PollConfig) -> Self {
        Self { config }
    }

    /// Get the config
    #[must_use]
    pub const fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Run the attempt loop to a terminal outcome
    ///
    /// Attempt 1 observes immediately. Each later attempt starts only after
    /// the previous evaluation and one `interval` of suspension. A failing
    /// observer ends the loop at once without consuming further attempts.
    pub async fn run<O>(&self, observe: &mut O, expectation: &Expectation) -> ProbeResult<PollOutcome>
    where
        O: Observe + ?Sized,
    {
        self.config.validate()?;
        let budget = self.config.attempt_budget();
        let mut attempt = 0u32;
        let mut state = PollState::Idle;
        debug!(
            budget,
            interval_ms = self.config.interval_ms,
            state = %state,
            "poll starting"
        );

        loop {
            attempt += 1;
            state = PollState::Observing;
            debug!(attempt, budget, state = %state, "observing");

            let observation = match observe.observe().await {
                Ok(observation) => observation.at_attempt(attempt),
                Err(e) => {
                    error!(attempt, error = %e, "observation failed, giving up");
                    return Err(e);
                }
            };

            state = PollState::Evaluating;
            debug!(attempt, state = %state, observed = observation.as_str(), "evaluating");
            let verdict = expectation.evaluate(&observation);
            state = PollState::after_evaluation(verdict.is_met(), budget - attempt);
            match state {
                PollState::Satisfied => {
                    debug!(attempt, state = %state, "expectation met");
                    return Ok(PollOutcome::Satisfied(observation));
                }
                PollState::Exhausted => {
                    warn!(
                        attempt,
                        state = %state,
                        retries = self.config.max_retries,
                        ?verdict,
                        "poll budget exhausted"
                    );
                    return Ok(PollOutcome::Exhausted(observation));
                }
                _ => {
                    debug!(
                        attempt,
                        state = %state,
                        delay_ms = self.config.interval_ms,
                        ?verdict,
                        "expectation not met, retrying"
                    );
                    tokio::time::sleep(self.config.interval()).await;
                }
            }
        }
    }
}
