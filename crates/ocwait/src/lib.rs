//! ocwait: bounded polling for console end-to-end tests
//!
//! End-to-end tests against a live cluster keep waiting for state that is
//! only eventually consistent: an operator finishing its rollout, a plugin
//! appearing in the console, a patched resource settling. `ocwait` re-observes
//! that state at a fixed interval until an expectation holds or the retry
//! budget runs out.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐  observe   ┌──────────────┐  evaluate  ┌─────────────┐
//! │ Observe    │◄───────────│ Retry        │───────────►│ Expectation │
//! │ (oc, page) │───────────►│ Scheduler    │◄───────────│             │
//! └────────────┘ Observation└──────────────┘  Verdict   └─────────────┘
//!                                  │
//!                       PollOutcome / ProbeError
//! ```
//!
//! # Example
//!
//! ```ignore
//! let env = TestEnvironment::from_env()?;
//! let cli = ClusterCli::new(&env);
//! cli.check_command_result(
//!     "oc get consoleplugin console-demo-plugin -o name",
//!     "console-demo-plugin",
//!     None,
//! )
//! .await?;
//! ```

#![warn(missing_docs)]

#[cfg(feature = "browser")]
mod browser;
mod cluster;
mod env;
mod expect;
mod observation;
mod observe;
/// Poller, retry scheduler and poll configuration
pub mod poll;
mod result;
mod selector;
mod surface;

#[cfg(feature = "browser")]
pub use browser::{BrowserConfig, CdpSurface, ConsoleBrowser};
pub use cluster::{ClusterCli, CommandProbe, DEFAULT_COMMAND_TIMEOUT_MS};
pub use env::{
    derive_api_url, LoginCredentials, TestEnvironment, ENV_BASE_URL, ENV_COMMAND_TIMEOUT_MS,
    ENV_HOST_API, ENV_KUBECONFIG, ENV_LOGIN_USERS, ENV_POLL_INTERVAL_MS, ENV_POLL_MAX_RETRIES,
};
pub use expect::{Expectation, Verdict};
pub use observation::{CommandDetail, Observation};
pub use observe::Observe;
pub use poll::{wait_for, PollConfig, PollOutcome, PollState, Poller, RetryScheduler};
pub use result::{ProbeError, ProbeResult};
pub use selector::Selector;
pub use surface::{ElementProbe, Surface};

/// Prelude for convenient imports
pub mod prelude {
    #[cfg(feature = "browser")]
    pub use crate::{BrowserConfig, ConsoleBrowser};
    pub use crate::{
        wait_for, ClusterCli, ElementProbe, Expectation, Observation, Observe, PollConfig,
        PollOutcome, Poller, ProbeError, ProbeResult, Selector, Surface, TestEnvironment,
    };
}
