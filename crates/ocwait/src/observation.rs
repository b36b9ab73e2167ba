//! Observations: one snapshot of external state per poll attempt.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Extra detail captured when the observation came from a process
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandDetail {
    /// Captured standard error
    pub stderr: String,
    /// Exit code (`None` if the process was killed by a signal)
    pub exit_code: Option<i32>,
}

impl CommandDetail {
    /// Whether the process exited with status 0
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }
}

/// A snapshot captured at one attempt
///
/// `text` is what expectations are evaluated against: a command's standard
/// output or an element's text content.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Observation {
    text: String,
    command: Option<CommandDetail>,
    attempt: u32,
}

impl Observation {
    /// Create an observation from plain text (e.g. element text content)
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            command: None,
            attempt: 0,
        }
    }

    /// Create an observation from captured process output
    #[must_use]
    pub fn command(
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self {
            text: stdout.into(),
            command: Some(CommandDetail {
                stderr: stderr.into(),
                exit_code,
            }),
            attempt: 0,
        }
    }

    /// An empty observation (element absent, no output)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Stamp the 1-based attempt number this observation was captured on
    #[must_use]
    pub(crate) const fn at_attempt(mut self, attempt: u32) -> Self {
        self.attempt = attempt;
        self
    }

    /// Observed text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether nothing was observed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Process detail, if this came from a command
    #[must_use]
    pub const fn command_detail(&self) -> Option<&CommandDetail> {
        self.command.as_ref()
    }

    /// 1-based attempt number (0 if not captured by a poller)
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Consume into the observed text
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
