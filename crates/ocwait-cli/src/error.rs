//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// ocwait library error (includes exhausted polls)
    #[error("{0}")]
    Probe(#[from] ocwait::ProbeError),

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Output serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Whether the failure is an exhausted poll rather than a usage or setup problem
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Probe(e) if e.is_exhausted())
    }
}
