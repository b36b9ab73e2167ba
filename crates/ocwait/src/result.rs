//! Result and error types for ocwait.

use thiserror::Error;

/// Result type for ocwait operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while polling
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The expectation was never met within the poll budget
    #[error(
        "\"{description}\" failed to meet expected output {expectation} within {retries} retries \
         ({attempts} attempt(s)); last observation: {last:?}"
    )]
    RetryBudgetExhausted {
        /// What was polled (command line or element description)
        description: String,
        /// The expectation, rendered for humans
        expectation: String,
        /// Configured retry budget
        retries: u32,
        /// Attempts actually performed
        attempts: u32,
        /// Text of the last observation
        last: String,
    },

    /// The re-observe capability itself failed
    #[error("Observation failed: {message}")]
    ObservationFailed {
        /// Error message
        message: String,
    },

    /// A pattern expectation did not compile
    #[error("Invalid pattern {pattern:?}: {message}")]
    InvalidPattern {
        /// Pattern source
        pattern: String,
        /// Error message
        message: String,
    },

    /// Poll configuration rejected before the first attempt
    #[error("Invalid poll configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// Test environment is incomplete or malformed
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Browser launch or page error
    #[error("Browser error: {message}")]
    Browser {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProbeError {
    /// Create an observation failure
    #[must_use]
    pub fn observation(message: impl Into<String>) -> Self {
        Self::ObservationFailed {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error came from an exhausted poll budget
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self, Self::RetryBudgetExhausted { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_message_names_command_and_budget() {
        let err = ProbeError::RetryBudgetExhausted {
            description: "oc get pods".into(),
            expectation: "contains \"Running\"".into(),
            retries: 3,
            attempts: 4,
            last: "Pending".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("\"oc get pods\" failed to meet expected output"));
        assert!(msg.contains("within 3 retries"));
        assert!(msg.contains("\"Pending\""));
        assert!(err.is_exhausted());
    }

    #[test]
    fn test_observation_error() {
        let err = ProbeError::observation("spawn failed");
        assert!(err.to_string().contains("Observation failed"));
        assert!(!err.is_exhausted());
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ProbeError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }
}
