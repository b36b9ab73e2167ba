//! Expectations and the condition evaluator.
//!
//! An [`Expectation`] is judged against one [`Observation`]. Evaluation is
//! pure: same inputs, same verdict, no side effects.

use crate::observation::Observation;
use crate::result::{ProbeError, ProbeResult};
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Outcome of evaluating one observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Expectation satisfied
    Met,
    /// Expectation not satisfied, with a reason for diagnostics
    NotMet(String),
}

impl Verdict {
    /// Check if the verdict is a pass
    #[must_use]
    pub const fn is_met(&self) -> bool {
        matches!(self, Self::Met)
    }
}

/// Target condition an observation is judged against
#[derive(Debug, Clone)]
pub enum Expectation {
    /// Observation text contains the substring
    Contains(String),
    /// Observation text, minus trailing whitespace, equals the value
    Equals(String),
    /// Observation text matches the regular expression
    Matches(Regex),
}

impl Expectation {
    /// Substring expectation
    #[must_use]
    pub fn contains(needle: impl Into<String>) -> Self {
        Self::Contains(needle.into())
    }

    /// Exact-value expectation
    #[must_use]
    pub fn equals(value: impl Into<String>) -> Self {
        Self::Equals(value.into())
    }

    /// Pattern expectation
    pub fn matches(pattern: &str) -> ProbeResult<Self> {
        Regex::new(pattern)
            .map(Self::Matches)
            .map_err(|e| ProbeError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
    }

    /// Source text of the expectation (needle, value or pattern)
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Contains(s) | Self::Equals(s) => s,
            Self::Matches(re) => re.as_str(),
        }
    }

    /// Evaluate an observation
    #[must_use]
    pub fn evaluate(&self, observation: &Observation) -> Verdict {
        let text = observation.as_str();

        // An empty snapshot never passes for a non-empty target, even when
        // the pattern itself would match "".
        if text.is_empty() && !self.source().is_empty() {
            return Verdict::NotMet(format!("nothing observed, expected {self}"));
        }

        let met = match self {
            Self::Contains(needle) => text.contains(needle.as_str()),
            Self::Equals(value) => text.trim_end() == value,
            Self::Matches(re) => re.is_match(text),
        };

        if met {
            Verdict::Met
        } else {
            Verdict::NotMet(format!("expected {self}, observed {text:?}"))
        }
    }

    /// Evaluate an observation to a bool
    #[must_use]
    pub fn is_met(&self, observation: &Observation) -> bool {
        self.evaluate(observation).is_met()
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains(s) if needs_escape(s) => write!(f, "\\{s}"),
            Self::Contains(s) => write!(f, "{s}"),
            Self::Equals(s) => write!(f, "={s}"),
            Self::Matches(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// A substring that would otherwise read back as another kind
fn needs_escape(s: &str) -> bool {
    s.starts_with('=') || s.starts_with('\\') || is_delimited(s)
}

fn is_delimited(s: &str) -> bool {
    s.len() >= 2 && s.starts_with('/') && s.ends_with('/')
}

/// Parse `/re/` as a pattern, `=value` as an exact match, anything else as a substring
///
/// A leading `\` forces a literal substring, so `\=True` looks for `=True`.
impl FromStr for Expectation {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(literal) = s.strip_prefix('\\') {
            return Ok(Self::contains(literal));
        }
        if is_delimited(s) {
            return Self::matches(&s[1..s.len() - 1]);
        }
        if let Some(value) = s.strip_prefix('=') {
            return Ok(Self::equals(value));
        }
        Ok(Self::contains(s))
    }
}

impl From<&str> for Expectation {
    fn from(needle: &str) -> Self {
        Self::contains(needle)
    }
}

impl From<String> for Expectation {
    fn from(needle: String) -> Self {
        Self::Contains(needle)
    }
}

impl From<Regex> for Expectation {
    fn from(re: Regex) -> Self {
        Self::Matches(re)
    }
}
