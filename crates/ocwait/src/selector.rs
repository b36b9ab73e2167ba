//! Typed element selectors.
//!
//! Console pages are targeted through test attributes rather than layout
//! classes. Newer views use `data-test`, older ones still carry
//! `data-test-id`; both are kept distinct so the rendered CSS is exact.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Selector {
    /// Raw CSS selector (e.g., "h1.co-m-pane__heading")
    Css(String),
    /// `data-test` attribute
    TestId(String),
    /// `data-test-id` attribute
    TestIdLegacy(String),
    /// Element id
    Id(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a `data-test` selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Create a `data-test-id` selector
    #[must_use]
    pub fn test_id_legacy(id: impl Into<String>) -> Self {
        Self::TestIdLegacy(id.into())
    }

    /// Create an element id selector
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Render as a CSS selector
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Css(s) => s.clone(),
            Self::TestId(id) => format!("[data-test={id:?}]"),
            Self::TestIdLegacy(id) => format!("[data-test-id={id:?}]"),
            Self::Id(id) => format!("[id={id:?}]"),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}
