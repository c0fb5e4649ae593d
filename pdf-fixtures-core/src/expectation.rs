#[cfg(feature = "manifest")]
use serde::{Deserialize, Serialize};

/// How a conforming consumer is expected to react to a fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "manifest", derive(Serialize, Deserialize))]
pub enum ExpectedBehavior {
    /// Should parse successfully
    ParseSuccess {
        /// Expected page count
        page_count: usize,
    },
    /// Should fail to parse with specific error
    ParseError {
        /// Error kind expected
        error_type: String,
        /// Error message pattern (regex)
        error_pattern: Option<String>,
    },
    /// Should parse with warnings, or fail
    ParseWarning {
        /// Error kind reported when the consumer fails instead of warning
        error_type: String,
        /// Warning patterns expected
        warning_patterns: Vec<String>,
    },
}

impl ExpectedBehavior {
    pub fn success(page_count: usize) -> Self {
        ExpectedBehavior::ParseSuccess { page_count }
    }

    pub fn error(error_type: &str, error_pattern: &str) -> Self {
        ExpectedBehavior::ParseError {
            error_type: error_type.to_string(),
            error_pattern: Some(error_pattern.to_string()),
        }
    }

    pub fn warning(error_type: &str, patterns: &[&str]) -> Self {
        ExpectedBehavior::ParseWarning {
            error_type: error_type.to_string(),
            warning_patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Error kind a strict consumer should report, if any.
    pub fn error_type(&self) -> Option<&str> {
        match self {
            ExpectedBehavior::ParseSuccess { .. } => None,
            ExpectedBehavior::ParseError { error_type, .. }
            | ExpectedBehavior::ParseWarning { error_type, .. } => Some(error_type),
        }
    }
}
