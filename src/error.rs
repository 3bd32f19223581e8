//! Error types for pto
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

use crate::distribution::Kind;

/// Error type for trace, distribution and search operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TraceError {
    /// An operator mode string other than `coarse` or `fine`
    #[error("Invalid mode: {0} (expected \"coarse\" or \"fine\")")]
    InvalidMode(String),

    /// A distribution was constructed with unusable parameters
    #[error("Invalid parameters for {kind}: {reason}")]
    InvalidParameters {
        /// Kind of the offending distribution
        kind: Kind,
        /// What is wrong with the parameters
        reason: String,
    },

    /// Invalid operator or solver configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A population-based solver ended up with no individuals
    #[error("Empty population")]
    EmptyPopulation,
}

impl TraceError {
    pub(crate) fn invalid(kind: Kind, reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            kind,
            reason: reason.into(),
        }
    }
}

/// Result type alias for trace operations
pub type TraceResult<T> = Result<T, TraceError>;
