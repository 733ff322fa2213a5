//! Error types for dancetime-core.
//!
//! Two layers live here: [`ParseError`], the sentinel returned by the date
//! normalizer for a single unusable value, and [`DanceTimeError`], the
//! general error for configuration-level failures such as unknown zones.

use serde::Serialize;
use thiserror::Error;

/// A date/time value that could not be normalized.
///
/// Callers exclude the owning record from classification and report it
/// separately. It is never mapped onto a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("Unparseable date '{input}': {reason}")]
pub struct ParseError {
    /// The raw value as received from the store.
    pub input: String,
    /// Human-readable cause.
    pub reason: String,
}

impl ParseError {
    pub fn new(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// The main error type for dancetime operations.
#[derive(Debug, Error)]
pub enum DanceTimeError {
    /// Invalid timezone name provided.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Error parsing a date/time input.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    /// Filter settings that can never match (e.g. min price above max price).
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}

/// Result type alias for dancetime operations.
pub type Result<T> = std::result::Result<T, DanceTimeError>;
