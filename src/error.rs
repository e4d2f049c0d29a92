//! Error types for timetable resolution.
//!
//! Every error is fatal to the current run: a timetable that fails to
//! resolve is never patched into a partial plan.

use thiserror::Error;

use crate::catalog::TemplateTable;

/// Result type for timetable operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving a weekly timetable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed or ambiguous input (time specification, marker, weekday).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A period marker has no matching catalog row.
    ///
    /// `weekday` is zero-based; the message shows it one-based the way
    /// markers are written.
    #[error("No {table} template for weekday {} period {instance}", .weekday.saturating_add(1))]
    NoTemplate {
        /// Table that was searched.
        table: TemplateTable,
        /// Zero-based weekday of the marker.
        weekday: u8,
        /// Period instance of the marker.
        instance: u32,
    },

    /// Two different windows on the same weekday overlap.
    #[error("Overlapping windows on weekday {weekday}: {first} and {second}")]
    OverlapViolation {
        /// Zero-based weekday.
        weekday: u8,
        /// Earlier window, formatted as `start-end`.
        first: String,
        /// Later window, formatted as `start-end`.
        second: String,
    },

    /// Configuration or catalog could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Config(err.to_string())
    }
}
