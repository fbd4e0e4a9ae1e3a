//! Period error types.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

/// Errors raised while resolving or validating periods.
#[derive(Debug, Error)]
pub enum PeriodError {
    /// Configured time zone is not an IANA name.
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),

    /// Local boundary falls into a daylight-saving gap.
    #[error("Local time {0} does not exist in the configured time zone")]
    NonexistentLocalTime(NaiveDateTime),

    /// Period ends before it starts.
    #[error("Period ends at {end} before it starts at {start}")]
    InvertedBounds {
        /// Requested start.
        start: DateTime<Utc>,
        /// Requested end.
        end: DateTime<Utc>,
    },
}

impl PeriodError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTimeZone(_) => "UNKNOWN_TIME_ZONE",
            Self::NonexistentLocalTime(_) => "NONEXISTENT_LOCAL_TIME",
            Self::InvertedBounds { .. } => "INVERTED_PERIOD_BOUNDS",
        }
    }
}
