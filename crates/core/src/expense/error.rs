//! Fixed expense error types.

use lendfund_shared::types::ExpenseTemplateId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors in a fixed expense template.
#[derive(Debug, Error)]
pub enum ExpenseError {
    /// Frequency is neither monthly nor biweekly.
    #[error("Unknown expense frequency: {0}")]
    UnknownFrequency(String),

    /// Day of month outside 1–31.
    #[error("Day of month must be between 1 and 31, got {0}")]
    DayOutOfRange(u32),

    /// Biweekly template without a second day.
    #[error("Biweekly expense {0} has no second day of month")]
    MissingSecondDay(ExpenseTemplateId),

    /// Amount below zero.
    #[error("Expense amount cannot be negative, got {0}")]
    NegativeAmount(Decimal),
}

impl ExpenseError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownFrequency(_) => "UNKNOWN_FREQUENCY",
            Self::DayOutOfRange(_) => "DAY_OUT_OF_RANGE",
            Self::MissingSecondDay(_) => "MISSING_SECOND_DAY",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
        }
    }
}
