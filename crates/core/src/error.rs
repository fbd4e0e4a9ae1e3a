//! Lending engine error types.

use chrono::{DateTime, Utc};
use lendfund_shared::AppError;
use lendfund_shared::types::{LoanId, PeriodId};
use thiserror::Error;

use crate::amortization::AmortizationError;
use crate::expense::ExpenseError;
use crate::period::PeriodError;
use crate::store::StoreError;

/// Errors surfaced by the lending services.
#[derive(Debug, Error)]
pub enum LendingError {
    /// Malformed or out-of-range input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Loan does not exist.
    #[error("Loan not found: {0}")]
    LoanNotFound(LoanId),

    /// Period does not exist.
    #[error("Period not found: {0}")]
    PeriodNotFound(PeriodId),

    /// No period covers the instant of a ledger write.
    #[error("No active consolidation period for {0}")]
    NoActivePeriod(DateTime<Utc>),

    /// Every installment has been paid.
    #[error("Loan {0} is already fully paid")]
    LoanAlreadyPaid(LoanId),

    /// A cut day's period would overlap an existing one.
    #[error("New period starting {start} overlaps period {existing}")]
    PeriodOverlap {
        /// Start of the period that could not be opened.
        start: DateTime<Utc>,
        /// Period already covering that start.
        existing: PeriodId,
    },

    /// Schedule or rate computation failed.
    #[error(transparent)]
    Amortization(#[from] AmortizationError),

    /// Period boundary resolution failed.
    #[error(transparent)]
    Period(#[from] PeriodError),

    /// Fixed expense template is malformed.
    #[error(transparent)]
    Expense(#[from] ExpenseError),

    /// Storage failure, passed through unchanged.
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl LendingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::LoanNotFound(_) => "LOAN_NOT_FOUND",
            Self::PeriodNotFound(_) => "PERIOD_NOT_FOUND",
            Self::NoActivePeriod(_) => "NO_ACTIVE_PERIOD",
            Self::LoanAlreadyPaid(_) => "LOAN_ALREADY_PAID",
            Self::PeriodOverlap { .. } => "PERIOD_OVERLAP",
            Self::Amortization(e) => e.error_code(),
            Self::Period(e) => e.error_code(),
            Self::Expense(e) => e.error_code(),
            Self::Persistence(StoreError::Conflict(_)) => "CONFLICT",
            Self::Persistence(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation(_)
            | Self::Amortization(
                AmortizationError::NonPositivePrincipal(_)
                | AmortizationError::NegativeRate(_)
                | AmortizationError::RateTooPrecise { .. }
                | AmortizationError::NonPositiveInstallment(_),
            )
            | Self::Expense(_) => 400,
            Self::LoanNotFound(_) | Self::PeriodNotFound(_) => 404,
            Self::PeriodOverlap { .. } | Self::Persistence(StoreError::Conflict(_)) => 409,
            Self::NoActivePeriod(_)
            | Self::LoanAlreadyPaid(_)
            | Self::Amortization(_)
            | Self::Period(PeriodError::NonexistentLocalTime(_) | PeriodError::InvertedBounds { .. }) => 422,
            Self::Period(PeriodError::UnknownTimeZone(_)) | Self::Persistence(_) => 500,
        }
    }
}

impl From<LendingError> for AppError {
    fn from(err: LendingError) -> Self {
        let message = err.to_string();
        match err.http_status_code() {
            400 => Self::Validation(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            422 => Self::BusinessRule(message),
            _ => match err {
                LendingError::Persistence(_) => Self::Database(message),
                _ => Self::Internal(message),
            },
        }
    }
}
