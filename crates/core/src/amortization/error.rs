//! Amortization error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by schedule calculation and rate solving.
#[derive(Debug, Error)]
pub enum AmortizationError {
    /// Calculation method is neither flat nor declining.
    #[error("Unsupported calculation method: {0}")]
    UnsupportedMethod(String),

    /// Principal must be strictly positive.
    #[error("Principal must be positive, got {0}")]
    NonPositivePrincipal(Decimal),

    /// Interest rate cannot be negative.
    #[error("Interest rate cannot be negative, got {0}")]
    NegativeRate(Decimal),

    /// Interest rate carries more decimals than a loan stores.
    #[error("Interest rate allows at most {max} decimal places, got {rate}")]
    RateTooPrecise {
        /// Rejected rate.
        rate: Decimal,
        /// Decimal places allowed.
        max: u32,
    },

    /// At least one installment is required.
    #[error("Installment count must be at least 1")]
    NonPositiveInstallments,

    /// Desired installment must be strictly positive.
    #[error("Desired installment must be positive, got {0}")]
    NonPositiveInstallment(Decimal),

    /// Term options need room for the shorter alternative.
    #[error("Term options require more than 2 installments, got {0}")]
    TooFewInstallmentsForOptions(u32),

    /// Bisection did not reach the tolerance within the iteration limit.
    #[error("No rate in [0, {ceiling}] reproduces installment {desired} within {iterations} iterations")]
    RateNotFound {
        /// Installment the caller asked for.
        desired: Decimal,
        /// Upper bound of the searched rate.
        ceiling: Decimal,
        /// Iterations spent.
        iterations: u32,
    },

    /// Intermediate value left the representable decimal range.
    #[error("Arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}

impl AmortizationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedMethod(_) => "UNSUPPORTED_METHOD",
            Self::NonPositivePrincipal(_) => "NON_POSITIVE_PRINCIPAL",
            Self::NegativeRate(_) => "NEGATIVE_RATE",
            Self::RateTooPrecise { .. } => "RATE_TOO_PRECISE",
            Self::NonPositiveInstallments => "NON_POSITIVE_INSTALLMENTS",
            Self::NonPositiveInstallment(_) => "NON_POSITIVE_INSTALLMENT",
            Self::TooFewInstallmentsForOptions(_) => "TOO_FEW_INSTALLMENTS",
            Self::RateNotFound { .. } => "RATE_NOT_FOUND",
            Self::Overflow(_) => "ARITHMETIC_OVERFLOW",
        }
    }
}
