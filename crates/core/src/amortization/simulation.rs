//! Borrower-facing simulations built on the calculator.

use lendfund_shared::types::round_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculator::AmortizationCalculator;
use super::error::AmortizationError;
use super::types::{CalculationMethod, Schedule, ScheduleRequest};

/// Term offsets offered around the requested installment count.
const TERM_OFFSETS: [i64; 3] = [-2, 0, 2];

/// One alternative term for the same principal and rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermOption {
    /// Installment count of this option.
    pub installments: u32,
    /// Flat schedule for that count.
    pub schedule: Schedule,
}

/// Installment amounts a borrower can reasonably ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentRange {
    /// Zero-interest installment, `principal / n`.
    pub minimum: Decimal,
    /// Suggested upper bound, twice the minimum.
    pub maximum: Decimal,
}

/// Flat schedules at `n − 2`, `n` and `n + 2` installments.
///
/// # Errors
///
/// Returns [`AmortizationError::TooFewInstallmentsForOptions`] when `n ≤ 2`,
/// or any calculator error for the principal and rate.
pub fn term_options(
    principal: Decimal,
    rate_percent: Decimal,
    installments: u32,
) -> Result<Vec<TermOption>, AmortizationError> {
    if installments <= 2 {
        return Err(AmortizationError::TooFewInstallmentsForOptions(installments));
    }

    TERM_OFFSETS
        .iter()
        .map(|offset| {
            let count = u32::try_from(i64::from(installments) + offset)
                .map_err(|_| AmortizationError::Overflow("term option count"))?;
            let schedule = AmortizationCalculator::calculate(&ScheduleRequest {
                principal,
                rate_percent,
                installments: count,
                method: CalculationMethod::Flat,
            })?;
            Ok(TermOption {
                installments: count,
                schedule,
            })
        })
        .collect()
}

/// Minimum and suggested maximum installment for a principal and term.
///
/// # Errors
///
/// Returns an error if the principal is not positive or `n` is zero.
pub fn installment_range(
    principal: Decimal,
    installments: u32,
) -> Result<InstallmentRange, AmortizationError> {
    if principal <= Decimal::ZERO {
        return Err(AmortizationError::NonPositivePrincipal(principal));
    }
    if installments == 0 {
        return Err(AmortizationError::NonPositiveInstallments);
    }

    let minimum = principal / Decimal::from(installments);
    Ok(InstallmentRange {
        minimum: round_money(minimum),
        maximum: round_money(minimum * Decimal::TWO),
    })
}

/// True when `desired` lies in `[principal / n, principal]`.
///
/// Anything outside that band cannot come out of the solver: below it the
/// rate would be negative, above it one installment repays more than the loan.
#[must_use]
pub fn is_plausible_installment(principal: Decimal, desired: Decimal, installments: u32) -> bool {
    if installments == 0 || principal <= Decimal::ZERO {
        return false;
    }
    let floor = principal / Decimal::from(installments);
    desired >= floor && desired <= principal
}
