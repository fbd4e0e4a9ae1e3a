//! Interest rate solver.
//!
//! Finds the per-installment rate that makes a loan of a given principal and
//! term produce a desired installment. Both methods yield an installment that
//! grows monotonically with the rate, so plain bisection over
//! `[0, rate_ceiling]` converges.

use lendfund_shared::config::SolverConfig;
use lendfund_shared::types::round_money;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::calculator::AmortizationCalculator;
use super::error::AmortizationError;
use super::types::{CalculationMethod, InstallmentLine, RATE_DECIMALS, ScheduleRequest};

/// Bisection limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverSettings {
    /// Stop once `|computed − desired|` drops below this.
    pub tolerance: Decimal,
    /// Steps allowed before giving up.
    pub max_iterations: u32,
    /// Upper bound of the searched rate, in percent.
    pub rate_ceiling: Decimal,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self::from(&SolverConfig::default())
    }
}

impl From<&SolverConfig> for SolverSettings {
    fn from(config: &SolverConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            max_iterations: config.max_iterations,
            rate_ceiling: config.rate_ceiling,
        }
    }
}

/// Outcome of a successful solve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvedRate {
    /// Rate in percent per installment, rounded to 4 decimals.
    pub rate_percent: Decimal,
    /// Installment produced by the unrounded solved rate.
    pub achieved_installment: Decimal,
    /// `achieved − desired`.
    pub difference: Decimal,
    /// Bisection steps taken.
    pub iterations: u32,
    /// `desired × installments`.
    pub total_payable: Decimal,
    /// `total_payable − principal`.
    pub total_interest: Decimal,
    /// Schedule at the rounded solved rate.
    pub lines: Vec<InstallmentLine>,
}

/// Bisection rate solver.
#[derive(Debug, Clone, Default)]
pub struct RateSolver {
    settings: SolverSettings,
}

impl RateSolver {
    /// Creates a solver with explicit limits.
    #[must_use]
    pub fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }

    /// Returns the active limits.
    #[must_use]
    pub fn settings(&self) -> SolverSettings {
        self.settings
    }

    /// Solves for the rate that yields `desired_installment`.
    ///
    /// # Errors
    ///
    /// Returns [`AmortizationError::RateNotFound`] when the tolerance is not
    /// reached within the iteration limit, which includes desired installments
    /// below `principal / n` or above what the ceiling rate produces.
    pub fn solve(
        &self,
        principal: Decimal,
        desired_installment: Decimal,
        installments: u32,
        method: CalculationMethod,
    ) -> Result<SolvedRate, AmortizationError> {
        if principal <= Decimal::ZERO {
            return Err(AmortizationError::NonPositivePrincipal(principal));
        }
        if desired_installment <= Decimal::ZERO {
            return Err(AmortizationError::NonPositiveInstallment(desired_installment));
        }
        if installments == 0 {
            return Err(AmortizationError::NonPositiveInstallments);
        }

        let two = Decimal::TWO;
        let mut low = Decimal::ZERO;
        let mut high = self.settings.rate_ceiling;
        let mut iterations = 0_u32;

        let (rate, achieved) = loop {
            let mid = (low + high) / two;
            let computed =
                AmortizationCalculator::installment_for_rate(principal, mid, installments, method)?;
            let diff = computed - desired_installment;

            if diff.abs() < self.settings.tolerance {
                break (mid, computed);
            }
            if diff > Decimal::ZERO {
                high = mid;
            } else {
                low = mid;
            }

            iterations += 1;
            if iterations >= self.settings.max_iterations {
                tracing::debug!(
                    %principal,
                    %desired_installment,
                    installments,
                    iterations,
                    "rate bisection exhausted"
                );
                return Err(AmortizationError::RateNotFound {
                    desired: desired_installment,
                    ceiling: self.settings.rate_ceiling,
                    iterations,
                });
            }
        };

        let total_payable = desired_installment
            .checked_mul(Decimal::from(installments))
            .ok_or(AmortizationError::Overflow("total payable"))?;
        let rate_percent =
            rate.round_dp_with_strategy(RATE_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
        let lines = AmortizationCalculator::calculate(&ScheduleRequest {
            principal,
            rate_percent,
            installments,
            method,
        })?
        .lines;

        Ok(SolvedRate {
            rate_percent,
            achieved_installment: round_money(achieved),
            difference: round_money(achieved - desired_installment),
            iterations,
            total_payable: round_money(total_payable),
            total_interest: round_money(total_payable - principal),
            lines,
        })
    }
}
