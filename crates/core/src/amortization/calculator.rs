//! Installment schedule generation.
//!
//! Two conventions are supported:
//! - **flat**: `interest = principal × rate`, `capital = principal / n`, every
//!   installment identical
//! - **declining**: level installment `principal × rate / (1 − (1 + rate)^−n)`,
//!   interest charged on the running balance
//!
//! Running values are carried at full precision; every figure placed on a
//! line is rounded to cents as the line is built.

use lendfund_shared::types::round_money;
use rust_decimal::{Decimal, MathematicalOps};

use super::error::AmortizationError;
use super::types::{CalculationMethod, InstallmentLine, Schedule, ScheduleRequest};

/// Stateless schedule calculator.
pub struct AmortizationCalculator;

impl AmortizationCalculator {
    /// Builds the full installment schedule for a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is out of range or an intermediate
    /// value overflows.
    pub fn calculate(request: &ScheduleRequest) -> Result<Schedule, AmortizationError> {
        request.validate()?;

        match request.method {
            CalculationMethod::Flat => Self::flat_schedule(request),
            CalculationMethod::Declining => Self::declining_schedule(request),
        }
    }

    /// Installment implied by a rate, without building the lines.
    ///
    /// The rate solver evaluates this at every bisection step.
    ///
    /// # Errors
    ///
    /// Returns an error if an intermediate value overflows.
    pub fn installment_for_rate(
        principal: Decimal,
        rate_percent: Decimal,
        installments: u32,
        method: CalculationMethod,
    ) -> Result<Decimal, AmortizationError> {
        match method {
            CalculationMethod::Flat => {
                let (capital, interest) = flat_components(principal, rate_percent, installments)?;
                capital
                    .checked_add(interest)
                    .ok_or(AmortizationError::Overflow("flat installment"))
            }
            CalculationMethod::Declining => level_installment(principal, rate_percent, installments),
        }
    }

    fn flat_schedule(request: &ScheduleRequest) -> Result<Schedule, AmortizationError> {
        let (capital, interest) =
            flat_components(request.principal, request.rate_percent, request.installments)?;
        let installment = capital
            .checked_add(interest)
            .ok_or(AmortizationError::Overflow("flat installment"))?;
        let count = Decimal::from(request.installments);

        let lines = (1..=request.installments)
            .map(|sequence| {
                let repaid = capital
                    .checked_mul(Decimal::from(sequence))
                    .ok_or(AmortizationError::Overflow("repaid capital"))?;
                Ok(InstallmentLine {
                    sequence,
                    installment: round_money(installment),
                    interest: round_money(interest),
                    capital: round_money(capital),
                    balance: round_money(request.principal - repaid),
                })
            })
            .collect::<Result<Vec<_>, AmortizationError>>()?;

        let total_payable = installment
            .checked_mul(count)
            .ok_or(AmortizationError::Overflow("total payable"))?;
        let total_interest = interest
            .checked_mul(count)
            .ok_or(AmortizationError::Overflow("total interest"))?;

        Ok(Schedule {
            principal: request.principal,
            rate_percent: request.rate_percent,
            method: CalculationMethod::Flat,
            installment_amount: round_money(installment),
            total_payable: round_money(total_payable),
            total_interest: round_money(total_interest),
            lines,
        })
    }

    fn declining_schedule(request: &ScheduleRequest) -> Result<Schedule, AmortizationError> {
        let installment =
            level_installment(request.principal, request.rate_percent, request.installments)?;
        let rate = request.rate_percent / Decimal::ONE_HUNDRED;

        let mut balance = request.principal;
        let mut lines = Vec::with_capacity(request.installments as usize);
        for sequence in 1..=request.installments {
            let interest = balance
                .checked_mul(rate)
                .ok_or(AmortizationError::Overflow("line interest"))?;
            let capital = installment
                .checked_sub(interest)
                .ok_or(AmortizationError::Overflow("line capital"))?;
            balance = balance
                .checked_sub(capital)
                .ok_or(AmortizationError::Overflow("running balance"))?;

            lines.push(InstallmentLine {
                sequence,
                installment: round_money(installment),
                interest: round_money(interest),
                capital: round_money(capital),
                balance: round_money(balance),
            });
        }

        let total_interest = lines.iter().map(|l| l.interest).sum();
        let total_payable = installment
            .checked_mul(Decimal::from(request.installments))
            .ok_or(AmortizationError::Overflow("total payable"))?;

        Ok(Schedule {
            principal: request.principal,
            rate_percent: request.rate_percent,
            method: CalculationMethod::Declining,
            installment_amount: round_money(installment),
            total_payable: round_money(total_payable),
            total_interest,
            lines,
        })
    }
}

/// Unrounded `(capital, interest)` of every flat installment.
fn flat_components(
    principal: Decimal,
    rate_percent: Decimal,
    installments: u32,
) -> Result<(Decimal, Decimal), AmortizationError> {
    let capital = principal / Decimal::from(installments);
    let interest = principal
        .checked_mul(rate_percent / Decimal::ONE_HUNDRED)
        .ok_or(AmortizationError::Overflow("flat interest"))?;
    Ok((capital, interest))
}

/// Unrounded level installment of a declining-balance loan.
///
/// Written as `P·r + P·r / ((1 + r)^n − 1)`, which equals the annuity formula
/// and never multiplies by the (possibly huge) growth factor. A zero rate, or a
/// factor too close to 1 to divide by, degenerates to `P / n`; a factor too
/// large to represent converges to `P·r`.
pub(crate) fn level_installment(
    principal: Decimal,
    rate_percent: Decimal,
    installments: u32,
) -> Result<Decimal, AmortizationError> {
    let even_split = principal / Decimal::from(installments);
    if rate_percent.is_zero() {
        return Ok(even_split);
    }

    let rate = rate_percent / Decimal::ONE_HUNDRED;
    let periodic_interest = principal
        .checked_mul(rate)
        .ok_or(AmortizationError::Overflow("periodic interest"))?;

    let Some(factor) = (Decimal::ONE + rate).checked_powu(u64::from(installments)) else {
        return Ok(periodic_interest);
    };

    match periodic_interest.checked_div(factor - Decimal::ONE) {
        Some(annuity_part) => Ok(periodic_interest + annuity_part),
        None => Ok(even_split),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(
        principal: Decimal,
        rate_percent: Decimal,
        installments: u32,
        method: CalculationMethod,
    ) -> ScheduleRequest {
        ScheduleRequest {
            principal,
            rate_percent,
            installments,
            method,
        }
    }

    #[test]
    fn test_flat_reference_example() {
        let schedule = AmortizationCalculator::calculate(&request(
            dec!(10000),
            dec!(10),
            5,
            CalculationMethod::Flat,
        ))
        .unwrap();

        assert_eq!(schedule.installment_amount, dec!(3000.00));
        assert_eq!(schedule.total_payable, dec!(15000.00));
        assert_eq!(schedule.total_interest, dec!(5000.00));
        assert_eq!(schedule.lines.len(), 5);
        for line in &schedule.lines {
            assert_eq!(line.installment, dec!(3000.00));
            assert_eq!(line.capital, dec!(2000.00));
            assert_eq!(line.interest, dec!(1000.00));
        }
        assert_eq!(schedule.lines[0].balance, dec!(8000.00));
        assert_eq!(schedule.lines[4].balance, dec!(0.00));
    }

    #[test]
    fn test_flat_uneven_split_rounds_each_line() {
        let schedule = AmortizationCalculator::calculate(&request(
            dec!(10000),
            dec!(5),
            3,
            CalculationMethod::Flat,
        ))
        .unwrap();

        // 3333.333... + 500
        assert_eq!(schedule.installment_amount, dec!(3833.33));
        assert_eq!(schedule.lines[0].capital, dec!(3333.33));
        assert_eq!(schedule.total_payable, dec!(11500.00));
        assert_eq!(schedule.total_interest, dec!(1500.00));
        assert_eq!(schedule.lines[2].balance, dec!(0.00));
    }

    #[test]
    fn test_declining_standard_annuity() {
        // 1000 at 10% over 3: installment 402.11
        let schedule = AmortizationCalculator::calculate(&request(
            dec!(1000),
            dec!(10),
            3,
            CalculationMethod::Declining,
        ))
        .unwrap();

        assert_eq!(schedule.installment_amount, dec!(402.11));
        let first = schedule.lines[0];
        assert_eq!(first.interest, dec!(100.00));
        assert_eq!(first.capital, dec!(302.11));
        assert_eq!(first.balance, dec!(697.89));

        let second = schedule.lines[1];
        assert_eq!(second.interest, dec!(69.79));

        let last = schedule.lines[2];
        assert!(last.balance.abs() <= dec!(0.01));
        assert_eq!(schedule.total_payable, dec!(1206.34));
    }

    #[test]
    fn test_declining_zero_rate_splits_evenly() {
        let schedule = AmortizationCalculator::calculate(&request(
            dec!(1200),
            Decimal::ZERO,
            4,
            CalculationMethod::Declining,
        ))
        .unwrap();

        assert_eq!(schedule.installment_amount, dec!(300.00));
        assert!(schedule.lines.iter().all(|l| l.interest.is_zero()));
        assert_eq!(schedule.total_interest, Decimal::ZERO);
        assert_eq!(schedule.lines[3].balance, dec!(0.00));
    }

    #[test]
    fn test_single_installment() {
        let flat = AmortizationCalculator::calculate(&request(
            dec!(500),
            dec!(8),
            1,
            CalculationMethod::Flat,
        ))
        .unwrap();
        assert_eq!(flat.installment_amount, dec!(540.00));

        let declining = AmortizationCalculator::calculate(&request(
            dec!(500),
            dec!(8),
            1,
            CalculationMethod::Declining,
        ))
        .unwrap();
        assert_eq!(declining.installment_amount, dec!(540.00));
        assert_eq!(declining.lines[0].balance, dec!(0.00));
    }

    #[test]
    fn test_rejects_zero_installments() {
        let result = AmortizationCalculator::calculate(&request(
            dec!(500),
            dec!(8),
            0,
            CalculationMethod::Flat,
        ));
        assert!(matches!(result, Err(AmortizationError::NonPositiveInstallments)));
    }

    #[test]
    fn test_level_installment_huge_factor_converges_to_interest() {
        // 2^1000 does not fit in a decimal
        let installment = level_installment(dec!(1000), dec!(100), 1000).unwrap();
        assert_eq!(installment, dec!(1000));
    }

    #[test]
    fn test_flat_overflow_is_an_error() {
        let huge = Decimal::from_i128_with_scale(10_i128.pow(28), 0);
        let result = AmortizationCalculator::calculate(&request(
            huge,
            dec!(1000),
            5,
            CalculationMethod::Flat,
        ));
        assert!(matches!(result, Err(AmortizationError::Overflow(_))));

        let installment =
            AmortizationCalculator::installment_for_rate(huge, dec!(1000), 5, CalculationMethod::Flat);
        assert!(matches!(installment, Err(AmortizationError::Overflow(_))));
    }

    #[test]
    fn test_installment_for_rate_matches_schedule() {
        let schedule = AmortizationCalculator::calculate(&request(
            dec!(25000),
            dec!(4.5),
            24,
            CalculationMethod::Declining,
        ))
        .unwrap();
        let installment = AmortizationCalculator::installment_for_rate(
            dec!(25000),
            dec!(4.5),
            24,
            CalculationMethod::Declining,
        )
        .unwrap();
        assert_eq!(round_money(installment), schedule.installment_amount);
    }
}
