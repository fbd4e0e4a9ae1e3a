//! Amortization domain types.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::AmortizationError;

/// Interest convention used to build an installment schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationMethod {
    /// Capital plus interest: interest is charged on the original principal
    /// every installment, so all installments are identical.
    Flat,
    /// Amortizable: level installments, interest charged on the declining
    /// balance.
    Declining,
}

impl CalculationMethod {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Declining => "declining",
        }
    }
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalculationMethod {
    type Err = AmortizationError;

    /// Accepts the canonical names and the business aliases used on loan
    /// applications (`capital+interest`, `amortizable`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flat" | "capital+interest" | "capital+interes" => Ok(Self::Flat),
            "declining" | "amortizable" => Ok(Self::Declining),
            _ => Err(AmortizationError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// Decimal places a rate may carry; loans store rates at this precision.
pub const RATE_DECIMALS: u32 = 4;

/// Parameters of a schedule calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleRequest {
    /// Amount lent.
    pub principal: Decimal,
    /// Interest per installment period, in percent (7 means 7%).
    pub rate_percent: Decimal,
    /// Number of installments.
    pub installments: u32,
    /// Interest convention.
    pub method: CalculationMethod,
}

impl ScheduleRequest {
    /// Checks the ranges every calculation relies on.
    ///
    /// # Errors
    ///
    /// Returns an error if the principal is not positive, the rate is
    /// negative or finer than [`RATE_DECIMALS`] places, or the installment
    /// count is zero.
    pub fn validate(&self) -> Result<(), AmortizationError> {
        if self.principal <= Decimal::ZERO {
            return Err(AmortizationError::NonPositivePrincipal(self.principal));
        }
        if self.rate_percent < Decimal::ZERO {
            return Err(AmortizationError::NegativeRate(self.rate_percent));
        }
        if self.rate_percent.normalize().scale() > RATE_DECIMALS {
            return Err(AmortizationError::RateTooPrecise {
                rate: self.rate_percent,
                max: RATE_DECIMALS,
            });
        }
        if self.installments == 0 {
            return Err(AmortizationError::NonPositiveInstallments);
        }
        Ok(())
    }
}

/// One row of an installment schedule. Every figure is rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentLine {
    /// Position in the schedule, starting at 1.
    pub sequence: u32,
    /// Amount due for this installment.
    pub installment: Decimal,
    /// Interest component.
    pub interest: Decimal,
    /// Capital component.
    pub capital: Decimal,
    /// Outstanding principal after this installment.
    pub balance: Decimal,
}

/// A complete installment schedule with totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Amount lent.
    pub principal: Decimal,
    /// Interest per period, in percent.
    pub rate_percent: Decimal,
    /// Interest convention.
    pub method: CalculationMethod,
    /// Nominal recurring amount (the first line's installment).
    pub installment_amount: Decimal,
    /// Sum the borrower pays over the life of the loan.
    pub total_payable: Decimal,
    /// Interest part of `total_payable`.
    pub total_interest: Decimal,
    /// Ordered lines, `lines[i].sequence == i + 1`.
    pub lines: Vec<InstallmentLine>,
}

impl Schedule {
    /// Number of installments.
    #[must_use]
    pub fn installments(&self) -> u32 {
        u32::try_from(self.lines.len()).unwrap_or(u32::MAX)
    }

    /// Returns the line for a 1-based installment number.
    #[must_use]
    pub fn line(&self, sequence: u32) -> Option<&InstallmentLine> {
        let index = usize::try_from(sequence.checked_sub(1)?).ok()?;
        self.lines.get(index)
    }

    /// Sum of every line's capital component.
    #[must_use]
    pub fn total_capital(&self) -> Decimal {
        self.lines.iter().map(|l| l.capital).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("flat", CalculationMethod::Flat)]
    #[case("Capital+Interest", CalculationMethod::Flat)]
    #[case("declining", CalculationMethod::Declining)]
    #[case(" amortizable ", CalculationMethod::Declining)]
    fn test_method_from_str(#[case] input: &str, #[case] expected: CalculationMethod) {
        assert_eq!(input.parse::<CalculationMethod>().unwrap(), expected);
    }

    #[test]
    fn test_method_from_str_unsupported() {
        let err = "balloon".parse::<CalculationMethod>().unwrap_err();
        assert!(matches!(err, AmortizationError::UnsupportedMethod(ref m) if m == "balloon"));
    }

    #[test]
    fn test_request_validation() {
        let valid = ScheduleRequest {
            principal: dec!(1000),
            rate_percent: dec!(0),
            installments: 1,
            method: CalculationMethod::Flat,
        };
        assert!(valid.validate().is_ok());

        let zero_principal = ScheduleRequest {
            principal: Decimal::ZERO,
            ..valid
        };
        assert!(matches!(
            zero_principal.validate(),
            Err(AmortizationError::NonPositivePrincipal(_))
        ));

        let negative_rate = ScheduleRequest {
            rate_percent: dec!(-1),
            ..valid
        };
        assert!(matches!(
            negative_rate.validate(),
            Err(AmortizationError::NegativeRate(_))
        ));

        let no_installments = ScheduleRequest {
            installments: 0,
            ..valid
        };
        assert!(matches!(
            no_installments.validate(),
            Err(AmortizationError::NonPositiveInstallments)
        ));
    }

    #[rstest]
    #[case(dec!(7.1234), true)]
    #[case(dec!(7.12340000), true)]
    #[case(dec!(7.12345), false)]
    #[case(dec!(0.00001), false)]
    fn test_rate_precision_matches_stored_scale(#[case] rate: Decimal, #[case] accepted: bool) {
        let request = ScheduleRequest {
            principal: dec!(1000),
            rate_percent: rate,
            installments: 3,
            method: CalculationMethod::Declining,
        };
        match request.validate() {
            Ok(()) => assert!(accepted, "{rate} should be rejected"),
            Err(AmortizationError::RateTooPrecise { max, .. }) => {
                assert!(!accepted, "{rate} should be accepted");
                assert_eq!(max, RATE_DECIMALS);
            }
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_schedule_line_lookup() {
        let line = InstallmentLine {
            sequence: 1,
            installment: dec!(10),
            interest: dec!(1),
            capital: dec!(9),
            balance: dec!(0),
        };
        let schedule = Schedule {
            principal: dec!(9),
            rate_percent: dec!(11.11),
            method: CalculationMethod::Flat,
            installment_amount: dec!(10),
            total_payable: dec!(10),
            total_interest: dec!(1),
            lines: vec![line],
        };
        assert_eq!(schedule.line(1), Some(&line));
        assert_eq!(schedule.line(0), None);
        assert_eq!(schedule.line(2), None);
        assert_eq!(schedule.installments(), 1);
        assert_eq!(schedule.total_capital(), dec!(9));
    }
}
