//! Property-based tests for AmortizationCalculator.
//!
//! - Property 1: Capital components repay the principal
//! - Property 2: Flat installments are identical
//! - Property 3: Declining schedules end at zero

use lendfund_shared::types::{ONE_CENT, within_cents};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calculator::AmortizationCalculator;
use super::types::{CalculationMethod, ScheduleRequest};

/// Principal from 100.00 to 1,000,000.00.
fn principal() -> impl Strategy<Value = Decimal> {
    (10_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Rate from 0.00% to 50.00%.
fn rate_percent() -> impl Strategy<Value = Decimal> {
    (0i64..=5_000i64).prop_map(|v| Decimal::new(v, 2))
}

fn installments() -> impl Strategy<Value = u32> {
    1u32..=60
}

fn method() -> impl Strategy<Value = CalculationMethod> {
    prop_oneof![Just(CalculationMethod::Flat), Just(CalculationMethod::Declining)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 1: *For any* request, the capital components sum to the
    /// principal within one cent per line.
    #[test]
    fn prop_capital_sums_to_principal(
        principal in principal(),
        rate in rate_percent(),
        n in installments(),
        method in method(),
    ) {
        let schedule = AmortizationCalculator::calculate(&ScheduleRequest {
            principal,
            rate_percent: rate,
            installments: n,
            method,
        }).unwrap();

        prop_assert!(
            within_cents(schedule.total_capital(), principal, n),
            "capital {} drifts from {}", schedule.total_capital(), principal
        );
        prop_assert_eq!(schedule.installments(), n);
    }

    /// Property 2: *For any* flat request, every line carries the same
    /// installment, interest and capital.
    #[test]
    fn prop_flat_lines_identical(
        principal in principal(),
        rate in rate_percent(),
        n in installments(),
    ) {
        let schedule = AmortizationCalculator::calculate(&ScheduleRequest {
            principal,
            rate_percent: rate,
            installments: n,
            method: CalculationMethod::Flat,
        }).unwrap();

        let first = schedule.lines[0];
        for line in &schedule.lines {
            prop_assert_eq!(line.installment, first.installment);
            prop_assert_eq!(line.interest, first.interest);
            prop_assert_eq!(line.capital, first.capital);
        }
        prop_assert_eq!(schedule.installment_amount, first.installment);
    }

    /// Property 3: *For any* declining request, the balance after the last
    /// installment is within one cent of zero.
    #[test]
    fn prop_declining_final_balance_zero(
        principal in principal(),
        rate in rate_percent(),
        n in installments(),
    ) {
        let schedule = AmortizationCalculator::calculate(&ScheduleRequest {
            principal,
            rate_percent: rate,
            installments: n,
            method: CalculationMethod::Declining,
        }).unwrap();

        let last = schedule.lines.last().unwrap();
        prop_assert!(last.balance.abs() <= ONE_CENT, "final balance {}", last.balance);
    }

    /// Sequences run 1..=n in order.
    #[test]
    fn prop_sequences_are_contiguous(
        principal in principal(),
        rate in rate_percent(),
        n in installments(),
        method in method(),
    ) {
        let schedule = AmortizationCalculator::calculate(&ScheduleRequest {
            principal,
            rate_percent: rate,
            installments: n,
            method,
        }).unwrap();

        for (index, line) in schedule.lines.iter().enumerate() {
            prop_assert_eq!(line.sequence as usize, index + 1);
        }
    }
}
