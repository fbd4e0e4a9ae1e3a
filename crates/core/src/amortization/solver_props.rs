//! Property-based tests for RateSolver.
//!
//! - Property 4: Solving the installment of a schedule recovers its rate

use lendfund_shared::types::within_cents;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calculator::AmortizationCalculator;
use super::solver::RateSolver;
use super::types::{CalculationMethod, ScheduleRequest};

/// Principal from 1,000.00 to 500,000.00.
fn principal() -> impl Strategy<Value = Decimal> {
    (100_000i64..50_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Rate in (0, 50].
fn rate_percent() -> impl Strategy<Value = Decimal> {
    (1i64..=5_000i64).prop_map(|v| Decimal::new(v, 2))
}

fn method() -> impl Strategy<Value = CalculationMethod> {
    prop_oneof![Just(CalculationMethod::Flat), Just(CalculationMethod::Declining)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 4: *For any* principal, rate in (0, 50] and n in [2, 60],
    /// solving for the schedule's installment amount returns the rate
    /// within 0.01.
    #[test]
    fn prop_solver_round_trip(
        principal in principal(),
        rate in rate_percent(),
        n in 2u32..=60,
        method in method(),
    ) {
        let schedule = AmortizationCalculator::calculate(&ScheduleRequest {
            principal,
            rate_percent: rate,
            installments: n,
            method,
        }).unwrap();

        let solved = RateSolver::default()
            .solve(principal, schedule.installment_amount, n, method)
            .unwrap();

        prop_assert!(
            within_cents(solved.rate_percent, rate, 1),
            "solved {} for rate {}", solved.rate_percent, rate
        );
        prop_assert!(solved.iterations < 100);
        prop_assert_eq!(solved.lines.len(), n as usize);
    }
}
