//! Money rounding helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are plain `rust_decimal::Decimal` values; these helpers fix the
//! cent-level precision every ledger figure is stored and reported with.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency figures are kept to two decimal places.
pub const MONEY_DECIMALS: u32 = 2;

/// One cent, the smallest representable ledger amount.
pub const ONE_CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rounds an amount to cents, halves away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

/// Returns true when `a` and `b` differ by at most `cents` cents.
#[must_use]
pub fn within_cents(a: Decimal, b: Decimal, cents: u32) -> bool {
    (a - b).abs() <= ONE_CENT * Decimal::from(cents)
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
