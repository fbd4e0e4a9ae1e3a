//! Loan domain types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use lendfund_shared::types::{LoanId, PaymentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::{CalculationMethod, ScheduleRequest};

/// Lifecycle state of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanState {
    /// Installments outstanding.
    Active,
    /// Every installment paid.
    Completed,
}

impl LoanState {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for LoanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown loan state: {other}")),
        }
    }
}

/// A loan issued from the fund.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    /// Unique identifier.
    pub id: LoanId,
    /// Borrower reference, opaque to the engine.
    pub borrower: String,
    /// Amount lent.
    pub principal: Decimal,
    /// Interest convention.
    pub method: CalculationMethod,
    /// Interest per installment, in percent.
    pub rate_percent: Decimal,
    /// Installments agreed.
    pub installment_count: u32,
    /// Installments still unpaid.
    pub installments_remaining: u32,
    /// Principal still owed.
    pub remaining_principal: Decimal,
    /// Active or completed.
    pub state: LoanState,
    /// Disbursement instant.
    pub issued_at: DateTime<Utc>,
    /// Instant of the latest payment.
    pub last_payment_at: Option<DateTime<Utc>>,
}

impl Loan {
    /// Parameters that regenerate this loan's schedule.
    #[must_use]
    pub fn schedule_request(&self) -> ScheduleRequest {
        ScheduleRequest {
            principal: self.principal,
            rate_percent: self.rate_percent,
            installments: self.installment_count,
            method: self.method,
        }
    }

    /// Sequence number the next payment settles, or `None` when paid off.
    #[must_use]
    pub fn next_sequence(&self) -> Option<u32> {
        if self.is_paid_off() {
            return None;
        }
        Some(self.installment_count - self.installments_remaining + 1)
    }

    /// True when nothing is left to pay.
    #[must_use]
    pub fn is_paid_off(&self) -> bool {
        self.installments_remaining == 0 || self.state == LoanState::Completed
    }
}

/// Request to issue a loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLoan {
    /// Borrower reference.
    pub borrower: String,
    /// Amount lent.
    pub principal: Decimal,
    /// Interest convention.
    pub method: CalculationMethod,
    /// Interest per installment, in percent.
    pub rate_percent: Decimal,
    /// Installments agreed.
    pub installment_count: u32,
}

/// A recorded installment payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: PaymentId,
    /// Loan paid.
    pub loan_id: LoanId,
    /// Payment instant.
    pub paid_at: DateTime<Utc>,
    /// Free-form payment channel (cash, transfer, ...).
    pub payment_type: String,
    /// Installment settled, 1-based.
    pub installment_number: u32,
    /// Total paid.
    pub amount: Decimal,
    /// Interest part.
    pub interest_paid: Decimal,
    /// Capital part.
    pub capital_paid: Decimal,
    /// Installments left after this payment.
    pub installments_remaining: u32,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Request to record the next installment of a loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPayment {
    /// Loan paid.
    pub loan_id: LoanId,
    /// Free-form payment channel.
    pub payment_type: String,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Outcome of recording a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    /// Stored payment.
    pub payment: Payment,
    /// Loan after the payment.
    pub loan: Loan,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn loan(count: u32, remaining: u32) -> Loan {
        Loan {
            id: LoanId::new(),
            borrower: "client-7".to_string(),
            principal: dec!(10000),
            method: CalculationMethod::Flat,
            rate_percent: dec!(10),
            installment_count: count,
            installments_remaining: remaining,
            remaining_principal: dec!(10000),
            state: LoanState::Active,
            issued_at: Utc::now(),
            last_payment_at: None,
        }
    }

    #[test]
    fn test_next_sequence() {
        assert_eq!(loan(5, 5).next_sequence(), Some(1));
        assert_eq!(loan(5, 2).next_sequence(), Some(4));
        assert_eq!(loan(5, 0).next_sequence(), None);
    }

    #[test]
    fn test_completed_loan_is_paid_off() {
        let mut l = loan(5, 1);
        l.state = LoanState::Completed;
        assert!(l.is_paid_off());
        assert_eq!(l.next_sequence(), None);
    }

    #[test]
    fn test_state_names() {
        assert_eq!("completed".parse::<LoanState>(), Ok(LoanState::Completed));
        assert_eq!(LoanState::Active.to_string(), "active");
    }
}
