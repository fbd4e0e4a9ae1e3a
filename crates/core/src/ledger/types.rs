//! Ledger domain types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use lendfund_shared::types::{LedgerEntryId, LoanId, PeriodId, round_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a ledger movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Money entering the fund.
    Income,
    /// Money leaving the fund.
    Expense,
}

impl EntryKind {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown entry kind: {other}")),
        }
    }
}

/// Status labels written by the engine. The column is free-form; callers may
/// record others.
pub mod status {
    /// Awaiting settlement (scheduled fixed expenses).
    pub const PENDING: &str = "pending";
    /// Capital placed into the fund (carry-over).
    pub const DEPOSITED: &str = "deposited";
    /// Settled outflow.
    pub const PAID: &str = "paid";
    /// Principal handed to a borrower.
    pub const DISBURSED: &str = "disbursed";
    /// Installment payment received.
    pub const CONFIRMED: &str = "confirmed";
}

/// A ledger entry as submitted for registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLedgerEntry {
    /// Owning period; resolved from `recorded_at` when absent.
    pub period_id: Option<PeriodId>,
    /// Entry instant; defaults to now.
    pub recorded_at: Option<DateTime<Utc>>,
    /// Income or expense.
    pub kind: EntryKind,
    /// Free-form status label.
    pub status: String,
    /// Human-readable description.
    pub description: String,
    /// Non-negative amount.
    pub amount: Decimal,
    /// Loan the entry belongs to, if any.
    pub loan_id: Option<LoanId>,
}

impl NewLedgerEntry {
    /// Entry with the period and timestamp left for resolution.
    #[must_use]
    pub fn new(
        kind: EntryKind,
        status: impl Into<String>,
        description: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            period_id: None,
            recorded_at: None,
            kind,
            status: status.into(),
            description: description.into(),
            amount,
            loan_id: None,
        }
    }

    /// Pins the owning period.
    #[must_use]
    pub fn in_period(mut self, period_id: PeriodId) -> Self {
        self.period_id = Some(period_id);
        self
    }

    /// Pins the entry instant.
    #[must_use]
    pub fn at(mut self, recorded_at: DateTime<Utc>) -> Self {
        self.recorded_at = Some(recorded_at);
        self
    }

    /// Links the entry to a loan.
    #[must_use]
    pub fn for_loan(mut self, loan_id: LoanId) -> Self {
        self.loan_id = Some(loan_id);
        self
    }
}

/// A registered ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier.
    pub id: LedgerEntryId,
    /// Owning period.
    pub period_id: PeriodId,
    /// Entry instant, whole seconds.
    pub recorded_at: DateTime<Utc>,
    /// Income or expense.
    pub kind: EntryKind,
    /// Free-form status label.
    pub status: String,
    /// Human-readable description.
    pub description: String,
    /// Amount, rounded to cents.
    pub amount: Decimal,
    /// Loan the entry belongs to, if any.
    pub loan_id: Option<LoanId>,
}

/// Income, expense and net of one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// Period summarized.
    pub period_id: PeriodId,
    /// Sum of income entries.
    pub income: Decimal,
    /// Sum of expense entries.
    pub expense: Decimal,
    /// `income − expense`.
    pub net: Decimal,
    /// Number of entries.
    pub entry_count: usize,
}

impl PeriodSummary {
    /// Totals the entries that belong to `period_id`; others are ignored.
    #[must_use]
    pub fn from_entries(period_id: PeriodId, entries: &[LedgerEntry]) -> Self {
        let mut income = Decimal::ZERO;
        let mut expense = Decimal::ZERO;
        let mut entry_count = 0;

        for entry in entries.iter().filter(|e| e.period_id == period_id) {
            match entry.kind {
                EntryKind::Income => income += entry.amount,
                EntryKind::Expense => expense += entry.amount,
            }
            entry_count += 1;
        }

        Self {
            period_id,
            income: round_money(income),
            expense: round_money(expense),
            net: round_money(income - expense),
            entry_count,
        }
    }
}
