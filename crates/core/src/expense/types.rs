//! Fixed expense domain types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use lendfund_shared::types::{ExpenseExecutionId, ExpenseTemplateId, LedgerEntryId, PeriodId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ExpenseError;

/// How often a fixed expense falls due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseFrequency {
    /// Once a month, on `day_one`.
    Monthly,
    /// Twice a month, on `day_one` and `day_two`.
    Biweekly,
}

impl ExpenseFrequency {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Biweekly => "biweekly",
        }
    }
}

impl fmt::Display for ExpenseFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseFrequency {
    type Err = ExpenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Self::Monthly),
            "biweekly" => Ok(Self::Biweekly),
            other => Err(ExpenseError::UnknownFrequency(other.to_string())),
        }
    }
}

/// A recurring expense definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedExpenseTemplate {
    /// Unique identifier.
    pub id: ExpenseTemplateId,
    /// Display name.
    pub name: String,
    /// Amount charged each time it falls due.
    pub amount: Decimal,
    /// Monthly or biweekly.
    pub frequency: ExpenseFrequency,
    /// First day of month it falls due (1–31).
    pub day_one: u32,
    /// Second day of month, required when biweekly.
    pub day_two: Option<u32>,
    /// Inactive templates are never scheduled.
    pub active: bool,
}

impl FixedExpenseTemplate {
    /// Checks day ranges, amount sign and the biweekly second day.
    pub fn validate(&self) -> Result<(), ExpenseError> {
        if self.amount < Decimal::ZERO {
            return Err(ExpenseError::NegativeAmount(self.amount));
        }
        for day in std::iter::once(self.day_one).chain(self.day_two) {
            if !(1..=31).contains(&day) {
                return Err(ExpenseError::DayOutOfRange(day));
            }
        }
        if self.frequency == ExpenseFrequency::Biweekly && self.day_two.is_none() {
            return Err(ExpenseError::MissingSecondDay(self.id));
        }
        Ok(())
    }

    /// Days of month this template is charged on.
    #[must_use]
    pub fn days_of_month(&self) -> Vec<u32> {
        match (self.frequency, self.day_two) {
            (ExpenseFrequency::Biweekly, Some(second)) => vec![self.day_one, second],
            _ => vec![self.day_one],
        }
    }
}

/// Audit record of a fixed expense charged in a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedExpenseExecution {
    /// Unique identifier.
    pub id: ExpenseExecutionId,
    /// Template charged.
    pub template_id: ExpenseTemplateId,
    /// Period charged in.
    pub period_id: PeriodId,
    /// Amount paid.
    pub amount_paid: Decimal,
    /// When it was charged.
    pub executed_at: DateTime<Utc>,
    /// Ledger entry written alongside.
    pub ledger_entry_id: Option<LedgerEntryId>,
}

/// A template found due inside a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueExpense {
    /// Template due.
    pub template_id: ExpenseTemplateId,
    /// Template name.
    pub name: String,
    /// Amount to charge.
    pub amount: Decimal,
    /// Earliest qualifying due date in the period.
    pub due_on: NaiveDate,
}

/// Result of recording an execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Execution and its ledger entry were written.
    Recorded(FixedExpenseExecution),
    /// The (template, period) pair was already charged; nothing written.
    AlreadyRecorded,
}

impl ExecutionOutcome {
    /// True when this call wrote the execution.
    #[must_use]
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded(_))
    }
}
