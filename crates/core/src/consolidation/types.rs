//! Consolidation run results.

use lendfund_shared::types::ExpenseTemplateId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::expense::FixedExpenseExecution;
use crate::ledger::LedgerEntry;
use crate::period::ConsolidationPeriod;

/// A fixed expense that could not be registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseFailure {
    /// Template that failed.
    pub template_id: ExpenseTemplateId,
    /// Error message.
    pub error: String,
}

/// What happened to each due fixed expense.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRunReport {
    /// Executions written by this run.
    pub registered: Vec<FixedExpenseExecution>,
    /// Templates already charged in the period.
    pub already_recorded: Vec<ExpenseTemplateId>,
    /// Templates whose registration failed.
    pub failed: Vec<ExpenseFailure>,
}

/// Result of a consolidation cycle on a cut day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleOutcome {
    /// Period opened (or found already open) for the cut day.
    pub period: ConsolidationPeriod,
    /// False when the period already existed from an earlier run.
    pub created: bool,
    /// Capital carried from the previous period.
    pub carried_forward: Decimal,
    /// Carry-over entry written by this run.
    pub carry_entry: Option<LedgerEntry>,
    /// Fixed expense registration results.
    pub expenses: ExpenseRunReport,
}
