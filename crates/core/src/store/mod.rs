//! Persistence port.
//!
//! The engine reads and writes through [`LendingStore`]. Multi-record writes
//! (`create_loan`, `apply_payment`, `record_fixed_expense`) are single
//! methods so an implementation can make each one atomic.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lendfund_shared::types::{ExpenseTemplateId, LoanId, PeriodId};
use thiserror::Error;

use crate::expense::{ExecutionOutcome, FixedExpenseExecution, FixedExpenseTemplate};
use crate::ledger::LedgerEntry;
use crate::loan::{Loan, Payment};
use crate::period::ConsolidationPeriod;

pub use memory::InMemoryStore;

/// Failures reported by a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend failure.
    #[error("Database error: {0}")]
    Database(String),

    /// A uniqueness or overlap rule rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A write referenced a record that does not exist.
    #[error("Missing reference: {0}")]
    MissingReference(String),
}

/// Storage operations the lending engine depends on.
#[async_trait]
pub trait LendingStore: Send + Sync {
    /// Loads a loan.
    async fn find_loan(&self, id: LoanId) -> Result<Option<Loan>, StoreError>;

    /// Inserts a loan together with its disbursement entry.
    async fn create_loan(&self, loan: &Loan, disbursement: &LedgerEntry) -> Result<(), StoreError>;

    /// Updates the loan, inserts the payment and its ledger entry, all or nothing.
    async fn apply_payment(
        &self,
        loan: &Loan,
        payment: &Payment,
        entry: &LedgerEntry,
    ) -> Result<(), StoreError>;

    /// Payments of a loan, by installment number.
    async fn list_payments(&self, loan_id: LoanId) -> Result<Vec<Payment>, StoreError>;

    /// Deletes a loan with its payments and loan-linked entries.
    /// Returns false when the loan does not exist.
    async fn delete_loan(&self, id: LoanId) -> Result<bool, StoreError>;

    /// Inserts a ledger entry.
    async fn create_ledger_entry(&self, entry: &LedgerEntry) -> Result<(), StoreError>;

    /// Entries of a period, oldest first.
    async fn list_period_entries(&self, period_id: PeriodId) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Loads a period.
    async fn find_period(&self, id: PeriodId) -> Result<Option<ConsolidationPeriod>, StoreError>;

    /// The period whose `[start_at, end_at]` contains `at`.
    async fn find_period_containing(
        &self,
        at: DateTime<Utc>,
    ) -> Result<Option<ConsolidationPeriod>, StoreError>;

    /// The period with the latest `end_at` strictly before `before`.
    async fn find_latest_closed_period(
        &self,
        before: DateTime<Utc>,
    ) -> Result<Option<ConsolidationPeriod>, StoreError>;

    /// Inserts a period. Overlapping an existing period is a conflict.
    async fn create_period(&self, period: &ConsolidationPeriod) -> Result<(), StoreError>;

    /// Templates with the active flag set.
    async fn list_active_fixed_expense_templates(&self) -> Result<Vec<FixedExpenseTemplate>, StoreError>;

    /// The execution of a template in a period, if any.
    async fn find_execution(
        &self,
        template_id: ExpenseTemplateId,
        period_id: PeriodId,
    ) -> Result<Option<FixedExpenseExecution>, StoreError>;

    /// Inserts an execution and its expense entry, all or nothing. A second
    /// execution for the same (template, period) writes nothing and reports
    /// [`ExecutionOutcome::AlreadyRecorded`].
    async fn record_fixed_expense(
        &self,
        execution: &FixedExpenseExecution,
        entry: &LedgerEntry,
    ) -> Result<ExecutionOutcome, StoreError>;
}
