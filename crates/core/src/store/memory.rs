//! In-memory [`LendingStore`].
//!
//! Every method takes one lock for its whole body, so multi-record writes are
//! atomic. Used by tests and dry runs.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lendfund_shared::types::{ExpenseTemplateId, LoanId, PeriodId};

use super::{LendingStore, StoreError};
use crate::expense::{ExecutionOutcome, FixedExpenseExecution, FixedExpenseTemplate};
use crate::ledger::LedgerEntry;
use crate::loan::{Loan, Payment};
use crate::period::ConsolidationPeriod;

#[derive(Debug, Default)]
struct State {
    loans: BTreeMap<LoanId, Loan>,
    payments: Vec<Payment>,
    entries: Vec<LedgerEntry>,
    periods: BTreeMap<PeriodId, ConsolidationPeriod>,
    templates: BTreeMap<ExpenseTemplateId, FixedExpenseTemplate>,
    executions: Vec<FixedExpenseExecution>,
}

impl State {
    fn require_period(&self, id: PeriodId) -> Result<(), StoreError> {
        if self.periods.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference(format!("period {id}")))
        }
    }
}

/// Store that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Database("in-memory store lock poisoned".to_string()))
    }

    /// Adds or replaces a fixed expense template.
    pub fn upsert_template(&self, template: FixedExpenseTemplate) -> Result<(), StoreError> {
        self.lock()?.templates.insert(template.id, template);
        Ok(())
    }

    /// All periods, by start.
    pub fn periods(&self) -> Result<Vec<ConsolidationPeriod>, StoreError> {
        let mut periods: Vec<_> = self.lock()?.periods.values().cloned().collect();
        periods.sort_by_key(|p| p.start_at);
        Ok(periods)
    }

    /// All executions, in insertion order.
    pub fn executions(&self) -> Result<Vec<FixedExpenseExecution>, StoreError> {
        Ok(self.lock()?.executions.clone())
    }

    /// All ledger entries, in insertion order.
    pub fn entries(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        Ok(self.lock()?.entries.clone())
    }
}

#[async_trait]
impl LendingStore for InMemoryStore {
    async fn find_loan(&self, id: LoanId) -> Result<Option<Loan>, StoreError> {
        Ok(self.lock()?.loans.get(&id).cloned())
    }

    async fn create_loan(&self, loan: &Loan, disbursement: &LedgerEntry) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if state.loans.contains_key(&loan.id) {
            return Err(StoreError::Conflict(format!("loan {} already exists", loan.id)));
        }
        state.require_period(disbursement.period_id)?;

        state.loans.insert(loan.id, loan.clone());
        state.entries.push(disbursement.clone());
        Ok(())
    }

    async fn apply_payment(
        &self,
        loan: &Loan,
        payment: &Payment,
        entry: &LedgerEntry,
    ) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if !state.loans.contains_key(&loan.id) {
            return Err(StoreError::MissingReference(format!("loan {}", loan.id)));
        }
        state.require_period(entry.period_id)?;
        if state
            .payments
            .iter()
            .any(|p| p.loan_id == payment.loan_id && p.installment_number == payment.installment_number)
        {
            return Err(StoreError::Conflict(format!(
                "installment {} of loan {} already paid",
                payment.installment_number, payment.loan_id
            )));
        }

        state.loans.insert(loan.id, loan.clone());
        state.payments.push(payment.clone());
        state.entries.push(entry.clone());
        Ok(())
    }

    async fn list_payments(&self, loan_id: LoanId) -> Result<Vec<Payment>, StoreError> {
        let mut payments: Vec<_> = self
            .lock()?
            .payments
            .iter()
            .filter(|p| p.loan_id == loan_id)
            .cloned()
            .collect();
        payments.sort_by_key(|p| p.installment_number);
        Ok(payments)
    }

    async fn delete_loan(&self, id: LoanId) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        if state.loans.remove(&id).is_none() {
            return Ok(false);
        }
        state.payments.retain(|p| p.loan_id != id);
        state.entries.retain(|e| e.loan_id != Some(id));
        Ok(true)
    }

    async fn create_ledger_entry(&self, entry: &LedgerEntry) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state.require_period(entry.period_id)?;
        if let Some(loan_id) = entry.loan_id
            && !state.loans.contains_key(&loan_id)
        {
            return Err(StoreError::MissingReference(format!("loan {loan_id}")));
        }
        state.entries.push(entry.clone());
        Ok(())
    }

    async fn list_period_entries(&self, period_id: PeriodId) -> Result<Vec<LedgerEntry>, StoreError> {
        let mut entries: Vec<_> = self
            .lock()?
            .entries
            .iter()
            .filter(|e| e.period_id == period_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.recorded_at);
        Ok(entries)
    }

    async fn find_period(&self, id: PeriodId) -> Result<Option<ConsolidationPeriod>, StoreError> {
        Ok(self.lock()?.periods.get(&id).cloned())
    }

    async fn find_period_containing(
        &self,
        at: DateTime<Utc>,
    ) -> Result<Option<ConsolidationPeriod>, StoreError> {
        Ok(self.lock()?.periods.values().find(|p| p.contains(at)).cloned())
    }

    async fn find_latest_closed_period(
        &self,
        before: DateTime<Utc>,
    ) -> Result<Option<ConsolidationPeriod>, StoreError> {
        Ok(self
            .lock()?
            .periods
            .values()
            .filter(|p| p.end_at < before)
            .max_by_key(|p| p.end_at)
            .cloned())
    }

    async fn create_period(&self, period: &ConsolidationPeriod) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if let Some(existing) = state
            .periods
            .values()
            .find(|p| p.start_at <= period.end_at && period.start_at <= p.end_at)
        {
            return Err(StoreError::Conflict(format!(
                "period overlaps {} [{}, {}]",
                existing.id, existing.start_at, existing.end_at
            )));
        }
        state.periods.insert(period.id, period.clone());
        Ok(())
    }

    async fn list_active_fixed_expense_templates(&self) -> Result<Vec<FixedExpenseTemplate>, StoreError> {
        Ok(self
            .lock()?
            .templates
            .values()
            .filter(|t| t.active)
            .cloned()
            .collect())
    }

    async fn find_execution(
        &self,
        template_id: ExpenseTemplateId,
        period_id: PeriodId,
    ) -> Result<Option<FixedExpenseExecution>, StoreError> {
        Ok(self
            .lock()?
            .executions
            .iter()
            .find(|e| e.template_id == template_id && e.period_id == period_id)
            .cloned())
    }

    async fn record_fixed_expense(
        &self,
        execution: &FixedExpenseExecution,
        entry: &LedgerEntry,
    ) -> Result<ExecutionOutcome, StoreError> {
        let mut state = self.lock()?;
        if state
            .executions
            .iter()
            .any(|e| e.template_id == execution.template_id && e.period_id == execution.period_id)
        {
            return Ok(ExecutionOutcome::AlreadyRecorded);
        }
        if !state.templates.contains_key(&execution.template_id) {
            return Err(StoreError::MissingReference(format!(
                "fixed expense template {}",
                execution.template_id
            )));
        }
        state.require_period(execution.period_id)?;

        state.entries.push(entry.clone());
        state.executions.push(execution.clone());
        Ok(ExecutionOutcome::Recorded(execution.clone()))
    }
}
