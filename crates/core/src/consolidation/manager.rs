//! Consolidation cycle.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use lendfund_shared::types::{ExpenseExecutionId, PeriodId};
use rust_decimal::Decimal;

use super::types::{CycleOutcome, ExpenseFailure, ExpenseRunReport};
use crate::clock::Clock;
use crate::error::LendingError;
use crate::expense::{DueExpense, ExecutionOutcome, FixedExpenseExecution, FixedExpenseScheduler};
use crate::ledger::{EntryKind, LedgerEntry, LedgerRegistrar, NewLedgerEntry, status};
use crate::period::{ConsolidationPeriod, NewPeriod, PeriodBoundaryResolver, PeriodBounds};
use crate::store::LendingStore;

const CARRY_OVER_DESCRIPTION: &str = "Capital carried forward from previous period";

/// Opens periods on cut days and books their opening movements.
pub struct PeriodConsolidationManager<S: ?Sized, C> {
    registrar: LedgerRegistrar<S, C>,
    resolver: PeriodBoundaryResolver,
}

impl<S, C> PeriodConsolidationManager<S, C>
where
    S: LendingStore + ?Sized,
    C: Clock,
{
    /// Creates a manager.
    pub fn new(store: Arc<S>, clock: C, resolver: PeriodBoundaryResolver) -> Self {
        Self {
            registrar: LedgerRegistrar::new(store, clock),
            resolver,
        }
    }

    /// The manager's clock.
    pub fn clock(&self) -> &C {
        self.registrar.clock()
    }

    /// The manager's boundary resolver.
    pub fn resolver(&self) -> &PeriodBoundaryResolver {
        &self.resolver
    }

    /// Runs one consolidation cycle as of `now`.
    ///
    /// Returns `None` when the local date of `now` is not a cut day. On a cut
    /// day the period starting that day is opened, or reused if an earlier
    /// run already opened it, and due fixed expenses are charged. Once the
    /// period exists, failures are logged and never undo it.
    ///
    /// # Errors
    ///
    /// - [`LendingError::PeriodOverlap`] when another period covers the cut day
    /// - store failures before the period is created
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> Result<Option<CycleOutcome>, LendingError> {
        let Some(bounds) = self.resolver.resolve_at(now)? else {
            tracing::debug!(%now, "not a cut day, skipping consolidation");
            return Ok(None);
        };
        tracing::info!(start = %bounds.start, end = %bounds.end, "consolidation cycle started");

        let store = self.registrar.store();
        let (period, created) = match store.find_period_containing(bounds.start).await? {
            Some(existing) if existing.start_at == bounds.start => {
                tracing::info!(period_id = %existing.id, "period already open, resuming cycle");
                (existing, false)
            }
            Some(existing) => {
                return Err(LendingError::PeriodOverlap {
                    start: bounds.start,
                    existing: existing.id,
                });
            }
            None => (self.open_period(&bounds, now).await?, true),
        };

        let carried_forward = period.opening_capital;
        let carry_entry = if created && !carried_forward.is_zero() {
            self.register_carry_over(&period, now).await
        } else {
            None
        };

        let expenses = match self
            .register_fixed_expenses(&period, bounds.local_start, bounds.local_end, now)
            .await
        {
            Ok(report) => report,
            Err(err) => {
                tracing::error!(period_id = %period.id, error = %err, "fixed expense scheduling failed");
                ExpenseRunReport::default()
            }
        };

        tracing::info!(
            period_id = %period.id,
            created,
            carried_forward = %carried_forward,
            registered = expenses.registered.len(),
            already_recorded = expenses.already_recorded.len(),
            failed = expenses.failed.len(),
            "consolidation cycle finished"
        );

        Ok(Some(CycleOutcome {
            period,
            created,
            carried_forward,
            carry_entry,
            expenses,
        }))
    }

    /// Charges every fixed expense due in `[start, end]` to `period`.
    ///
    /// Templates already executed in the period are skipped, so calling this
    /// again for the same period charges nothing twice. A malformed or failed
    /// template is logged and reported; the others still go through.
    ///
    /// # Errors
    ///
    /// Returns a store error when the template catalog cannot be read.
    pub async fn register_fixed_expenses(
        &self,
        period: &ConsolidationPeriod,
        start: NaiveDate,
        end: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<ExpenseRunReport, LendingError> {
        let templates = self
            .registrar
            .store()
            .list_active_fixed_expense_templates()
            .await?;

        let mut report = ExpenseRunReport::default();
        let mut valid = Vec::with_capacity(templates.len());
        for template in templates {
            match template.validate().map_err(LendingError::from) {
                Ok(()) => valid.push(template),
                Err(err) => {
                    tracing::error!(
                        period_id = %period.id,
                        template_id = %template.id,
                        code = err.error_code(),
                        error = %err,
                        "fixed expense template is invalid"
                    );
                    report.failed.push(ExpenseFailure {
                        template_id: template.id,
                        error: err.to_string(),
                    });
                }
            }
        }
        let due = FixedExpenseScheduler::due_expenses(&valid, start, end);

        for item in due {
            match self.register_expense(period.id, &item, now).await {
                Ok(ExecutionOutcome::Recorded(execution)) => {
                    tracing::info!(
                        period_id = %period.id,
                        template_id = %item.template_id,
                        amount = %item.amount,
                        due_on = %item.due_on,
                        "fixed expense registered"
                    );
                    report.registered.push(execution);
                }
                Ok(ExecutionOutcome::AlreadyRecorded) => {
                    tracing::debug!(
                        period_id = %period.id,
                        template_id = %item.template_id,
                        "fixed expense already charged in period"
                    );
                    report.already_recorded.push(item.template_id);
                }
                Err(err) => {
                    tracing::error!(
                        period_id = %period.id,
                        template_id = %item.template_id,
                        error = %err,
                        "fixed expense registration failed"
                    );
                    report.failed.push(ExpenseFailure {
                        template_id: item.template_id,
                        error: err.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }

    async fn open_period(
        &self,
        bounds: &PeriodBounds,
        now: DateTime<Utc>,
    ) -> Result<ConsolidationPeriod, LendingError> {
        let store = self.registrar.store();
        let carried_forward = store
            .find_latest_closed_period(bounds.start)
            .await?
            .map_or(Decimal::ZERO, |previous| previous.carried_forward());

        let new_period = NewPeriod::opening(bounds, carried_forward, now);
        new_period.validate()?;
        let period = new_period.into_period(PeriodId::new());
        store.create_period(&period).await?;

        tracing::info!(
            period_id = %period.id,
            start = %period.start_at,
            end = %period.end_at,
            opening_capital = %period.opening_capital,
            "consolidation period opened"
        );
        Ok(period)
    }

    /// Books the carried capital in the new period. A negative carry is an
    /// expense of its absolute value.
    async fn register_carry_over(
        &self,
        period: &ConsolidationPeriod,
        now: DateTime<Utc>,
    ) -> Option<LedgerEntry> {
        let amount = period.opening_capital;
        let kind = if amount.is_sign_negative() {
            EntryKind::Expense
        } else {
            EntryKind::Income
        };
        let entry = NewLedgerEntry::new(kind, status::DEPOSITED, CARRY_OVER_DESCRIPTION, amount.abs())
            .in_period(period.id)
            .at(now);

        match self.registrar.register(entry).await {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::error!(period_id = %period.id, error = %err, "carry-over registration failed");
                None
            }
        }
    }

    async fn register_expense(
        &self,
        period_id: PeriodId,
        item: &DueExpense,
        now: DateTime<Utc>,
    ) -> Result<ExecutionOutcome, LendingError> {
        let store = self.registrar.store();
        if store.find_execution(item.template_id, period_id).await?.is_some() {
            return Ok(ExecutionOutcome::AlreadyRecorded);
        }

        let entry = self
            .registrar
            .resolve(
                NewLedgerEntry::new(
                    EntryKind::Expense,
                    status::PENDING,
                    format!("Fixed expense: {}", item.name),
                    item.amount,
                )
                .in_period(period_id)
                .at(now),
            )
            .await?;
        let execution = FixedExpenseExecution {
            id: ExpenseExecutionId::new(),
            template_id: item.template_id,
            period_id,
            amount_paid: entry.amount,
            executed_at: entry.recorded_at,
            ledger_entry_id: Some(entry.id),
        };

        Ok(store.record_fixed_expense(&execution, &entry).await?)
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
