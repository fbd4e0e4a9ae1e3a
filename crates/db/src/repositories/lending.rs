//! `SeaORM` implementation of the lending store.
//!
//! Multi-record writes run inside one database transaction. The schema
//! holds one payment per installment and one execution per
//! (template, period); period overlap is checked inside the insert transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lendfund_core::expense::{ExecutionOutcome, FixedExpenseExecution, FixedExpenseTemplate};
use lendfund_core::ledger::LedgerEntry;
use lendfund_core::loan::{Loan, Payment};
use lendfund_core::period::ConsolidationPeriod;
use lendfund_core::store::{LendingStore, StoreError};
use lendfund_shared::types::{ExpenseTemplateId, LoanId, PeriodId};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use tracing::debug;

use super::mapping::{
    entry_active_model, entry_from_model, execution_active_model, execution_from_model,
    loan_active_model, loan_from_model, payment_active_model, payment_from_model,
    period_active_model, period_from_model, store_err, template_active_model,
    template_from_model,
};
use crate::entities::{
    consolidation_periods, fixed_expense_executions, fixed_expense_templates, ledger_entries,
    loans, payments,
};

/// Lending store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct SeaOrmLendingStore {
    db: DatabaseConnection,
}

impl SeaOrmLendingStore {
    /// Creates a new store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a fixed expense template, or replaces the one with the same id.
    pub async fn upsert_template(&self, template: &FixedExpenseTemplate) -> Result<(), StoreError> {
        use fixed_expense_templates::Column;

        fixed_expense_templates::Entity::insert(template_active_model(template)?)
            .on_conflict(
                OnConflict::column(Column::Id)
                    .update_columns([
                        Column::Name,
                        Column::Amount,
                        Column::Frequency,
                        Column::DayOne,
                        Column::DayTwo,
                        Column::Active,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn overlapping_period<C: sea_orm::ConnectionTrait>(
        conn: &C,
        period: &ConsolidationPeriod,
    ) -> Result<Option<consolidation_periods::Model>, DbErr> {
        consolidation_periods::Entity::find()
            .filter(consolidation_periods::Column::StartAt.lte(period.end_at))
            .filter(consolidation_periods::Column::EndAt.gte(period.start_at))
            .one(conn)
            .await
    }
}

#[async_trait]
impl LendingStore for SeaOrmLendingStore {
    async fn find_loan(&self, id: LoanId) -> Result<Option<Loan>, StoreError> {
        loans::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?
            .map(loan_from_model)
            .transpose()
    }

    async fn create_loan(&self, loan: &Loan, disbursement: &LedgerEntry) -> Result<(), StoreError> {
        let txn = self.db.begin().await.map_err(store_err)?;

        loan_active_model(loan)?.insert(&txn).await.map_err(store_err)?;
        entry_active_model(disbursement)
            .insert(&txn)
            .await
            .map_err(store_err)?;

        txn.commit().await.map_err(store_err)?;
        debug!(loan_id = %loan.id, entry_id = %disbursement.id, "Loan persisted");
        Ok(())
    }

    async fn apply_payment(
        &self,
        loan: &Loan,
        payment: &Payment,
        entry: &LedgerEntry,
    ) -> Result<(), StoreError> {
        let txn = self.db.begin().await.map_err(store_err)?;

        loan_active_model(loan)?
            .update(&txn)
            .await
            .map_err(|err| match err {
                DbErr::RecordNotUpdated => StoreError::MissingReference(format!("loan {}", loan.id)),
                other => store_err(other),
            })?;
        payment_active_model(payment)?
            .insert(&txn)
            .await
            .map_err(store_err)?;
        entry_active_model(entry).insert(&txn).await.map_err(store_err)?;

        txn.commit().await.map_err(store_err)?;
        Ok(())
    }

    async fn list_payments(&self, loan_id: LoanId) -> Result<Vec<Payment>, StoreError> {
        payments::Entity::find()
            .filter(payments::Column::LoanId.eq(loan_id.into_inner()))
            .order_by_asc(payments::Column::InstallmentNumber)
            .all(&self.db)
            .await
            .map_err(store_err)?
            .into_iter()
            .map(payment_from_model)
            .collect()
    }

    async fn delete_loan(&self, id: LoanId) -> Result<bool, StoreError> {
        // Payments and loan-linked entries go with the loan via ON DELETE CASCADE.
        let result = loans::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn create_ledger_entry(&self, entry: &LedgerEntry) -> Result<(), StoreError> {
        entry_active_model(entry)
            .insert(&self.db)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn list_period_entries(&self, period_id: PeriodId) -> Result<Vec<LedgerEntry>, StoreError> {
        ledger_entries::Entity::find()
            .filter(ledger_entries::Column::PeriodId.eq(period_id.into_inner()))
            .order_by_asc(ledger_entries::Column::RecordedAt)
            .all(&self.db)
            .await
            .map_err(store_err)?
            .into_iter()
            .map(entry_from_model)
            .collect()
    }

    async fn find_period(&self, id: PeriodId) -> Result<Option<ConsolidationPeriod>, StoreError> {
        Ok(consolidation_periods::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?
            .map(period_from_model))
    }

    async fn find_period_containing(
        &self,
        at: DateTime<Utc>,
    ) -> Result<Option<ConsolidationPeriod>, StoreError> {
        Ok(consolidation_periods::Entity::find()
            .filter(consolidation_periods::Column::StartAt.lte(at))
            .filter(consolidation_periods::Column::EndAt.gte(at))
            .one(&self.db)
            .await
            .map_err(store_err)?
            .map(period_from_model))
    }

    async fn find_latest_closed_period(
        &self,
        before: DateTime<Utc>,
    ) -> Result<Option<ConsolidationPeriod>, StoreError> {
        Ok(consolidation_periods::Entity::find()
            .filter(consolidation_periods::Column::EndAt.lt(before))
            .order_by_desc(consolidation_periods::Column::EndAt)
            .one(&self.db)
            .await
            .map_err(store_err)?
            .map(period_from_model))
    }

    async fn create_period(&self, period: &ConsolidationPeriod) -> Result<(), StoreError> {
        let txn = self.db.begin().await.map_err(store_err)?;

        if let Some(existing) = Self::overlapping_period(&txn, period)
            .await
            .map_err(store_err)?
        {
            return Err(StoreError::Conflict(format!(
                "period overlaps {} [{}, {}]",
                existing.id, existing.start_at, existing.end_at
            )));
        }
        period_active_model(period)
            .insert(&txn)
            .await
            .map_err(store_err)?;

        txn.commit().await.map_err(store_err)?;
        Ok(())
    }

    async fn list_active_fixed_expense_templates(&self) -> Result<Vec<FixedExpenseTemplate>, StoreError> {
        fixed_expense_templates::Entity::find()
            .filter(fixed_expense_templates::Column::Active.eq(true))
            .order_by_asc(fixed_expense_templates::Column::Name)
            .all(&self.db)
            .await
            .map_err(store_err)?
            .into_iter()
            .map(template_from_model)
            .collect()
    }

    async fn find_execution(
        &self,
        template_id: ExpenseTemplateId,
        period_id: PeriodId,
    ) -> Result<Option<FixedExpenseExecution>, StoreError> {
        Ok(fixed_expense_executions::Entity::find()
            .filter(fixed_expense_executions::Column::TemplateId.eq(template_id.into_inner()))
            .filter(fixed_expense_executions::Column::PeriodId.eq(period_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(store_err)?
            .map(execution_from_model))
    }

    async fn record_fixed_expense(
        &self,
        execution: &FixedExpenseExecution,
        entry: &LedgerEntry,
    ) -> Result<ExecutionOutcome, StoreError> {
        use fixed_expense_executions::Column;

        let txn = self.db.begin().await.map_err(store_err)?;

        let existing = fixed_expense_executions::Entity::find()
            .filter(Column::TemplateId.eq(execution.template_id.into_inner()))
            .filter(Column::PeriodId.eq(execution.period_id.into_inner()))
            .one(&txn)
            .await
            .map_err(store_err)?;
        if existing.is_some() {
            return Ok(ExecutionOutcome::AlreadyRecorded);
        }

        entry_active_model(entry).insert(&txn).await.map_err(store_err)?;

        // A concurrent run may have claimed the pair since the lookup; dropping
        // the transaction rolls the entry back.
        let inserted = fixed_expense_executions::Entity::insert(execution_active_model(execution))
            .on_conflict(
                OnConflict::columns([Column::TemplateId, Column::PeriodId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&txn)
            .await;
        match inserted {
            Ok(_) => {}
            Err(DbErr::RecordNotInserted) => return Ok(ExecutionOutcome::AlreadyRecorded),
            Err(err) => return Err(store_err(err)),
        }

        txn.commit().await.map_err(store_err)?;
        Ok(ExecutionOutcome::Recorded(execution.clone()))
    }
}
