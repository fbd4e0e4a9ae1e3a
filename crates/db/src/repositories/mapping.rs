//! Conversions between `SeaORM` models and lending domain types.
//!
//! Rows are written from already-validated domain values, so decoding only
//! fails on data that bypassed the engine (unknown enum text, negative counts).

use chrono::Utc;
use lendfund_core::amortization::CalculationMethod;
use lendfund_core::expense::{ExpenseFrequency, FixedExpenseExecution, FixedExpenseTemplate};
use lendfund_core::ledger::{EntryKind, LedgerEntry};
use lendfund_core::loan::{Loan, LoanState, Payment};
use lendfund_core::period::ConsolidationPeriod;
use lendfund_core::store::StoreError;
use lendfund_shared::types::{
    ExpenseExecutionId, ExpenseTemplateId, LedgerEntryId, LoanId, PaymentId, PeriodId,
};
use sea_orm::{DbErr, Set, SqlErr};

use crate::entities::{
    consolidation_periods, fixed_expense_executions, fixed_expense_templates, ledger_entries,
    loans, payments,
};

/// Maps a `SeaORM` error onto the store's error vocabulary.
pub fn store_err(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::Conflict(detail),
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => StoreError::MissingReference(detail),
        _ => StoreError::Database(err.to_string()),
    }
}

fn corrupt(table: &str, detail: impl std::fmt::Display) -> StoreError {
    StoreError::Database(format!("corrupt {table} row: {detail}"))
}

fn to_count(table: &str, value: u32) -> Result<i32, StoreError> {
    i32::try_from(value).map_err(|_| corrupt(table, format!("count {value} out of range")))
}

fn from_count(table: &str, value: i32) -> Result<u32, StoreError> {
    u32::try_from(value).map_err(|_| corrupt(table, format!("negative count {value}")))
}

// Loans

pub fn loan_active_model(loan: &Loan) -> Result<loans::ActiveModel, StoreError> {
    Ok(loans::ActiveModel {
        id: Set(loan.id.into_inner()),
        borrower: Set(loan.borrower.clone()),
        principal: Set(loan.principal),
        method: Set(loan.method.as_str().to_string()),
        rate_percent: Set(loan.rate_percent),
        installment_count: Set(to_count("loans", loan.installment_count)?),
        installments_remaining: Set(to_count("loans", loan.installments_remaining)?),
        remaining_principal: Set(loan.remaining_principal),
        state: Set(loan.state.as_str().to_string()),
        issued_at: Set(loan.issued_at.into()),
        last_payment_at: Set(loan.last_payment_at.map(Into::into)),
    })
}

pub fn loan_from_model(model: loans::Model) -> Result<Loan, StoreError> {
    let method: CalculationMethod = model.method.parse().map_err(|e| corrupt("loans", e))?;
    let state: LoanState = model.state.parse().map_err(|e: String| corrupt("loans", e))?;

    Ok(Loan {
        id: LoanId::from_uuid(model.id),
        borrower: model.borrower,
        principal: model.principal,
        method,
        rate_percent: model.rate_percent,
        installment_count: from_count("loans", model.installment_count)?,
        installments_remaining: from_count("loans", model.installments_remaining)?,
        remaining_principal: model.remaining_principal,
        state,
        issued_at: model.issued_at.with_timezone(&Utc),
        last_payment_at: model.last_payment_at.map(|at| at.with_timezone(&Utc)),
    })
}

// Payments

pub fn payment_active_model(payment: &Payment) -> Result<payments::ActiveModel, StoreError> {
    Ok(payments::ActiveModel {
        id: Set(payment.id.into_inner()),
        loan_id: Set(payment.loan_id.into_inner()),
        paid_at: Set(payment.paid_at.into()),
        payment_type: Set(payment.payment_type.clone()),
        installment_number: Set(to_count("payments", payment.installment_number)?),
        amount: Set(payment.amount),
        interest_paid: Set(payment.interest_paid),
        capital_paid: Set(payment.capital_paid),
        installments_remaining: Set(to_count("payments", payment.installments_remaining)?),
        notes: Set(payment.notes.clone()),
    })
}

pub fn payment_from_model(model: payments::Model) -> Result<Payment, StoreError> {
    Ok(Payment {
        id: PaymentId::from_uuid(model.id),
        loan_id: LoanId::from_uuid(model.loan_id),
        paid_at: model.paid_at.with_timezone(&Utc),
        payment_type: model.payment_type,
        installment_number: from_count("payments", model.installment_number)?,
        amount: model.amount,
        interest_paid: model.interest_paid,
        capital_paid: model.capital_paid,
        installments_remaining: from_count("payments", model.installments_remaining)?,
        notes: model.notes,
    })
}

// Ledger entries

pub fn entry_active_model(entry: &LedgerEntry) -> ledger_entries::ActiveModel {
    ledger_entries::ActiveModel {
        id: Set(entry.id.into_inner()),
        period_id: Set(entry.period_id.into_inner()),
        recorded_at: Set(entry.recorded_at.into()),
        kind: Set(entry.kind.as_str().to_string()),
        status: Set(entry.status.clone()),
        description: Set(entry.description.clone()),
        amount: Set(entry.amount),
        loan_id: Set(entry.loan_id.map(LoanId::into_inner)),
    }
}

pub fn entry_from_model(model: ledger_entries::Model) -> Result<LedgerEntry, StoreError> {
    let kind: EntryKind = model
        .kind
        .parse()
        .map_err(|e: String| corrupt("ledger_entries", e))?;

    Ok(LedgerEntry {
        id: LedgerEntryId::from_uuid(model.id),
        period_id: PeriodId::from_uuid(model.period_id),
        recorded_at: model.recorded_at.with_timezone(&Utc),
        kind,
        status: model.status,
        description: model.description,
        amount: model.amount,
        loan_id: model.loan_id.map(LoanId::from_uuid),
    })
}

// Periods

pub fn period_active_model(period: &ConsolidationPeriod) -> consolidation_periods::ActiveModel {
    consolidation_periods::ActiveModel {
        id: Set(period.id.into_inner()),
        start_at: Set(period.start_at.into()),
        end_at: Set(period.end_at.into()),
        opening_capital: Set(period.opening_capital),
        closing_capital: Set(period.closing_capital),
        generated_at: Set(period.generated_at.into()),
        notes: Set(period.notes.clone()),
    }
}

pub fn period_from_model(model: consolidation_periods::Model) -> ConsolidationPeriod {
    ConsolidationPeriod {
        id: PeriodId::from_uuid(model.id),
        start_at: model.start_at.with_timezone(&Utc),
        end_at: model.end_at.with_timezone(&Utc),
        opening_capital: model.opening_capital,
        closing_capital: model.closing_capital,
        generated_at: model.generated_at.with_timezone(&Utc),
        notes: model.notes,
    }
}

// Fixed expenses

pub fn template_active_model(
    template: &FixedExpenseTemplate,
) -> Result<fixed_expense_templates::ActiveModel, StoreError> {
    let table = "fixed_expense_templates";
    Ok(fixed_expense_templates::ActiveModel {
        id: Set(template.id.into_inner()),
        name: Set(template.name.clone()),
        amount: Set(template.amount),
        frequency: Set(template.frequency.as_str().to_string()),
        day_one: Set(to_count(table, template.day_one)?),
        day_two: Set(template.day_two.map(|d| to_count(table, d)).transpose()?),
        active: Set(template.active),
    })
}

pub fn template_from_model(
    model: fixed_expense_templates::Model,
) -> Result<FixedExpenseTemplate, StoreError> {
    let table = "fixed_expense_templates";
    let frequency: ExpenseFrequency = model.frequency.parse().map_err(|e| corrupt(table, e))?;

    Ok(FixedExpenseTemplate {
        id: ExpenseTemplateId::from_uuid(model.id),
        name: model.name,
        amount: model.amount,
        frequency,
        day_one: from_count(table, model.day_one)?,
        day_two: model.day_two.map(|d| from_count(table, d)).transpose()?,
        active: model.active,
    })
}

pub fn execution_active_model(
    execution: &FixedExpenseExecution,
) -> fixed_expense_executions::ActiveModel {
    fixed_expense_executions::ActiveModel {
        id: Set(execution.id.into_inner()),
        template_id: Set(execution.template_id.into_inner()),
        period_id: Set(execution.period_id.into_inner()),
        amount_paid: Set(execution.amount_paid),
        executed_at: Set(execution.executed_at.into()),
        ledger_entry_id: Set(execution.ledger_entry_id.map(LedgerEntryId::into_inner)),
    }
}

pub fn execution_from_model(model: fixed_expense_executions::Model) -> FixedExpenseExecution {
    FixedExpenseExecution {
        id: ExpenseExecutionId::from_uuid(model.id),
        template_id: ExpenseTemplateId::from_uuid(model.template_id),
        period_id: PeriodId::from_uuid(model.period_id),
        amount_paid: model.amount_paid,
        executed_at: model.executed_at.with_timezone(&Utc),
        ledger_entry_id: model.ledger_entry_id.map(LedgerEntryId::from_uuid),
    }
}

#[cfg(test)]
#[path = "mapping_tests.rs"]
mod tests;
