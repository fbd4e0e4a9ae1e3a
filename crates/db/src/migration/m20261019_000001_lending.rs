//! Lending schema.
//!
//! Creates loans, payments, consolidation periods, ledger entries and the
//! fixed expense tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(LENDING_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const LENDING_SQL: &str = r"
CREATE TABLE loans (
    id UUID PRIMARY KEY,
    borrower TEXT NOT NULL,
    principal NUMERIC(19, 4) NOT NULL,
    method VARCHAR(16) NOT NULL,
    rate_percent NUMERIC(9, 4) NOT NULL,
    installment_count INTEGER NOT NULL,
    installments_remaining INTEGER NOT NULL,
    remaining_principal NUMERIC(19, 4) NOT NULL,
    state VARCHAR(16) NOT NULL,
    issued_at TIMESTAMPTZ NOT NULL,
    last_payment_at TIMESTAMPTZ,
    CONSTRAINT chk_loans_method CHECK (method IN ('flat', 'declining')),
    CONSTRAINT chk_loans_state CHECK (state IN ('active', 'completed')),
    CONSTRAINT chk_loans_principal CHECK (principal > 0),
    CONSTRAINT chk_loans_installments CHECK (
        installment_count > 0 AND installments_remaining BETWEEN 0 AND installment_count
    )
);

CREATE TABLE payments (
    id UUID PRIMARY KEY,
    loan_id UUID NOT NULL REFERENCES loans(id) ON DELETE CASCADE,
    paid_at TIMESTAMPTZ NOT NULL,
    payment_type VARCHAR(64) NOT NULL,
    installment_number INTEGER NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    interest_paid NUMERIC(19, 4) NOT NULL,
    capital_paid NUMERIC(19, 4) NOT NULL,
    installments_remaining INTEGER NOT NULL,
    notes TEXT,
    CONSTRAINT uq_payments_installment UNIQUE (loan_id, installment_number)
);

CREATE TABLE consolidation_periods (
    id UUID PRIMARY KEY,
    start_at TIMESTAMPTZ NOT NULL,
    end_at TIMESTAMPTZ NOT NULL,
    opening_capital NUMERIC(19, 4) NOT NULL DEFAULT 0,
    closing_capital NUMERIC(19, 4) NOT NULL DEFAULT 0,
    generated_at TIMESTAMPTZ NOT NULL,
    notes TEXT,
    CONSTRAINT uq_periods_start UNIQUE (start_at),
    CONSTRAINT chk_periods_bounds CHECK (end_at >= start_at)
);

CREATE INDEX idx_periods_end ON consolidation_periods(end_at DESC);

CREATE TABLE ledger_entries (
    id UUID PRIMARY KEY,
    period_id UUID NOT NULL REFERENCES consolidation_periods(id),
    recorded_at TIMESTAMPTZ NOT NULL,
    kind VARCHAR(16) NOT NULL,
    status VARCHAR(32) NOT NULL,
    description TEXT NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    loan_id UUID REFERENCES loans(id) ON DELETE CASCADE,
    CONSTRAINT chk_entries_kind CHECK (kind IN ('income', 'expense')),
    CONSTRAINT chk_entries_amount CHECK (amount >= 0)
);

CREATE INDEX idx_entries_period ON ledger_entries(period_id, recorded_at);
CREATE INDEX idx_entries_loan ON ledger_entries(loan_id) WHERE loan_id IS NOT NULL;

CREATE TABLE fixed_expense_templates (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    frequency VARCHAR(16) NOT NULL,
    day_one INTEGER NOT NULL,
    day_two INTEGER,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    CONSTRAINT chk_templates_frequency CHECK (frequency IN ('monthly', 'biweekly')),
    CONSTRAINT chk_templates_days CHECK (
        day_one BETWEEN 1 AND 31 AND (day_two IS NULL OR day_two BETWEEN 1 AND 31)
    )
);

CREATE TABLE fixed_expense_executions (
    id UUID PRIMARY KEY,
    template_id UUID NOT NULL REFERENCES fixed_expense_templates(id),
    period_id UUID NOT NULL REFERENCES consolidation_periods(id),
    amount_paid NUMERIC(19, 4) NOT NULL,
    executed_at TIMESTAMPTZ NOT NULL,
    ledger_entry_id UUID REFERENCES ledger_entries(id) ON DELETE SET NULL,
    CONSTRAINT uq_executions_template_period UNIQUE (template_id, period_id)
);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS fixed_expense_executions CASCADE;
DROP TABLE IF EXISTS fixed_expense_templates CASCADE;
DROP TABLE IF EXISTS ledger_entries CASCADE;
DROP TABLE IF EXISTS consolidation_periods CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS loans CASCADE;
";
