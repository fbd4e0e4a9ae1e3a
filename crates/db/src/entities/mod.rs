//! `SeaORM` entities for the lending schema.

pub mod consolidation_periods;
pub mod fixed_expense_executions;
pub mod fixed_expense_templates;
pub mod ledger_entries;
pub mod loans;
pub mod payments;
