//! Recurring fixed expenses.
//!
//! Templates describe an amount and the days of month it is charged on. The
//! scheduler decides which templates fall due inside a period; executions
//! record that a template was charged in a period and guard against charging
//! it twice.

pub mod error;
pub mod scheduler;
pub mod types;

pub use error::ExpenseError;
pub use scheduler::FixedExpenseScheduler;
pub use types::{
    DueExpense, ExecutionOutcome, ExpenseFrequency, FixedExpenseExecution, FixedExpenseTemplate,
};
