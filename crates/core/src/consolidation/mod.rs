//! Period consolidation.
//!
//! On every cut day the fund closes the running period and opens the next:
//! - the previous period's net capital is carried forward as opening capital
//! - the carry-over is booked in the new period
//! - fixed expenses due in the new period are charged once each
//!
//! The manager runs one cycle for a given instant; the scheduler drives it
//! from a clock at most once per local day.

pub mod manager;
pub mod scheduler;
pub mod types;

pub use manager::PeriodConsolidationManager;
pub use scheduler::ConsolidationScheduler;
pub use types::{CycleOutcome, ExpenseFailure, ExpenseRunReport};
