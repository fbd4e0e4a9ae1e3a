//! Core lending logic for Lendfund.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Storage is reached through the [`store::LendingStore`] port.
//!
//! # Modules
//!
//! - `amortization` - Installment schedules, rate solving, simulations
//! - `period` - Consolidation period boundaries (cut days on the 8th and 23rd)
//! - `expense` - Recurring fixed expenses and their due dates
//! - `ledger` - Ledger entries and the period-resolving registrar
//! - `loan` - Loan issuance, payments and deletion
//! - `consolidation` - Period close-out and the daily trigger
//! - `store` - Persistence port and an in-memory implementation
//! - `clock` - Injectable time source

pub mod amortization;
pub mod clock;
pub mod consolidation;
pub mod error;
pub mod expense;
pub mod ledger;
pub mod loan;
pub mod period;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use error::LendingError;
