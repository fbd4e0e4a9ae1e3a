//! Fund ledger.
//!
//! Every movement of money (disbursements, installment payments, fixed
//! expenses, capital carry-over) is a ledger entry owned by exactly one
//! consolidation period. The registrar is the only way entries are written.

pub mod registrar;
pub mod types;

pub use registrar::LedgerRegistrar;
pub use types::{EntryKind, LedgerEntry, NewLedgerEntry, PeriodSummary, status};
