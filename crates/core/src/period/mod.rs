//! Consolidation periods.
//!
//! The fund's books are cut twice a month, on the 8th and the 23rd. This
//! module implements:
//! - Boundary math for the period minted on a cut day
//! - The persisted period record and its containment rule
//! - Error types for period handling

pub mod boundary;
pub mod error;
pub mod types;

#[cfg(test)]
mod boundary_props;

pub use boundary::{CUT_DAYS, PeriodBoundaryResolver, PeriodBounds};
pub use error::PeriodError;
pub use types::{ConsolidationPeriod, NewPeriod};
