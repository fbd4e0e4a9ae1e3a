//! Installment schedule math.
//!
//! This module implements:
//! - Schedule generation under the flat and declining conventions
//! - Rate solving: the inverse of schedule generation, by bisection
//! - Borrower-facing simulations (term options, installment ranges)

pub mod calculator;
pub mod error;
pub mod simulation;
pub mod solver;
pub mod types;

#[cfg(test)]
mod calculator_props;
#[cfg(test)]
mod solver_props;

pub use calculator::AmortizationCalculator;
pub use error::AmortizationError;
pub use simulation::{InstallmentRange, TermOption, installment_range, is_plausible_installment, term_options};
pub use solver::{RateSolver, SolvedRate, SolverSettings};
pub use types::{CalculationMethod, InstallmentLine, Schedule, ScheduleRequest};
