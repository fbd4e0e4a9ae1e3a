//! Clock-driven consolidation trigger.

use chrono::NaiveDate;

use super::manager::PeriodConsolidationManager;
use super::types::CycleOutcome;
use crate::clock::Clock;
use crate::error::LendingError;
use crate::store::LendingStore;

/// Runs the consolidation cycle from a clock, at most once per local day.
///
/// An external timer calls [`tick`](Self::tick) as often as it likes; only
/// the first successful tick of each local date reaches the manager. A failed
/// cycle is retried on the next tick.
pub struct ConsolidationScheduler<S: ?Sized, C> {
    manager: PeriodConsolidationManager<S, C>,
    last_run: Option<NaiveDate>,
}

impl<S, C> ConsolidationScheduler<S, C>
where
    S: LendingStore + ?Sized,
    C: Clock,
{
    /// Wraps a manager.
    pub fn new(manager: PeriodConsolidationManager<S, C>) -> Self {
        Self {
            manager,
            last_run: None,
        }
    }

    /// Local date of the last successful tick.
    pub fn last_run(&self) -> Option<NaiveDate> {
        self.last_run
    }

    /// Runs the cycle for the clock's current instant unless today already ran.
    pub async fn tick(&mut self) -> Result<Option<CycleOutcome>, LendingError> {
        let now = self.manager.clock().now();
        let today = self.manager.resolver().local_date(now);
        if self.last_run == Some(today) {
            tracing::trace!(%today, "consolidation already ran today");
            return Ok(None);
        }

        let outcome = self.manager.run_cycle(now).await?;
        self.last_run = Some(today);
        Ok(outcome)
    }
}
