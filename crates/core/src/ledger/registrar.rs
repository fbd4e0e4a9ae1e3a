//! Single write path for ledger entries.

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use lendfund_shared::types::{LedgerEntryId, PeriodId, round_money};
use rust_decimal::Decimal;

use super::types::{LedgerEntry, NewLedgerEntry, PeriodSummary};
use crate::clock::Clock;
use crate::error::LendingError;
use crate::period::ConsolidationPeriod;
use crate::store::LendingStore;

/// Resolves the owning period of ledger entries and persists them.
pub struct LedgerRegistrar<S: ?Sized, C> {
    store: Arc<S>,
    clock: C,
}

impl<S, C> LedgerRegistrar<S, C>
where
    S: LendingStore + ?Sized,
    C: Clock,
{
    /// Creates a registrar over a store and a clock.
    pub fn new(store: Arc<S>, clock: C) -> Self {
        Self { store, clock }
    }

    /// The registrar's clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The registrar's store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The period whose range contains `at`.
    ///
    /// # Errors
    ///
    /// Returns [`LendingError::NoActivePeriod`] when no period covers `at`.
    pub async fn active_period(&self, at: DateTime<Utc>) -> Result<ConsolidationPeriod, LendingError> {
        self.store
            .find_period_containing(at)
            .await?
            .ok_or(LendingError::NoActivePeriod(at))
    }

    /// Validates an entry and fixes its period, instant and id without
    /// writing it.
    ///
    /// A supplied period id is trusted as is. Otherwise the period containing
    /// the entry instant is looked up. Instants are kept to whole seconds and
    /// default to now.
    pub async fn resolve(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, LendingError> {
        validate(&entry)?;

        let recorded_at = entry
            .recorded_at
            .unwrap_or_else(|| self.clock.now())
            .trunc_subsecs(0);
        let period_id = match entry.period_id {
            Some(id) => id,
            None => self.active_period(recorded_at).await?.id,
        };

        Ok(LedgerEntry {
            id: LedgerEntryId::new(),
            period_id,
            recorded_at,
            kind: entry.kind,
            status: entry.status,
            description: entry.description.trim().to_string(),
            amount: round_money(entry.amount),
            loan_id: entry.loan_id,
        })
    }

    /// Resolves and persists an entry.
    ///
    /// # Errors
    ///
    /// Returns a validation error for negative amounts or blank text,
    /// [`LendingError::NoActivePeriod`] when the period cannot be resolved,
    /// and passes store failures through.
    pub async fn register(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, LendingError> {
        let entry = self.resolve(entry).await?;
        self.store.create_ledger_entry(&entry).await?;

        tracing::debug!(
            entry_id = %entry.id,
            period_id = %entry.period_id,
            kind = %entry.kind,
            amount = %entry.amount,
            "ledger entry registered"
        );
        Ok(entry)
    }

    /// Income, expense and net of a period.
    ///
    /// # Errors
    ///
    /// Returns [`LendingError::PeriodNotFound`] for an unknown period.
    pub async fn period_summary(&self, period_id: PeriodId) -> Result<PeriodSummary, LendingError> {
        if self.store.find_period(period_id).await?.is_none() {
            return Err(LendingError::PeriodNotFound(period_id));
        }
        let entries = self.store.list_period_entries(period_id).await?;
        Ok(PeriodSummary::from_entries(period_id, &entries))
    }
}

fn validate(entry: &NewLedgerEntry) -> Result<(), LendingError> {
    if entry.amount < Decimal::ZERO {
        return Err(LendingError::Validation(format!(
            "ledger amount cannot be negative, got {}",
            entry.amount
        )));
    }
    if entry.description.trim().is_empty() {
        return Err(LendingError::Validation("ledger description is required".to_string()));
    }
    if entry.status.trim().is_empty() {
        return Err(LendingError::Validation("ledger status is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use hourglass_rs::{SafeTimeProvider, TimeSource};
    use rust_decimal_macros::dec;

    use crate::ledger::{EntryKind, status};
    use crate::period::{NewPeriod, PeriodBoundaryResolver};
    use crate::store::InMemoryStore;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    async fn store_with_april_8_period() -> (Arc<InMemoryStore>, ConsolidationPeriod) {
        let store = Arc::new(InMemoryStore::new());
        let bounds = PeriodBoundaryResolver::default()
            .resolve_at(at(2026, 4, 8, 0))
            .unwrap()
            .unwrap();
        let period = NewPeriod::opening(&bounds, Decimal::ZERO, bounds.start).into_period(PeriodId::new());
        store.create_period(&period).await.unwrap();
        (store, period)
    }

    fn clock_at(instant: DateTime<Utc>) -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(instant))
    }

    #[tokio::test]
    async fn test_resolves_period_from_now() {
        let (store, period) = store_with_april_8_period().await;
        let registrar = LedgerRegistrar::new(store.clone(), clock_at(at(2026, 4, 15, 10)));

        let entry = registrar
            .register(NewLedgerEntry::new(EntryKind::Income, status::DEPOSITED, "Capital injection", dec!(1500.005)))
            .await
            .unwrap();

        assert_eq!(entry.period_id, period.id);
        assert_eq!(entry.recorded_at, at(2026, 4, 15, 10));
        assert_eq!(entry.amount, dec!(1500.01));
        assert_eq!(store.entries().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_resolves_period_from_entry_timestamp() {
        let (store, period) = store_with_april_8_period().await;
        // clock is outside every period; the entry instant decides
        let registrar = LedgerRegistrar::new(store, clock_at(at(2030, 1, 1, 0)));

        let entry = registrar
            .register(
                NewLedgerEntry::new(EntryKind::Expense, status::PAID, "Office supplies", dec!(80))
                    .at(period.end_at),
            )
            .await
            .unwrap();
        assert_eq!(entry.period_id, period.id);
    }

    #[tokio::test]
    async fn test_sub_second_instant_at_period_end_resolves() {
        let (store, period) = store_with_april_8_period().await;
        let registrar = LedgerRegistrar::new(store, clock_at(at(2030, 1, 1, 0)));

        let entry = registrar
            .register(
                NewLedgerEntry::new(EntryKind::Expense, status::PAID, "Late fee", dec!(5))
                    .at(period.end_at + Duration::milliseconds(400)),
            )
            .await
            .unwrap();
        assert_eq!(entry.period_id, period.id);
        assert_eq!(entry.recorded_at, period.end_at);
    }

    #[tokio::test]
    async fn test_no_active_period() {
        let (store, _) = store_with_april_8_period().await;
        let registrar = LedgerRegistrar::new(store.clone(), clock_at(at(2026, 5, 1, 9)));

        let result = registrar
            .register(NewLedgerEntry::new(EntryKind::Income, status::CONFIRMED, "Payment", dec!(10)))
            .await;
        assert!(matches!(result, Err(LendingError::NoActivePeriod(_))));
        assert!(store.entries().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_explicit_period_is_trusted() {
        let (store, period) = store_with_april_8_period().await;
        let registrar = LedgerRegistrar::new(store, clock_at(at(2026, 5, 1, 9)));

        let entry = registrar
            .register(
                NewLedgerEntry::new(EntryKind::Income, status::DEPOSITED, "Late deposit", dec!(10))
                    .in_period(period.id),
            )
            .await
            .unwrap();
        assert_eq!(entry.period_id, period.id);
        assert_eq!(entry.recorded_at, at(2026, 5, 1, 9));
    }

    #[tokio::test]
    async fn test_rejects_negative_amount_and_blank_description() {
        let (store, _) = store_with_april_8_period().await;
        let registrar = LedgerRegistrar::new(store, clock_at(at(2026, 4, 10, 0)));

        let negative = registrar
            .register(NewLedgerEntry::new(EntryKind::Expense, status::PAID, "Refund", dec!(-1)))
            .await;
        assert!(matches!(negative, Err(LendingError::Validation(_))));

        let blank = registrar
            .register(NewLedgerEntry::new(EntryKind::Expense, status::PAID, "   ", dec!(1)))
            .await;
        assert!(matches!(blank, Err(LendingError::Validation(_))));
    }

    #[tokio::test]
    async fn test_period_summary() {
        let (store, period) = store_with_april_8_period().await;
        let registrar = LedgerRegistrar::new(store, clock_at(at(2026, 4, 10, 0)));

        for (kind, amount) in [
            (EntryKind::Income, dec!(3000)),
            (EntryKind::Expense, dec!(1000)),
            (EntryKind::Expense, dec!(250.50)),
        ] {
            registrar
                .register(NewLedgerEntry::new(kind, status::CONFIRMED, "movement", amount))
                .await
                .unwrap();
        }

        let summary = registrar.period_summary(period.id).await.unwrap();
        assert_eq!(summary.income, dec!(3000.00));
        assert_eq!(summary.expense, dec!(1250.50));
        assert_eq!(summary.net, dec!(1749.50));

        assert!(matches!(
            registrar.period_summary(PeriodId::new()).await,
            Err(LendingError::PeriodNotFound(_))
        ));
    }
}
