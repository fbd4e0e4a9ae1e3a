//! Period records.

use chrono::{DateTime, Utc};
use lendfund_shared::types::PeriodId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::boundary::PeriodBounds;
use super::error::PeriodError;

/// A persisted consolidation period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationPeriod {
    /// Unique identifier.
    pub id: PeriodId,
    /// First instant of the period.
    pub start_at: DateTime<Utc>,
    /// Last instant of the period.
    pub end_at: DateTime<Utc>,
    /// Capital carried in from the previous period.
    pub opening_capital: Decimal,
    /// Capital paid out during the period.
    pub closing_capital: Decimal,
    /// When the consolidation run created this period.
    pub generated_at: DateTime<Utc>,
    /// Free-text notes.
    pub notes: Option<String>,
}

impl ConsolidationPeriod {
    /// Returns true if `at` falls within `[start_at, end_at]`.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start_at && at <= self.end_at
    }

    /// Capital the next period opens with: `opening − closing`.
    #[must_use]
    pub fn carried_forward(&self) -> Decimal {
        self.opening_capital - self.closing_capital
    }
}

/// Fields of a period about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPeriod {
    /// First instant of the period.
    pub start_at: DateTime<Utc>,
    /// Last instant of the period.
    pub end_at: DateTime<Utc>,
    /// Opening capital.
    pub opening_capital: Decimal,
    /// Closing capital, zero for a freshly opened period.
    pub closing_capital: Decimal,
    /// Creation instant.
    pub generated_at: DateTime<Utc>,
    /// Free-text notes.
    pub notes: Option<String>,
}

impl NewPeriod {
    /// Opens a period over `bounds` with the carried-forward capital.
    #[must_use]
    pub fn opening(
        bounds: &PeriodBounds,
        opening_capital: Decimal,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            start_at: bounds.start,
            end_at: bounds.end,
            opening_capital,
            closing_capital: Decimal::ZERO,
            generated_at,
            notes: Some(format!(
                "Automatic consolidation {} to {}. Opening capital carried forward: {}",
                bounds.local_start, bounds.local_end, opening_capital
            )),
        }
    }

    /// Checks that the period does not end before it starts.
    pub fn validate(&self) -> Result<(), PeriodError> {
        if self.end_at < self.start_at {
            return Err(PeriodError::InvertedBounds {
                start: self.start_at,
                end: self.end_at,
            });
        }
        Ok(())
    }

    /// Materializes the record under an id.
    #[must_use]
    pub fn into_period(self, id: PeriodId) -> ConsolidationPeriod {
        ConsolidationPeriod {
            id,
            start_at: self.start_at,
            end_at: self.end_at,
            opening_capital: self.opening_capital,
            closing_capital: self.closing_capital,
            generated_at: self.generated_at,
            notes: self.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal_macros::dec;

    use crate::period::PeriodBoundaryResolver;

    fn april_23() -> PeriodBounds {
        PeriodBoundaryResolver::default()
            .resolve(NaiveDate::from_ymd_opt(2026, 4, 23).unwrap())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_contains_is_inclusive() {
        let bounds = april_23();
        let now = Utc.with_ymd_and_hms(2026, 4, 23, 0, 0, 0).unwrap();
        let period = NewPeriod::opening(&bounds, dec!(1000), now).into_period(PeriodId::new());

        assert!(period.contains(bounds.start));
        assert!(period.contains(bounds.end));
        assert!(!period.contains(bounds.end + chrono::Duration::seconds(1)));
        assert!(!period.contains(bounds.start - chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_carried_forward() {
        let bounds = april_23();
        let mut period = NewPeriod::opening(&bounds, dec!(5000), bounds.start)
            .into_period(PeriodId::new());
        period.closing_capital = dec!(1200.50);
        assert_eq!(period.carried_forward(), dec!(3799.50));
    }

    #[test]
    fn test_opening_notes_and_zero_closing() {
        let bounds = april_23();
        let new = NewPeriod::opening(&bounds, dec!(250), bounds.start);
        assert_eq!(new.closing_capital, Decimal::ZERO);
        assert_eq!(
            new.notes.as_deref(),
            Some("Automatic consolidation 2026-04-23 to 2026-05-07. Opening capital carried forward: 250")
        );
        assert!(new.validate().is_ok());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let bounds = april_23();
        let mut new = NewPeriod::opening(&bounds, Decimal::ZERO, bounds.start);
        new.end_at = bounds.start - chrono::Duration::days(1);
        assert!(matches!(new.validate(), Err(PeriodError::InvertedBounds { .. })));
    }
}
