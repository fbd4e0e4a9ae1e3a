//! Cut-day boundary math.
//!
//! - Day 8 mints `[8th 00:00:00, 22nd 23:59:59]` of the same month.
//! - Day 23 mints `[23rd 00:00:00, 7th 23:59:59]` of the following month.
//! - Any other day mints nothing; such dates resolve into an already
//!   persisted period by range lookup.
//!
//! Boundaries are wall-clock times in the fund's time zone, stored in UTC.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::error::PeriodError;

/// Days of the month on which a new period starts.
pub const CUT_DAYS: [u32; 2] = [8, 23];

const FIRST_HALF_END_DAY: u32 = 22;
const SECOND_HALF_END_DAY: u32 = 7;

/// Bounds of a period minted on a cut day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBounds {
    /// First instant of the period.
    pub start: DateTime<Utc>,
    /// Last instant of the period (23:59:59 local).
    pub end: DateTime<Utc>,
    /// Local calendar date of `start`.
    pub local_start: NaiveDate,
    /// Local calendar date of `end`.
    pub local_end: NaiveDate,
}

/// Resolves cut-day boundaries in a fixed time zone.
#[derive(Debug, Clone, Copy)]
pub struct PeriodBoundaryResolver {
    tz: Tz,
}

impl Default for PeriodBoundaryResolver {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl PeriodBoundaryResolver {
    /// Creates a resolver for a time zone.
    #[must_use]
    pub const fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Creates a resolver from an IANA zone name such as `America/Santo_Domingo`.
    pub fn from_name(name: &str) -> Result<Self, PeriodError> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| PeriodError::UnknownTimeZone(name.to_string()))
    }

    /// The resolver's time zone.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.tz
    }

    /// True on the 8th and the 23rd.
    #[must_use]
    pub fn is_cut_day(date: NaiveDate) -> bool {
        CUT_DAYS.contains(&date.day())
    }

    /// Local calendar date of an instant.
    #[must_use]
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// Wall-clock bounds of the period starting on `date`, if it is a cut day.
    #[must_use]
    pub fn local_bounds(date: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let end_date = match date.day() {
            8 => date.with_day(FIRST_HALF_END_DAY)?,
            23 => {
                let next = date.checked_add_months(Months::new(1))?;
                next.with_day(SECOND_HALF_END_DAY)?
            }
            _ => return None,
        };
        let last_second = NaiveTime::from_hms_opt(23, 59, 59)?;
        Some((date.and_time(NaiveTime::MIN), end_date.and_time(last_second)))
    }

    /// Bounds of the period minted on `date`, or `None` on ordinary days.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::NonexistentLocalTime`] when a boundary falls in
    /// a daylight-saving gap of the resolver's zone.
    pub fn resolve(&self, date: NaiveDate) -> Result<Option<PeriodBounds>, PeriodError> {
        let Some((start, end)) = Self::local_bounds(date) else {
            return Ok(None);
        };
        Ok(Some(PeriodBounds {
            start: self.to_utc(start)?,
            end: self.to_utc(end)?,
            local_start: start.date(),
            local_end: end.date(),
        }))
    }

    /// Bounds of the period minted on the local date of `instant`.
    pub fn resolve_at(&self, instant: DateTime<Utc>) -> Result<Option<PeriodBounds>, PeriodError> {
        self.resolve(self.local_date(instant))
    }

    fn to_utc(&self, local: NaiveDateTime) -> Result<DateTime<Utc>, PeriodError> {
        self.tz
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or(PeriodError::NonexistentLocalTime(local))
    }
}
