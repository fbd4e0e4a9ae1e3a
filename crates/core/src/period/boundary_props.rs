//! Property-based tests for PeriodBoundaryResolver.
//!
//! - Property 5: Cut-day periods end on the 22nd or the following 7th
//! - Property 6: Consecutive cut-day periods tile the calendar

use chrono::{Datelike, Duration, NaiveDate};
use proptest::prelude::*;

use super::boundary::PeriodBoundaryResolver;

fn year() -> impl Strategy<Value = i32> {
    2000i32..2100
}

fn month() -> impl Strategy<Value = u32> {
    1u32..=12
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 5.1: a period minted on the 8th ends on the 22nd of the same month.
    #[test]
    fn prop_day_8_ends_same_month(y in year(), m in month()) {
        let start = NaiveDate::from_ymd_opt(y, m, 8).unwrap();
        let bounds = PeriodBoundaryResolver::default().resolve(start).unwrap().unwrap();

        prop_assert_eq!(bounds.local_end, NaiveDate::from_ymd_opt(y, m, 22).unwrap());
        prop_assert!(bounds.end > bounds.start);
    }

    /// Property 5.2: a period minted on the 23rd ends on the 7th of the next month.
    #[test]
    fn prop_day_23_ends_next_month(y in year(), m in month()) {
        let start = NaiveDate::from_ymd_opt(y, m, 23).unwrap();
        let bounds = PeriodBoundaryResolver::default().resolve(start).unwrap().unwrap();

        let (ny, nm) = if m == 12 { (y + 1, 1) } else { (y, m + 1) };
        prop_assert_eq!(bounds.local_end, NaiveDate::from_ymd_opt(ny, nm, 7).unwrap());
    }

    /// Property 6: the day after a period's last day is the next cut day.
    #[test]
    fn prop_periods_tile(y in year(), m in month(), second_half in any::<bool>()) {
        let day = if second_half { 23 } else { 8 };
        let start = NaiveDate::from_ymd_opt(y, m, day).unwrap();
        let bounds = PeriodBoundaryResolver::default().resolve(start).unwrap().unwrap();

        let next = bounds.local_end + Duration::days(1);
        prop_assert!(PeriodBoundaryResolver::is_cut_day(next));
        let next_bounds = PeriodBoundaryResolver::default().resolve(next).unwrap().unwrap();
        prop_assert_eq!(next_bounds.start - bounds.end, Duration::seconds(1));
        prop_assert_ne!(next.day(), start.day());
    }
}
