//! Due-date calculation for fixed expenses.
//!
//! A template's days of month are anchored to the month the period starts
//! in. A date that lands before the period start rolls to the same day of the
//! following month, which covers periods spanning a month boundary
//! (23rd → 7th). Days past the end of a month clamp to its last day.

use chrono::{Datelike, Months, NaiveDate};

use super::types::{DueExpense, FixedExpenseTemplate};

/// Stateless due-date calculator.
pub struct FixedExpenseScheduler;

impl FixedExpenseScheduler {
    /// Due dates of `template` inside `[start, end]`, ascending and distinct.
    #[must_use]
    pub fn due_dates(template: &FixedExpenseTemplate, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = template
            .days_of_month()
            .into_iter()
            .filter_map(|day| candidate(start, day))
            .filter(|date| *date >= start && *date <= end)
            .collect();
        dates.sort_unstable();
        dates.dedup();
        dates
    }

    /// Active templates with at least one due date in `[start, end]`.
    ///
    /// Each template appears at most once, dated by its earliest due date.
    /// Templates that fail validation are skipped.
    #[must_use]
    pub fn due_expenses(
        templates: &[FixedExpenseTemplate],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<DueExpense> {
        templates
            .iter()
            .filter(|t| t.active)
            .filter(|t| match t.validate() {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(template_id = %t.id, error = %err, "skipping invalid fixed expense template");
                    false
                }
            })
            .filter_map(|t| {
                let due_on = Self::due_dates(t, start, end).into_iter().next()?;
                Some(DueExpense {
                    template_id: t.id,
                    name: t.name.clone(),
                    amount: t.amount,
                    due_on,
                })
            })
            .collect()
    }
}

/// `day` in the start month, or in the next month if that falls before `start`.
fn candidate(start: NaiveDate, day: u32) -> Option<NaiveDate> {
    let anchored = clamped_date(start.year(), start.month(), day)?;
    if anchored >= start {
        return Some(anchored);
    }
    let next_month = start.with_day(1)?.checked_add_months(Months::new(1))?;
    clamped_date(next_month.year(), next_month.month(), day)
}

/// `year-month-day`, or the month's last day when `day` exceeds it.
fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    first.with_day(day.min(last.day()))
}
