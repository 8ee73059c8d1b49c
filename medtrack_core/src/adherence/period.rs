//! Calendar period arithmetic (month and week boundaries).

use crate::WeekStart;
use chrono::{Datelike, Duration, NaiveDate};

/// Number of days in the given month. Returns 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match next {
        Some(next) => (next - first).num_days() as u32,
        // Only reachable at the upper edge of chrono's date range
        None => 31,
    }
}

/// First and last day of the month containing `date`
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = date
        .with_day(days_in_month(date.year(), date.month()))
        .unwrap_or(date);
    (first, last)
}

/// First and last day of the week containing `date`
///
/// Weeks that cross the ends of the supported date range are clamped to it.
pub fn week_bounds(date: NaiveDate, week_start: WeekStart) -> (NaiveDate, NaiveDate) {
    let start_offset = week_start.weekday().num_days_from_monday();
    let offset = (date.weekday().num_days_from_monday() + 7 - start_offset) % 7;
    let start = date
        .checked_sub_signed(Duration::days(i64::from(offset)))
        .unwrap_or(NaiveDate::MIN);
    let end = start
        .checked_add_signed(Duration::days(6))
        .unwrap_or(NaiveDate::MAX);
    (start, end)
}
