//! Per-day adherence classification and calendar marks.

use super::{days_in_month, LogIndex};
use crate::{CalendarDay, CalendarMark, DayClassification, DayStatus, Medication};
use chrono::NaiveDate;

/// Classify `date` against the current roster.
///
/// Logs for medications no longer in the roster are ignored. An empty
/// roster always classifies as [`DayStatus::None`].
pub fn classify_day(
    medications: &[Medication],
    index: &LogIndex,
    date: NaiveDate,
) -> DayClassification {
    let total = medications.len();
    let taken = match index.taken_on(date) {
        Some(ids) => medications.iter().filter(|m| ids.contains(&m.id)).count(),
        None => 0,
    };

    let status = if taken == 0 {
        DayStatus::None
    } else if taken == total {
        DayStatus::Full
    } else {
        DayStatus::Partial
    };

    DayClassification {
        date,
        taken,
        total,
        status,
    }
}

/// Doses may be marked for any day up to and including `today`
pub fn is_actionable(date: NaiveDate, today: NaiveDate) -> bool {
    date <= today
}

/// Classify `date` and attach its display mark relative to `today`
pub fn calendar_day(
    medications: &[Medication],
    index: &LogIndex,
    date: NaiveDate,
    today: NaiveDate,
) -> CalendarDay {
    let classification = classify_day(medications, index, date);

    let mark = match classification.status {
        DayStatus::Full => CalendarMark::AllTaken,
        DayStatus::Partial => CalendarMark::SomeTaken,
        DayStatus::None if date < today => CalendarMark::Missed,
        DayStatus::None if date == today => CalendarMark::Pending,
        DayStatus::None => CalendarMark::Upcoming,
    };

    CalendarDay {
        classification,
        mark,
        is_today: date == today,
        actionable: is_actionable(date, today),
    }
}

/// Calendar cells for every day of `year`-`month`, in date order.
///
/// An invalid month yields an empty vector.
pub fn calendar_month(
    medications: &[Medication],
    index: &LogIndex,
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Vec<CalendarDay> {
    (1..=days_in_month(year, month))
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .map(|date| calendar_day(medications, index, date, today))
        .collect()
}
