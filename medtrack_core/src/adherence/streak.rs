//! Consecutive full-adherence day counting.

use super::{classify_day, LogIndex};
use crate::{DayStatus, Medication};
use chrono::NaiveDate;

/// Count consecutive `full` days walking backward from (and including) `today`.
///
/// The walk stops at the first non-full day. It never inspects more than
/// `max_lookback` days, nor more days than the index holds dates, so it
/// terminates for any input. An empty roster yields 0.
pub fn compute_streak(
    medications: &[Medication],
    index: &LogIndex,
    today: NaiveDate,
    max_lookback: u32,
) -> u32 {
    if medications.is_empty() {
        return 0;
    }

    let limit = u32::try_from(index.len()).unwrap_or(u32::MAX).min(max_lookback);
    let mut streak = 0;
    let mut cursor = today;

    while streak < limit {
        if classify_day(medications, index, cursor).status != DayStatus::Full {
            break;
        }
        streak += 1;
        match cursor.pred_opt() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }

    streak
}
