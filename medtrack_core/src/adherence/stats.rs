//! Monthly and weekly dashboard statistics.

use super::{compute_streak, month_bounds, week_bounds, LogIndex};
use crate::{AdherenceStats, DoseLog, Medication, WeekStart};
use chrono::{Datelike, NaiveDate};

/// Tunables for [`compute_monthly_stats`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatsOptions {
    pub week_start: WeekStart,
    pub max_streak_lookback_days: u32,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            week_start: WeekStart::Sunday,
            max_streak_lookback_days: 3650,
        }
    }
}

/// Compute dashboard statistics for the month and week containing `today`.
///
/// The monthly rate counts days with *any* dose logged, a looser criterion
/// than the streak, which requires every medication.
pub fn compute_monthly_stats(
    medications: &[Medication],
    logs: &[DoseLog],
    today: NaiveDate,
    options: StatsOptions,
) -> AdherenceStats {
    let index = LogIndex::build(logs);

    let (month_start, month_end) = month_bounds(today);
    let days_in_month = month_end.day();
    let logged_days = index.count_dates_between(month_start, month_end) as u32;
    let adherence_rate = if days_in_month == 0 {
        0
    } else {
        (f64::from(logged_days) * 100.0 / f64::from(days_in_month))
            .round()
            .min(100.0) as u8
    };

    let (week_start, week_end) = week_bounds(today, options.week_start);
    let taken_this_week = index.count_dates_between(week_start, week_end) as u32;
    let doses_this_week = logs
        .iter()
        .filter(|log| log.date >= week_start && log.date <= week_end)
        .count() as u32;

    AdherenceStats {
        adherence_rate,
        current_streak: compute_streak(
            medications,
            &index,
            today,
            options.max_streak_lookback_days,
        ),
        missed_doses: days_in_month - logged_days,
        taken_this_week,
        doses_this_week,
    }
}
