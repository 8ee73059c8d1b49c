//! Adherence computation over an in-memory roster/journal snapshot.
//!
//! Every function here is a pure function of its arguments:
//! - [`LogIndex`]: date -> set of medication ids taken that date
//! - [`classify_day`] / [`calendar_day`]: full / partial / none per date
//! - [`compute_streak`]: consecutive fully-adherent days ending today
//! - [`compute_monthly_stats`]: monthly rate, missed days, weekly counts
//!
//! Nothing in this module performs I/O or returns an error.

mod activity;
mod classify;
mod index;
mod period;
mod stats;
mod streak;

pub use activity::recent_activity;
pub use classify::{calendar_day, calendar_month, classify_day, is_actionable};
pub use index::LogIndex;
pub use period::{days_in_month, month_bounds, week_bounds};
pub use stats::{compute_monthly_stats, StatsOptions};
pub use streak::compute_streak;
