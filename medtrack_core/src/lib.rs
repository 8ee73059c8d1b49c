#![forbid(unsafe_code)]

//! Core domain model and business logic for medtrack.
//!
//! This crate provides:
//! - Domain types (medications, dose logs, classifications, statistics)
//! - Adherence computation (log index, day classifier, streak, monthly stats)
//! - Persistence (roster file, dose-log journal, CSV archive, photo proofs)
//! - Mark-taken workflow over an owner's data directory

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod adherence;
pub mod roster;
pub mod journal;
pub mod archive;
pub mod history;
pub mod photo;
pub mod store;
pub mod tracker;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use adherence::{
    calendar_day, calendar_month, classify_day, compute_monthly_stats, compute_streak,
    recent_activity, LogIndex, StatsOptions,
};
pub use roster::{MedicationUpdate, Roster};
pub use journal::{DoseLogSink, JsonlJournal};
pub use history::load_all_logs;
pub use store::{DataPaths, Snapshot};
pub use tracker::{plan_mark_taken, MarkOutcome, MarkTarget, Tracker};
