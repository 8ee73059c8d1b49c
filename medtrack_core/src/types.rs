//! Core domain types for medication adherence tracking.
//!
//! This module defines the fundamental types used throughout the system:
//! - Medications (the roster) and dose logs (the journal)
//! - Derived per-day classifications and calendar marks
//! - Aggregate adherence statistics

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

// ============================================================================
// Roster and Journal Types
// ============================================================================

/// A registered medication
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Medication {
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub created_at: DateTime<Utc>,
}

/// A record asserting a medication was taken on a calendar date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoseLog {
    pub id: Uuid,
    pub medication_id: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<PathBuf>,
}

impl DoseLog {
    /// Create a new log entry stamped with the current time
    pub fn new(medication_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            medication_id: medication_id.into(),
            date,
            created_at: Utc::now(),
            photo: None,
        }
    }

    pub fn with_photo(mut self, photo: Option<PathBuf>) -> Self {
        self.photo = photo;
        self
    }
}

// ============================================================================
// Derived Classification Types
// ============================================================================

/// Adherence status of a single day against the current roster
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    None,
    Partial,
    Full,
}

/// Result of classifying one calendar date
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DayClassification {
    pub date: NaiveDate,
    /// Distinct roster medications with a log on `date`
    pub taken: usize,
    /// Roster size at evaluation time
    pub total: usize,
    pub status: DayStatus,
}

/// Display state of a calendar cell, relative to the evaluation date
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CalendarMark {
    /// Every medication taken
    AllTaken,
    /// Some but not all medications taken
    SomeTaken,
    /// Past day with nothing taken
    Missed,
    /// Evaluation day with nothing taken yet
    Pending,
    /// Future day with nothing logged
    Upcoming,
}

/// A classified calendar cell
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CalendarDay {
    pub classification: DayClassification,
    pub mark: CalendarMark,
    pub is_today: bool,
    /// Whether doses may be marked for this day
    pub actionable: bool,
}

/// Dashboard statistics for the month and week containing the evaluation date
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct AdherenceStats {
    /// Percentage (0-100) of days this month with at least one dose logged
    pub adherence_rate: u8,
    /// Consecutive fully-adherent days ending at the evaluation date
    pub current_streak: u32,
    /// Days this month without any dose logged
    pub missed_doses: u32,
    /// Days this week with at least one dose logged
    pub taken_this_week: u32,
    /// Dose log entries dated within this week
    pub doses_this_week: u32,
}

/// One entry of the recent activity feed
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RecentActivity {
    pub date: NaiveDate,
    pub medication_id: String,
    pub medication_name: String,
    pub taken_at: DateTime<Utc>,
    pub has_photo: bool,
}

// ============================================================================
// Week Convention
// ============================================================================

/// First day of the week used for weekly counts
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
    Saturday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Saturday => Weekday::Sat,
        }
    }
}
