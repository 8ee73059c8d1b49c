//! Error types for the medtrack_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for medtrack_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Roster file could not be read or parsed
    #[error("Roster error: {0}")]
    Roster(String),

    /// Rejected user input (empty medication fields, unsupported photo, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// No medication with the given id in the roster
    #[error("Medication not found: {0}")]
    MedicationNotFound(String),

    /// Marking attempted with an empty roster
    #[error("No medications registered. Add a medication first.")]
    NoMedications,

    /// Marking attempted for a date after the evaluation date
    #[error("Cannot mark doses for a future date: {0}")]
    FutureDate(chrono::NaiveDate),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
