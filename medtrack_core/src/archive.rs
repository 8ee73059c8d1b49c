//! CSV archive of the dose-log journal.
//!
//! Rolling up moves every journal entry into an append-only CSV file and
//! empties the journal, keeping a `.processed` copy until cleanup.

use crate::journal::JsonlJournal;
use crate::{DoseLog, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A row in the CSV archive
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    id: String,
    medication_id: String,
    date: String,
    created_at: String,
    photo: Option<String>,
}

impl From<&DoseLog> for CsvRow {
    fn from(log: &DoseLog) -> Self {
        CsvRow {
            id: log.id.to_string(),
            medication_id: log.medication_id.clone(),
            date: log.date.format("%Y-%m-%d").to_string(),
            created_at: log.created_at.to_rfc3339(),
            photo: log.photo.as_ref().map(|p| p.display().to_string()),
        }
    }
}

impl TryFrom<CsvRow> for DoseLog {
    type Error = crate::Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| crate::Error::Other(format!("Invalid UUID: {}", e)))?;

        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
            .map_err(|e| crate::Error::Other(format!("Invalid date: {}", e)))?;

        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| crate::Error::Other(format!("Invalid timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(DoseLog {
            id,
            medication_id: row.medication_id,
            date,
            created_at,
            photo: row.photo.filter(|p| !p.is_empty()).map(PathBuf::from),
        })
    }
}

/// Roll up journal entries into the CSV archive and archive the journal
///
/// The journal's exclusive lock is held for the whole sequence, so takes
/// that arrive meanwhile wait and land in the emptied journal:
/// 1. Reads all logs from the locked journal
/// 2. Appends them to the CSV file (creates with headers if needed)
/// 3. Syncs the CSV to disk
/// 4. Appends the raw journal to `.processed` and empties the journal
/// 5. Returns the number of logs processed
///
/// A crash between steps 3 and 4 leaves entries in both places; readers
/// deduplicate by id.
pub fn journal_to_csv_and_archive(journal_path: &Path, csv_path: &Path) -> Result<usize> {
    if !journal_path.exists() {
        tracing::info!("No journal file to roll up");
        return Ok(0);
    }

    let mut journal = JsonlJournal::new(journal_path).lock()?;
    let raw = journal.read_raw()?;
    let logs = journal.read_logs()?;

    if logs.is_empty() {
        tracing::info!("No dose logs in journal to roll up");
        return Ok(0);
    }

    // Ensure parent directory exists
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    // Headers only for a fresh file
    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for log in &logs {
        writer.serialize(CsvRow::from(log))?;
    }

    // Flush and sync to disk
    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Wrote {} dose logs to CSV", logs.len());

    let processed_path = processed_path(journal_path);
    let mut processed = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&processed_path)?;
    processed.write_all(raw.as_bytes())?;
    processed.sync_all()?;

    journal.truncate()?;

    tracing::info!("Archived journal to {:?}", processed_path);

    Ok(logs.len())
}

fn processed_path(journal_path: &Path) -> PathBuf {
    let mut name = journal_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".processed");
    journal_path.with_file_name(name)
}

/// Load all dose logs from a CSV archive
///
/// Rows that fail to parse are skipped with a warning.
pub fn read_archive(path: &Path) -> Result<Vec<DoseLog>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut logs = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match DoseLog::try_from(row) {
                Ok(log) => logs.push(log),
                Err(e) => tracing::warn!("Failed to parse CSV row: {}", e),
            },
            Err(e) => tracing::warn!("Failed to deserialize CSV row: {}", e),
        }
    }

    tracing::debug!("Read {} dose logs from CSV archive", logs.len());
    Ok(logs)
}

/// Clean up old processed journal files
///
/// This removes all `.processed` files in the given directory.
pub fn cleanup_processed_journals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.extension().is_some_and(|ext| ext == "processed") {
            std::fs::remove_file(&path)?;
            tracing::debug!("Removed processed journal: {:?}", path);
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed journal files", count);
    }

    Ok(count)
}
