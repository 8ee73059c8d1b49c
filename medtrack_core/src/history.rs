//! Dose-log history loading.
//!
//! Merges the live journal with the CSV archive so the adherence core sees
//! every log exactly once.

use crate::{DoseLog, Result};
use std::collections::HashSet;
use std::path::Path;

/// Load all dose logs from both the journal and the CSV archive
///
/// Returns logs sorted by date (newest first). Logs present in both
/// sources are returned once.
pub fn load_all_logs(journal_path: &Path, csv_path: &Path) -> Result<Vec<DoseLog>> {
    let mut seen_ids = HashSet::new();
    let mut logs = Vec::new();

    // Journal first (most recent)
    for log in crate::journal::read_logs(journal_path)? {
        if seen_ids.insert(log.id) {
            logs.push(log);
        }
    }
    let journal_count = logs.len();
    tracing::debug!("Loaded {} dose logs from journal", journal_count);

    for log in crate::archive::read_archive(csv_path)? {
        if seen_ids.insert(log.id) {
            logs.push(log);
        }
    }
    tracing::debug!("Loaded {} dose logs from CSV", logs.len() - journal_count);

    logs.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

    tracing::info!("Loaded {} total dose logs", logs.len());
    Ok(logs)
}
