//! Append-only dose-log journal.
//!
//! Dose logs are appended to a JSONL (JSON Lines) file with file locking
//! to ensure safe concurrent access. Read-then-write sequences (planning a
//! take, rolling up to CSV) go through [`LockedJournal`] so no other
//! writer can slip in between the read and the write.

use crate::{DoseLog, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Write side of the dose-log store
pub trait DoseLogSink {
    fn append(&mut self, log: &DoseLog) -> Result<()>;

    /// Append several logs; the default appends one at a time
    fn append_all(&mut self, logs: &[DoseLog]) -> Result<()> {
        for log in logs {
            self.append(log)?;
        }
        Ok(())
    }
}

/// JSONL-based journal with file locking
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    /// Create a new journal handle for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open (creating if needed) and hold the journal's exclusive lock
    /// until the returned guard is dropped.
    pub fn lock(&self) -> Result<LockedJournal> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.lock_exclusive()?;

        Ok(LockedJournal { file })
    }
}

impl DoseLogSink for JsonlJournal {
    fn append(&mut self, log: &DoseLog) -> Result<()> {
        self.lock()?.append_all(std::slice::from_ref(log))?;
        tracing::debug!("Appended dose log {} to journal", log.id);
        Ok(())
    }

    fn append_all(&mut self, logs: &[DoseLog]) -> Result<()> {
        if logs.is_empty() {
            return Ok(());
        }
        self.lock()?.append_all(logs)?;
        tracing::debug!("Appended {} dose logs to journal", logs.len());
        Ok(())
    }
}

/// Journal file held under an exclusive lock; released on drop
pub struct LockedJournal {
    file: File,
}

impl LockedJournal {
    /// Raw journal contents
    pub fn read_raw(&mut self) -> Result<String> {
        let mut contents = String::new();
        self.file.seek(SeekFrom::Start(0))?;
        self.file.read_to_string(&mut contents)?;
        Ok(contents)
    }

    pub fn read_logs(&mut self) -> Result<Vec<DoseLog>> {
        let contents = self.read_raw()?;
        parse_logs(contents.as_bytes())
    }

    /// Empty the journal. Writers blocked on the lock append to the
    /// same (now empty) file afterwards.
    pub fn truncate(&mut self) -> Result<()> {
        self.file.set_len(0)?;
        self.file.sync_all()?;
        Ok(())
    }
}

impl DoseLogSink for LockedJournal {
    fn append(&mut self, log: &DoseLog) -> Result<()> {
        self.append_all(std::slice::from_ref(log))
    }

    fn append_all(&mut self, logs: &[DoseLog]) -> Result<()> {
        let mut writer = std::io::BufWriter::new(&self.file);
        for log in logs {
            let line = serde_json::to_string(log)?;
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Drop for LockedJournal {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!("Failed to unlock journal: {}", e);
        }
    }
}

/// Parse JSONL dose logs, skipping lines that fail to parse with a warning
fn parse_logs<R: Read>(input: R) -> Result<Vec<DoseLog>> {
    let mut logs = Vec::new();

    for (line_num, line_result) in BufReader::new(input).lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<DoseLog>(&line) {
            Ok(log) => logs.push(log),
            Err(e) => {
                tracing::warn!("Failed to parse dose log at line {}: {}", line_num + 1, e);
            }
        }
    }

    Ok(logs)
}

/// Read all dose logs from a journal file
///
/// Lines that fail to parse are skipped with a warning.
pub fn read_logs(path: &Path) -> Result<Vec<DoseLog>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Acquire shared lock for reading
    file.lock_shared()?;
    let logs = parse_logs(&file);
    file.unlock()?;

    let logs = logs?;
    tracing::debug!("Read {} dose logs from journal", logs.len());
    Ok(logs)
}
