//! Medication roster persistence with file locking.
//!
//! The roster is a single JSON file rewritten atomically on every change.
//! Unlike the dose-log journal, a corrupted roster is reported rather than
//! replaced with an empty one, since that would silently drop medications.

use crate::{Error, Medication, Result};
use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// The set of medications registered for one owner, newest first
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Roster {
    pub medications: Vec<Medication>,
}

/// Partial update applied by [`Roster::edit`]; `None` keeps the current value
#[derive(Clone, Debug, Default)]
pub struct MedicationUpdate {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

impl Roster {
    /// Register a new medication and return it
    pub fn add(&mut self, name: &str, dosage: &str, frequency: &str) -> Result<&Medication> {
        let medication = Medication {
            id: Uuid::new_v4().to_string(),
            name: required("name", name)?,
            dosage: required("dosage", dosage)?,
            frequency: required("frequency", frequency)?,
            created_at: Utc::now(),
        };
        tracing::debug!("Adding medication {} ({})", medication.id, medication.name);

        self.medications.insert(0, medication);
        Ok(&self.medications[0])
    }

    /// Update fields of an existing medication
    pub fn edit(&mut self, id: &str, update: MedicationUpdate) -> Result<&Medication> {
        let medication = self
            .medications
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| Error::MedicationNotFound(id.to_string()))?;

        // Validate everything before touching the entry
        let name = update.name.as_deref().map(|v| required("name", v)).transpose()?;
        let dosage = update.dosage.as_deref().map(|v| required("dosage", v)).transpose()?;
        let frequency = update
            .frequency
            .as_deref()
            .map(|v| required("frequency", v))
            .transpose()?;

        if let Some(name) = name {
            medication.name = name;
        }
        if let Some(dosage) = dosage {
            medication.dosage = dosage;
        }
        if let Some(frequency) = frequency {
            medication.frequency = frequency;
        }

        tracing::debug!("Updated medication {}", id);
        Ok(medication)
    }

    /// Remove a medication. Its dose logs stay in the journal and are
    /// ignored by classification from then on.
    pub fn remove(&mut self, id: &str) -> Result<Medication> {
        let pos = self
            .medications
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| Error::MedicationNotFound(id.to_string()))?;

        tracing::debug!("Removing medication {}", id);
        Ok(self.medications.remove(pos))
    }

    pub fn get(&self, id: &str) -> Option<&Medication> {
        self.medications.iter().find(|m| m.id == id)
    }

    /// Load the roster from a file with shared locking
    ///
    /// Returns an empty roster if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No roster file found, starting with an empty roster");
            return Ok(Self::default());
        }

        let file = File::open(path)?;

        // Acquire shared lock for reading
        file.lock_shared()?;

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        let read = reader.read_to_string(&mut contents);
        file.unlock()?;
        read?;

        let roster = serde_json::from_str::<Roster>(&contents).map_err(|e| {
            tracing::warn!("Failed to parse roster file {:?}: {}", path, e);
            Error::Roster(format!("{} is corrupted: {}", path.display(), e))
        })?;

        tracing::debug!(
            "Loaded roster with {} medications from {:?}",
            roster.medications.len(),
            path
        );
        Ok(roster)
    }

    /// Save the roster to a file
    ///
    /// Atomically writes the roster by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path.parent().ok_or_else(|| {
            Error::Roster(format!("{} has no parent directory", path.display()))
        })?;
        std::fs::create_dir_all(parent)?;

        // Create unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(parent)?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;

        // Atomically replace old roster file
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved roster to {:?}", path);
        Ok(())
    }

    /// Load the roster, modify it, and save it back
    ///
    /// Writers are serialized by an exclusive lock on `<roster>.lock`, held
    /// from load to persist. The roster file itself is replaced by rename,
    /// so it cannot carry the lock. The closure's return value is passed
    /// through; nothing is saved if it fails.
    pub fn update<F, T>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&mut Roster) -> Result<T>,
    {
        let lock_path = lock_path(path);
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let lock = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        lock.lock_exclusive()?;

        let result = Self::load(path).and_then(|mut roster| {
            let out = f(&mut roster)?;
            roster.save(path)?;
            Ok(out)
        });

        lock.unlock()?;
        result
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}
