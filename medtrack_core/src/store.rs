//! Owner-scoped data directory layout and snapshot loading.
//!
//! One data directory holds everything for one owner:
//!
//! ```text
//! <data_dir>/roster.json           medications
//! <data_dir>/journal/doses.jsonl   live dose-log journal
//! <data_dir>/doses.csv             rolled-up archive
//! <data_dir>/photos/               photo proofs
//! ```

use crate::adherence::LogIndex;
use crate::roster::Roster;
use crate::{DoseLog, Medication, Result};
use std::path::PathBuf;

/// File locations inside a data directory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataPaths {
    pub data_dir: PathBuf,
    pub roster: PathBuf,
    pub journal_dir: PathBuf,
    pub journal: PathBuf,
    pub archive: PathBuf,
    pub photos: PathBuf,
}

impl DataPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let journal_dir = data_dir.join("journal");
        Self {
            roster: data_dir.join("roster.json"),
            journal: journal_dir.join("doses.jsonl"),
            archive: data_dir.join("doses.csv"),
            photos: data_dir.join("photos"),
            journal_dir,
            data_dir,
        }
    }
}

/// Point-in-time view of an owner's roster and dose logs
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub medications: Vec<Medication>,
    pub logs: Vec<DoseLog>,
}

impl Snapshot {
    /// Read the roster and every dose log (journal and archive)
    pub fn load(paths: &DataPaths) -> Result<Self> {
        let roster = Roster::load(&paths.roster)?;
        let logs = crate::history::load_all_logs(&paths.journal, &paths.archive)?;
        Ok(Self {
            medications: roster.medications,
            logs,
        })
    }

    pub fn index(&self) -> LogIndex {
        LogIndex::build(&self.logs)
    }
}
