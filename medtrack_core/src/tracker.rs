//! Mark-taken workflow and dashboard queries over a data directory.
//!
//! [`plan_mark_taken`] decides which medications a "take" action should log;
//! [`Tracker`] ties that to the on-disk roster, journal and photo store.

use crate::adherence::{self, LogIndex};
use crate::archive::read_archive;
use crate::config::Config;
use crate::journal::{DoseLogSink, JsonlJournal};
use crate::roster::Roster;
use crate::store::{DataPaths, Snapshot};
use crate::{
    AdherenceStats, CalendarDay, DoseLog, Error, Medication, RecentActivity, Result,
};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Which medications a take action applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkTarget<'a> {
    /// Every roster medication not yet taken that day
    All,
    /// A single medication by id
    One(&'a str),
}

/// Result of a take action
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    /// Logs written by this action
    Marked(Vec<DoseLog>),
    /// Nothing left to mark for the date
    AlreadyTaken,
}

/// Select the medications a take action should log for `date`.
///
/// Returns an empty list when everything targeted is already taken.
/// Rejects an empty roster, unknown ids, and dates after `today`.
pub fn plan_mark_taken<'m>(
    medications: &'m [Medication],
    index: &LogIndex,
    date: NaiveDate,
    today: NaiveDate,
    target: MarkTarget<'_>,
) -> Result<Vec<&'m Medication>> {
    if medications.is_empty() {
        return Err(Error::NoMedications);
    }
    if !adherence::is_actionable(date, today) {
        return Err(Error::FutureDate(date));
    }

    let candidates: Vec<&Medication> = match target {
        MarkTarget::All => medications.iter().collect(),
        MarkTarget::One(id) => vec![medications
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| Error::MedicationNotFound(id.to_string()))?],
    };

    Ok(candidates
        .into_iter()
        .filter(|m| !index.is_taken(date, &m.id))
        .collect())
}

/// Append one log per medication, all sharing `photo`
pub fn record_doses<S: DoseLogSink>(
    sink: &mut S,
    medications: &[&Medication],
    date: NaiveDate,
    photo: Option<PathBuf>,
) -> Result<Vec<DoseLog>> {
    let logs: Vec<DoseLog> = medications
        .iter()
        .map(|m| DoseLog::new(m.id.as_str(), date).with_photo(photo.clone()))
        .collect();
    sink.append_all(&logs)?;
    Ok(logs)
}

/// An owner's data directory plus the settings that shape its statistics
pub struct Tracker {
    paths: DataPaths,
    config: Config,
}

impl Tracker {
    pub fn new(data_dir: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            paths: DataPaths::new(data_dir),
            config,
        }
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        Snapshot::load(&self.paths)
    }

    /// Mark medications taken for `date`, optionally attaching a photo proof
    ///
    /// Planning and appending happen under the journal's exclusive lock, so
    /// concurrent takes for the same day log each medication once.
    pub fn mark_taken(
        &self,
        date: NaiveDate,
        today: NaiveDate,
        target: MarkTarget<'_>,
        photo: Option<&Path>,
    ) -> Result<MarkOutcome> {
        let roster = Roster::load(&self.paths.roster)?;
        if roster.medications.is_empty() {
            return Err(Error::NoMedications);
        }

        let mut journal = JsonlJournal::new(&self.paths.journal).lock()?;
        let mut logs = journal.read_logs()?;
        logs.extend(read_archive(&self.paths.archive)?);
        let index = LogIndex::build(&logs);

        let pending = plan_mark_taken(&roster.medications, &index, date, today, target)?;

        if pending.is_empty() {
            tracing::info!("All targeted medications already taken on {}", date);
            return Ok(MarkOutcome::AlreadyTaken);
        }

        let stored_photo = photo
            .map(|src| crate::photo::attach_photo(&self.paths.photos, src, &self.config.photos))
            .transpose()?;

        let logs = record_doses(&mut journal, &pending, date, stored_photo)?;

        tracing::info!("Marked {} medication(s) taken on {}", logs.len(), date);
        Ok(MarkOutcome::Marked(logs))
    }

    pub fn stats(&self, today: NaiveDate) -> Result<AdherenceStats> {
        let snapshot = self.snapshot()?;
        Ok(adherence::compute_monthly_stats(
            &snapshot.medications,
            &snapshot.logs,
            today,
            self.config.stats.options(),
        ))
    }

    pub fn calendar(&self, year: i32, month: u32, today: NaiveDate) -> Result<Vec<CalendarDay>> {
        let snapshot = self.snapshot()?;
        Ok(adherence::calendar_month(
            &snapshot.medications,
            &snapshot.index(),
            year,
            month,
            today,
        ))
    }

    pub fn recent_activity(&self, today: NaiveDate) -> Result<Vec<RecentActivity>> {
        let snapshot = self.snapshot()?;
        Ok(adherence::recent_activity(
            &snapshot.medications,
            &snapshot.logs,
            today,
            self.config.stats.week_start,
        ))
    }
}
