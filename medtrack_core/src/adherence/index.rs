//! Per-date index of medications marked taken.

use crate::DoseLog;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

/// Mapping from calendar date to the set of medication ids logged that date.
///
/// Logging the same medication twice on one date counts once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogIndex {
    by_date: BTreeMap<NaiveDate, HashSet<String>>,
}

impl LogIndex {
    pub fn build<'a, I>(logs: I) -> Self
    where
        I: IntoIterator<Item = &'a DoseLog>,
    {
        let mut index = Self::default();
        for log in logs {
            index.insert(log.date, &log.medication_id);
        }
        index
    }

    /// Record a medication as taken on `date`. Returns false if it was already recorded.
    pub fn insert(&mut self, date: NaiveDate, medication_id: &str) -> bool {
        self.by_date
            .entry(date)
            .or_default()
            .insert(medication_id.to_string())
    }

    pub fn taken_on(&self, date: NaiveDate) -> Option<&HashSet<String>> {
        self.by_date.get(&date)
    }

    pub fn is_taken(&self, date: NaiveDate, medication_id: &str) -> bool {
        self.by_date
            .get(&date)
            .is_some_and(|ids| ids.contains(medication_id))
    }

    /// Distinct dates with a log in `[start, end]`
    pub fn count_dates_between(&self, start: NaiveDate, end: NaiveDate) -> usize {
        if start > end {
            return 0;
        }
        self.by_date.range(start..=end).count()
    }

    /// Number of distinct dates in the index
    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}
