//! Recent activity feed for the current week.

use super::week_bounds;
use crate::{DoseLog, Medication, RecentActivity, WeekStart};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Dose logs dated within the week containing `today`, newest first,
/// joined with medication names. Logs whose medication is no longer in
/// the roster are skipped.
pub fn recent_activity(
    medications: &[Medication],
    logs: &[DoseLog],
    today: NaiveDate,
    week_start: WeekStart,
) -> Vec<RecentActivity> {
    let (start, end) = week_bounds(today, week_start);
    let names: HashMap<&str, &str> = medications
        .iter()
        .map(|m| (m.id.as_str(), m.name.as_str()))
        .collect();

    let mut activity: Vec<RecentActivity> = logs
        .iter()
        .filter(|log| log.date >= start && log.date <= end)
        .filter_map(|log| {
            let name = names.get(log.medication_id.as_str())?;
            Some(RecentActivity {
                date: log.date,
                medication_id: log.medication_id.clone(),
                medication_name: (*name).to_string(),
                taken_at: log.created_at,
                has_photo: log.photo.is_some(),
            })
        })
        .collect();

    activity.sort_by(|a, b| b.date.cmp(&a.date).then(b.taken_at.cmp(&a.taken_at)));
    activity
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use std::path::PathBuf;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn med(id: &str, name: &str) -> Medication {
        Medication {
            id: id.into(),
            name: name.into(),
            dosage: "20mg".into(),
            frequency: "daily".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_activity_filters_to_week_and_sorts_newest_first() {
        let meds = vec![med("a", "Lisinopril"), med("b", "Metformin")];
        let mut early = DoseLog::new("a", date("2024-06-10"));
        early.created_at = Utc::now() - Duration::hours(2);
        let late = DoseLog::new("b", date("2024-06-10"))
            .with_photo(Some(PathBuf::from("photos/x.jpg")));
        let logs = vec![
            DoseLog::new("a", date("2024-06-08")), // previous week
            early,
            late,
            DoseLog::new("a", date("2024-06-12")),
        ];

        let activity = recent_activity(&meds, &logs, date("2024-06-12"), WeekStart::Sunday);

        assert_eq!(activity.len(), 3);
        assert_eq!(activity[0].date, date("2024-06-12"));
        assert_eq!(activity[1].medication_name, "Metformin");
        assert!(activity[1].has_photo);
        assert_eq!(activity[2].medication_name, "Lisinopril");
        assert!(!activity[2].has_photo);
    }

    #[test]
    fn test_activity_skips_unknown_medications() {
        let logs = vec![DoseLog::new("gone", date("2024-06-12"))];
        let activity = recent_activity(&[], &logs, date("2024-06-12"), WeekStart::Sunday);
        assert!(activity.is_empty());
    }

    #[test]
    fn test_activity_at_date_range_edges() {
        let meds = vec![med("a", "Lisinopril")];
        for today in [NaiveDate::MIN, NaiveDate::MAX] {
            let logs = vec![DoseLog::new("a", today)];
            let activity = recent_activity(&meds, &logs, today, WeekStart::Monday);
            assert_eq!(activity.len(), 1);
            assert_eq!(activity[0].date, today);
        }
    }
}
