//! Integration tests for the medtrack binary.
//!
//! These tests verify end-to-end behavior including:
//! - Roster management (add, edit, remove, list)
//! - Marking doses taken, with and without photo proof
//! - Dashboard statistics and calendar output
//! - Journal rollup to CSV

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory with an empty config file
fn setup_test_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("config.toml"), "").expect("Failed to write config");
    dir
}

/// CLI invocation bound to the test's data directory and config
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("medtrack"));
    cmd.arg("--data-dir")
        .arg(dir.join("data"))
        .arg("--config")
        .arg(dir.join("config.toml"));
    cmd
}

fn add_med(dir: &Path, name: &str) {
    cli(dir)
        .args(["add", "--name", name, "--dosage", "10mg", "--frequency", "daily"])
        .assert()
        .success();
}

/// Medication ids in roster order (newest first)
fn roster_ids(dir: &Path) -> Vec<String> {
    let content = fs::read_to_string(dir.join("data/roster.json")).expect("read roster");
    let roster: Value = serde_json::from_str(&content).expect("parse roster");
    roster["medications"]
        .as_array()
        .expect("medications array")
        .iter()
        .map(|m| m["id"].as_str().expect("id").to_string())
        .collect()
}

fn take(dir: &Path, today: &str, extra: &[&str]) -> assert_cmd::assert::Assert {
    cli(dir).args(["--today", today, "take"]).args(extra).assert()
}

#[test]
fn test_cli_help() {
    let dir = setup_test_dir();
    cli(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Medication adherence tracker"));
}

#[test]
fn test_add_and_list() {
    let dir = setup_test_dir();

    cli(dir.path())
        .args(["add", "--name", "Lisinopril", "--dosage", "10mg", "--frequency", "once daily"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Lisinopril"));

    assert!(dir.path().join("data/roster.json").exists());

    cli(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Lisinopril"))
        .stdout(predicate::str::contains("Pending"));
}

#[test]
fn test_list_empty_roster() {
    let dir = setup_test_dir();
    cli(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No medications added yet"));
}

#[test]
fn test_add_rejects_blank_fields() {
    let dir = setup_test_dir();
    cli(dir.path())
        .args(["add", "--name", "  ", "--dosage", "10mg", "--frequency", "daily"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not be empty"));
}

#[test]
fn test_edit_and_remove() {
    let dir = setup_test_dir();
    add_med(dir.path(), "Aspirin");
    let id = roster_ids(dir.path()).remove(0);

    cli(dir.path())
        .args(["edit", &id, "--dosage", "81mg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Aspirin (81mg - daily)"));

    cli(dir.path())
        .args(["remove", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed Aspirin"));

    assert!(roster_ids(dir.path()).is_empty());

    cli(dir.path())
        .args(["remove", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Medication not found"));
}

#[test]
fn test_take_without_medications_fails() {
    let dir = setup_test_dir();
    take(dir.path(), "2024-06-04", &[])
        .failure()
        .stderr(predicate::str::contains("No medications registered"));
}

#[test]
fn test_take_all_then_already_taken() {
    let dir = setup_test_dir();
    add_med(dir.path(), "Aspirin");
    add_med(dir.path(), "Metformin");

    take(dir.path(), "2024-06-04", &[])
        .success()
        .stdout(predicate::str::contains("All medications marked as taken"));

    take(dir.path(), "2024-06-04", &[])
        .success()
        .stdout(predicate::str::contains("Already taken"));

    let journal = fs::read_to_string(dir.path().join("data/journal/doses.jsonl")).unwrap();
    assert_eq!(journal.lines().count(), 2);
    assert!(journal.contains(r#""date":"2024-06-04""#));
}

#[test]
fn test_take_future_date_rejected() {
    let dir = setup_test_dir();
    add_med(dir.path(), "Aspirin");

    take(dir.path(), "2024-06-04", &["--date", "2024-06-05"])
        .failure()
        .stderr(predicate::str::contains("future date"));
}

#[test]
fn test_streak_and_day_view() {
    let dir = setup_test_dir();
    add_med(dir.path(), "Aspirin");
    add_med(dir.path(), "Metformin");
    let ids = roster_ids(dir.path());

    for date in ["2024-06-01", "2024-06-02", "2024-06-03"] {
        take(dir.path(), "2024-06-04", &["--date", date]).success();
    }
    take(dir.path(), "2024-06-04", &["--medication", &ids[0]])
        .success()
        .stdout(predicate::str::contains("1 medication(s) marked as taken"));

    cli(dir.path())
        .args(["--today", "2024-06-04", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Day Streak:        0"))
        .stdout(predicate::str::contains("Monthly Rate:      13%"))
        .stdout(predicate::str::contains("Missed This Month: 26"));

    cli(dir.path())
        .args(["--today", "2024-06-03", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Day Streak:        3"));

    cli(dir.path())
        .args(["--today", "2024-06-04", "day"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 of 2 medications taken"));
}

#[test]
fn test_default_command_is_stats() {
    let dir = setup_test_dir();
    cli(dir.path())
        .args(["--today", "2024-06-04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Day Streak:        0"))
        .stdout(predicate::str::contains("Monthly Rate:      0%"));
}

#[test]
fn test_calendar_output() {
    let dir = setup_test_dir();
    add_med(dir.path(), "Aspirin");
    take(dir.path(), "2024-06-04", &["--date", "2024-06-02"]).success();

    cli(dir.path())
        .args(["--today", "2024-06-04", "calendar", "--month", "2024-06"])
        .assert()
        .success()
        .stdout(predicate::str::contains("June 2024"))
        .stdout(predicate::str::contains("2✓"))
        .stdout(predicate::str::contains("3✗"))
        .stdout(predicate::str::contains("4*"));
}

#[test]
fn test_calendar_rejects_bad_month() {
    let dir = setup_test_dir();
    cli(dir.path())
        .args(["calendar", "--month", "2024-13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected yyyy-mm"));
}

#[test]
fn test_photo_proof_in_activity() {
    let dir = setup_test_dir();
    add_med(dir.path(), "Aspirin");
    let photo = dir.path().join("proof.jpg");
    fs::write(&photo, b"jpeg bytes").unwrap();

    take(dir.path(), "2024-06-12", &["--photo", photo.to_str().unwrap()])
        .success()
        .stdout(predicate::str::contains("Photo proof attached"));

    cli(dir.path())
        .args(["--today", "2024-06-12", "activity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Aspirin"))
        .stdout(predicate::str::contains("[photo]"));

    let stored: Vec<_> = fs::read_dir(dir.path().join("data/photos"))
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(stored.len(), 1);
}

#[test]
fn test_photo_rejects_non_image() {
    let dir = setup_test_dir();
    add_med(dir.path(), "Aspirin");
    let notes = dir.path().join("notes.txt");
    fs::write(&notes, b"not an image").unwrap();

    take(dir.path(), "2024-06-12", &["--photo", notes.to_str().unwrap()])
        .failure()
        .stderr(predicate::str::contains("Unsupported photo type"));

    let journal = fs::read_to_string(dir.path().join("data/journal/doses.jsonl")).unwrap_or_default();
    assert!(journal.trim().is_empty(), "No dose should be logged: {}", journal);
}

#[test]
fn test_week_start_from_config() {
    let dir = setup_test_dir();
    add_med(dir.path(), "Aspirin");
    // Sunday 2024-06-09 and Monday 2024-06-10
    take(dir.path(), "2024-06-10", &["--date", "2024-06-09"]).success();
    take(dir.path(), "2024-06-10", &[]).success();

    cli(dir.path())
        .args(["--today", "2024-06-10", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Taken This Week:   2 days"));

    fs::write(
        dir.path().join("config.toml"),
        "[stats]\nweek_start = \"monday\"\n",
    )
    .unwrap();

    cli(dir.path())
        .args(["--today", "2024-06-10", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Taken This Week:   1 days"));
}

#[test]
fn test_rollup_creates_csv_and_keeps_history() {
    let dir = setup_test_dir();
    add_med(dir.path(), "Aspirin");
    for date in ["2024-06-01", "2024-06-02", "2024-06-03"] {
        take(dir.path(), "2024-06-03", &["--date", date]).success();
    }

    cli(dir.path())
        .arg("rollup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rolled up 3 dose logs"));

    let csv_content = fs::read_to_string(dir.path().join("data/doses.csv")).unwrap();
    assert!(csv_content.contains("id,medication_id,date"));

    // Archived logs still count toward the streak
    cli(dir.path())
        .args(["--today", "2024-06-03", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Day Streak:        3"));
}

#[test]
fn test_rollup_with_cleanup() {
    let dir = setup_test_dir();
    add_med(dir.path(), "Aspirin");
    take(dir.path(), "2024-06-03", &[]).success();

    cli(dir.path())
        .args(["rollup", "--cleanup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaned up 1 processed journal"));

    let leftovers: Vec<_> = fs::read_dir(dir.path().join("data/journal"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".processed"))
        .collect();
    assert!(leftovers.is_empty());

    // The live journal stays in place, emptied, for later takes
    let journal = fs::read_to_string(dir.path().join("data/journal/doses.jsonl")).unwrap();
    assert!(journal.is_empty());
}

#[test]
fn test_empty_rollup() {
    let dir = setup_test_dir();
    cli(dir.path())
        .arg("rollup")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to roll up"));
}

#[test]
fn test_calendar_monday_week_start() {
    let dir = setup_test_dir();
    fs::write(
        dir.path().join("config.toml"),
        "[stats]\nweek_start = \"monday\"\n",
    )
    .unwrap();

    // June 2024 starts on a Saturday: five blank cells before day 1
    cli(dir.path())
        .args(["--today", "2024-06-04", "calendar", "--month", "2024-06"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  Mo  Tu  We  Th  Fr  Sa  Su"))
        .stdout(predicate::str::contains(format!("\n{}1", " ".repeat(22))));
}

#[test]
fn test_init_config_writes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    cli(dir.path())
        .arg("init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("week_start"));
    assert!(content.contains("max_bytes"));

    // Refuses to clobber without --force
    cli(dir.path())
        .arg("init-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    cli(dir.path())
        .args(["init-config", "--force"])
        .assert()
        .success();

    // The written file loads back as a valid config
    cli(dir.path())
        .arg("list")
        .assert()
        .success();
}
