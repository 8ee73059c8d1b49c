use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use medtrack_core::adherence::{self, week_bounds};
use medtrack_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "medtrack")]
#[command(about = "Medication adherence tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use an alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Evaluate as if today were this date (yyyy-mm-dd)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new medication
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        dosage: String,
        #[arg(long)]
        frequency: String,
    },

    /// Change details of a medication
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        dosage: Option<String>,
        #[arg(long)]
        frequency: Option<String>,
    },

    /// Remove a medication from the roster
    Remove { id: String },

    /// List medications with today's status
    List,

    /// Mark medications as taken
    Take {
        /// Day to mark (defaults to today; future days are rejected)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Only mark this medication id (default: all not yet taken)
        #[arg(long)]
        medication: Option<String>,

        /// Photo proof to attach
        #[arg(long)]
        photo: Option<PathBuf>,
    },

    /// Show per-medication status for a day
    Day {
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show adherence dashboard (default)
    Stats,

    /// Show the monthly adherence calendar
    Calendar {
        /// Month to show (yyyy-mm, defaults to the current month)
        #[arg(long, value_parser = parse_month)]
        month: Option<(i32, u32)>,
    },

    /// Show this week's doses
    Activity,

    /// Roll up the dose journal into the CSV archive
    Rollup {
        /// Clean up processed journal files after rollup
        #[arg(long)]
        cleanup: bool,
    },

    /// Write a config file with default settings
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn parse_month(s: &str) -> std::result::Result<(i32, u32), String> {
    let parsed = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .map_err(|_| format!("expected yyyy-mm, got '{}'", s))?;
    Ok((parsed.year(), parsed.month()))
}

fn main() {
    medtrack_core::logging::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Must not require a loadable config
    if let Some(Commands::InitConfig { force }) = cli.command {
        return cmd_init_config(cli.config.as_deref(), force);
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    tracing::debug!("Using data directory {:?}, today {}", data_dir, today);
    let tracker = Tracker::new(data_dir, config);

    match cli.command {
        Some(Commands::Add {
            name,
            dosage,
            frequency,
        }) => cmd_add(&tracker, &name, &dosage, &frequency),
        Some(Commands::Edit {
            id,
            name,
            dosage,
            frequency,
        }) => cmd_edit(
            &tracker,
            &id,
            MedicationUpdate {
                name,
                dosage,
                frequency,
            },
        ),
        Some(Commands::Remove { id }) => cmd_remove(&tracker, &id),
        Some(Commands::List) => cmd_list(&tracker, today),
        Some(Commands::Take {
            date,
            medication,
            photo,
        }) => cmd_take(
            &tracker,
            date.unwrap_or(today),
            today,
            medication.as_deref(),
            photo,
        ),
        Some(Commands::Day { date }) => cmd_day(&tracker, date.unwrap_or(today), today),
        Some(Commands::Calendar { month }) => {
            let (year, month) = month.unwrap_or((today.year(), today.month()));
            cmd_calendar(&tracker, year, month, today)
        }
        Some(Commands::Activity) => cmd_activity(&tracker, today),
        Some(Commands::Rollup { cleanup }) => cmd_rollup(&tracker, cleanup),
        Some(Commands::Stats) | None => cmd_stats(&tracker, today),
        Some(Commands::InitConfig { force }) => cmd_init_config(cli.config.as_deref(), force),
    }
}

fn cmd_add(tracker: &Tracker, name: &str, dosage: &str, frequency: &str) -> Result<()> {
    let med = Roster::update(&tracker.paths().roster, |roster| {
        roster.add(name, dosage, frequency).cloned()
    })?;

    println!("✓ Added {} ({} - {})", med.name, med.dosage, med.frequency);
    println!("  id: {}", med.id);
    Ok(())
}

fn cmd_edit(tracker: &Tracker, id: &str, update: MedicationUpdate) -> Result<()> {
    let med = Roster::update(&tracker.paths().roster, |roster| {
        roster.edit(id, update).cloned()
    })?;

    println!("✓ Updated {} ({} - {})", med.name, med.dosage, med.frequency);
    Ok(())
}

fn cmd_remove(tracker: &Tracker, id: &str) -> Result<()> {
    let med = Roster::update(&tracker.paths().roster, |roster| roster.remove(id))?;

    println!("✓ Removed {}", med.name);
    Ok(())
}

fn cmd_list(tracker: &Tracker, today: NaiveDate) -> Result<()> {
    let snapshot = tracker.snapshot()?;
    if snapshot.medications.is_empty() {
        println!("No medications added yet. Use 'medtrack add' to start tracking.");
        return Ok(());
    }

    let index = snapshot.index();
    for med in &snapshot.medications {
        let badge = if index.is_taken(today, &med.id) {
            "Taken"
        } else {
            "Pending"
        };
        println!(
            "  [{:<7}] {}  {} - {}  ({})",
            badge, med.name, med.dosage, med.frequency, med.id
        );
    }
    Ok(())
}

fn cmd_take(
    tracker: &Tracker,
    date: NaiveDate,
    today: NaiveDate,
    medication: Option<&str>,
    photo: Option<PathBuf>,
) -> Result<()> {
    let target = match medication {
        Some(id) => MarkTarget::One(id),
        None => MarkTarget::All,
    };

    match tracker.mark_taken(date, today, target, photo.as_deref())? {
        MarkOutcome::AlreadyTaken => {
            println!("Already taken: all medications have been marked as taken for {}", date);
        }
        MarkOutcome::Marked(logs) => {
            let total = tracker.snapshot()?.medications.len();
            if medication.is_none() && logs.len() == total {
                println!("✓ All medications marked as taken for {}", date);
            } else {
                println!("✓ {} medication(s) marked as taken for {}", logs.len(), date);
            }
            if logs.first().is_some_and(|l| l.photo.is_some()) {
                println!("  Photo proof attached");
            }
        }
    }
    Ok(())
}

fn cmd_day(tracker: &Tracker, date: NaiveDate, today: NaiveDate) -> Result<()> {
    let snapshot = tracker.snapshot()?;
    let index = snapshot.index();

    if date == today {
        println!("Today's Medication ({})", date);
    } else {
        println!("Medication for {}", date.format("%B %-d, %Y"));
    }

    if snapshot.medications.is_empty() {
        println!("No medications added yet. Add your medications to start tracking.");
        return Ok(());
    }

    for med in &snapshot.medications {
        let badge = if index.is_taken(date, &med.id) {
            "Taken"
        } else {
            "Pending"
        };
        println!("  [{:<7}] {}  {} - {}", badge, med.name, med.dosage, med.frequency);
    }
    println!();

    let day = adherence::calendar_day(&snapshot.medications, &index, date, today);
    let c = &day.classification;
    match day.mark {
        CalendarMark::AllTaken => println!("✓ All medications taken for this day"),
        CalendarMark::SomeTaken => println!("! {} of {} medications taken", c.taken, c.total),
        CalendarMark::Pending => println!("… Medications pending for today"),
        CalendarMark::Missed => println!("✗ Medications not taken"),
        CalendarMark::Upcoming => println!("  Upcoming day"),
    }
    Ok(())
}

fn cmd_stats(tracker: &Tracker, today: NaiveDate) -> Result<()> {
    let snapshot = tracker.snapshot()?;
    let stats = compute_monthly_stats(
        &snapshot.medications,
        &snapshot.logs,
        today,
        tracker.config().stats.options(),
    );
    let today_status = classify_day(&snapshot.medications, &snapshot.index(), today).status;

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  ADHERENCE DASHBOARD  {}        │", today);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Day Streak:        {}", stats.current_streak);
    println!(
        "  Today's Status:    {}",
        if today_status == DayStatus::Full { "✓" } else { "○" }
    );
    println!("  Monthly Rate:      {}%", stats.adherence_rate);
    println!("  Missed This Month: {}", stats.missed_doses);
    println!(
        "  Taken This Week:   {} days ({} doses)",
        stats.taken_this_week, stats.doses_this_week
    );
    println!();
    Ok(())
}

fn cmd_calendar(tracker: &Tracker, year: i32, month: u32, today: NaiveDate) -> Result<()> {
    let days = tracker.calendar(year, month, today)?;
    let Some(first) = days.first() else {
        return Err(Error::Validation(format!("invalid month {}-{}", year, month)));
    };
    let first_date = first.classification.date;
    let week_start = tracker.config().stats.week_start;

    println!("{}", first_date.format("%B %Y"));

    let header: String = std::iter::successors(Some(week_start.weekday()), |d| Some(d.succ()))
        .take(7)
        .map(|d| format!("{:>4}", &d.to_string()[..2]))
        .collect();
    println!("{}", header);

    let lead = ((first_date.weekday().num_days_from_monday() + 7
        - week_start.weekday().num_days_from_monday())
        % 7) as usize;
    let mut line = "    ".repeat(lead);
    let mut col = lead;
    for day in &days {
        let symbol = match day.mark {
            CalendarMark::AllTaken => '✓',
            CalendarMark::SomeTaken => '~',
            CalendarMark::Missed => '✗',
            CalendarMark::Pending => '*',
            CalendarMark::Upcoming => ' ',
        };
        line.push_str(&format!("{:>3}{}", day.classification.date.day(), symbol));
        col += 1;
        if col == 7 {
            println!("{}", line.trim_end());
            line.clear();
            col = 0;
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }

    println!();
    println!("  ✓ all taken   ~ some taken   ✗ missed   * today");
    Ok(())
}

fn cmd_activity(tracker: &Tracker, today: NaiveDate) -> Result<()> {
    let activity = tracker.recent_activity(today)?;
    let (start, end) = week_bounds(today, tracker.config().stats.week_start);

    println!("Recent activity ({} to {})", start, end);
    if activity.is_empty() {
        println!("  No doses logged this week.");
        return Ok(());
    }

    for entry in &activity {
        println!(
            "  {}  {:>8}  {}{}",
            entry.date,
            entry.taken_at.with_timezone(&Local).format("%-I:%M %p"),
            entry.medication_name,
            if entry.has_photo { "  [photo]" } else { "" }
        );
    }
    Ok(())
}

fn cmd_rollup(tracker: &Tracker, cleanup: bool) -> Result<()> {
    let paths = tracker.paths();

    if !paths.journal.exists() {
        println!("No journal file found - nothing to roll up.");
        return Ok(());
    }

    tracing::debug!("Rolling up {:?} into {:?}", paths.journal, paths.archive);
    let count = medtrack_core::archive::journal_to_csv_and_archive(&paths.journal, &paths.archive)?;

    println!("✓ Rolled up {} dose logs to CSV", count);
    println!("  CSV: {}", paths.archive.display());

    if cleanup {
        let cleaned = medtrack_core::archive::cleanup_processed_journals(&paths.journal_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed journal files", cleaned);
        }
    }

    Ok(())
}

fn cmd_init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let target = path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_config_path);

    if target.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists (use --force to overwrite)",
            target.display()
        )));
    }

    let config = Config::default();
    match path {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }

    println!("✓ Wrote default config to {}", target.display());
    Ok(())
}
