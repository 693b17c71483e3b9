//! Habits CLI - Command-line interface for Habit Streaks
//!
//! Commands:
//! - add / delete: manage tracked habits
//! - complete: record a completion
//! - list / streak: show streak statistics
//! - struggling: rank habits by missed periods
//! - doctor: diagnose configuration and data file health

use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use habit_streaks::analytics::{self, HabitAnalytics};
use habit_streaks::config::Config;
use habit_streaks::streak::{self, StreakState};
use habit_streaks::types::{HabitReport, Periodicity, StrugglingHabit};
use habit_streaks::{logging, JsonStore, TrackerError, PRODUCER_NAME, VERSION};

/// Habits - streak and adherence analytics for recurring habits
#[derive(Parser)]
#[command(name = "habits")]
#[command(version = VERSION)]
#[command(about = "Track habits and analyse streaks", long_about = None)]
struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/habit-streaks/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Habit data file (overrides the config file)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Reference instant for analytics, local time (defaults to now)
    #[arg(long, global = true, value_parser = parse_timestamp)]
    now: Option<NaiveDateTime>,

    /// Log filter directive (overrides the config file; RUST_LOG wins)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new habit
    Add {
        /// Unique habit name
        name: String,

        /// daily or weekly
        #[arg(short, long, value_parser = parse_periodicity)]
        periodicity: Periodicity,

        /// Free-form description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Delete a habit and its history
    Delete {
        name: String,
    },

    /// Mark a habit as completed
    Complete {
        name: String,

        /// Completion time, local (defaults to the reference instant)
        #[arg(long, value_parser = parse_timestamp)]
        at: Option<NaiveDateTime>,
    },

    /// List habits with their current and longest streaks
    List {
        /// Only show habits with this periodicity
        #[arg(short, long, value_parser = parse_periodicity)]
        periodicity: Option<Periodicity>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show streak details for one habit
    Streak {
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rank habits by missed periods in a trailing window
    Struggling {
        /// Window length in days (overrides the config file)
        #[arg(short, long)]
        window_days: Option<u32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and data file health
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

/// Resolved settings shared by every command
struct Context {
    config_path: PathBuf,
    config: Config,
    store: JsonStore,
    now: NaiveDateTime,
}

fn run(cli: Cli) -> Result<(), HabitsCliError> {
    let config_path = cli.config.unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&config_path)?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    logging::init(&config.logging);

    let data_file = cli.data_file.unwrap_or_else(|| config.data_file());
    let now = cli.now.unwrap_or_else(|| Local::now().naive_local());
    tracing::debug!(data_file = %data_file.display(), %now, "resolved context");

    let ctx = Context {
        config_path,
        store: JsonStore::new(data_file),
        config,
        now,
    };

    match cli.command {
        Commands::Add {
            name,
            periodicity,
            description,
        } => cmd_add(&ctx, &name, periodicity, &description),
        Commands::Delete { name } => cmd_delete(&ctx, &name),
        Commands::Complete { name, at } => cmd_complete(&ctx, &name, at.unwrap_or(ctx.now)),
        Commands::List { periodicity, json } => cmd_list(&ctx, periodicity, wants_json(json)),
        Commands::Streak { name, json } => cmd_streak(&ctx, &name, wants_json(json)),
        Commands::Struggling { window_days, json } => {
            let window_days =
                window_days.unwrap_or(ctx.config.analytics.struggling_window_days);
            cmd_struggling(&ctx, window_days, wants_json(json))
        }
        Commands::Doctor { json } => cmd_doctor(&ctx, wants_json(json)),
    }
}

/// JSON when requested or when stdout is piped
fn wants_json(flag: bool) -> bool {
    flag || !atty::is(atty::Stream::Stdout)
}

fn cmd_add(
    ctx: &Context,
    name: &str,
    periodicity: Periodicity,
    description: &str,
) -> Result<(), HabitsCliError> {
    let mut tracker = ctx.store.load()?;
    tracker.add_habit(name, description, periodicity, ctx.now)?;
    ctx.store.save(&tracker)?;
    println!("Habit '{}' created ({}).", name.trim(), periodicity);
    Ok(())
}

fn cmd_delete(ctx: &Context, name: &str) -> Result<(), HabitsCliError> {
    let mut tracker = ctx.store.load()?;
    if !tracker.delete_habit(name) {
        return Err(TrackerError::HabitNotFound(name.to_string()).into());
    }
    ctx.store.save(&tracker)?;
    println!("Habit '{}' deleted.", name);
    Ok(())
}

fn cmd_complete(ctx: &Context, name: &str, at: NaiveDateTime) -> Result<(), HabitsCliError> {
    let mut tracker = ctx.store.load()?;
    let habit = tracker.complete_habit(name, at)?;
    let current = analytics::current_streak(habit, ctx.now);
    let unit = habit.periodicity.unit();
    ctx.store.save(&tracker)?;
    println!("Habit '{}' marked as completed. Current streak: {} {}.", name, current, unit);
    Ok(())
}

fn cmd_list(
    ctx: &Context,
    periodicity: Option<Periodicity>,
    json: bool,
) -> Result<(), HabitsCliError> {
    let tracker = ctx.store.load()?;
    let runner = HabitAnalytics::with_window(ctx.config.analytics.struggling_window_days);

    let reports: Vec<HabitReport> = tracker
        .habits()
        .iter()
        .filter(|habit| periodicity.map_or(true, |p| habit.periodicity == p))
        .map(|habit| runner.report(habit, ctx.now))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    if reports.is_empty() {
        println!("No habits found.");
        return Ok(());
    }

    println!("Current Habits");
    println!("==============");
    for report in &reports {
        let unit = report.periodicity.unit();
        println!("{} ({})", report.name, report.periodicity);
        println!("  Current streak: {} {}", report.current_streak, unit);
        println!("  Longest streak: {} {}", report.longest_streak, unit);
        match report.last_completed {
            Some(ts) => println!("  Last completed: {}", ts.format("%Y-%m-%d %H:%M:%S")),
            None => println!("  Not completed yet."),
        }
    }
    Ok(())
}

fn cmd_streak(ctx: &Context, name: &str, json: bool) -> Result<(), HabitsCliError> {
    let tracker = ctx.store.load()?;
    let habit = tracker
        .get(name)
        .ok_or_else(|| TrackerError::HabitNotFound(name.to_string()))?;

    let log = analytics::period_log(habit, ctx.now);
    let report = StreakReport {
        name: habit.name.clone(),
        periodicity: habit.periodicity,
        state: streak::streak_state(&log, ctx.now),
        current_streak: streak::current_streak(&log, ctx.now),
        longest_streak: streak::longest_streak(&log),
        periods_completed: log.len(),
        first_period: log.first().map(ToString::to_string),
        last_period: log.last().map(ToString::to_string),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let unit = report.periodicity.unit();
    println!("Streak: {} ({})", report.name, report.periodicity);
    let state = match report.state {
        StreakState::NoHistory => "no completions yet".to_string(),
        StreakState::Broken => "broken (nothing recorded this period)".to_string(),
        StreakState::Active(n) => format!("active for {} {}", n, unit),
    };
    println!("  State:          {}", state);
    println!("  Longest streak: {} {}", report.longest_streak, unit);
    println!("  Periods done:   {}", report.periods_completed);
    if let (Some(first), Some(last)) = (&report.first_period, &report.last_period) {
        println!("  History:        {} .. {}", first, last);
    }
    Ok(())
}

fn cmd_struggling(ctx: &Context, window_days: u32, json: bool) -> Result<(), HabitsCliError> {
    if window_days == 0 {
        return Err(HabitsCliError::InvalidArgument(
            "--window-days must be positive".to_string(),
        ));
    }

    let tracker = ctx.store.load()?;
    let ranked: Vec<StrugglingHabit> = tracker.struggling(window_days, ctx.now);

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    if ranked.is_empty() {
        println!("No habits were missed in the last {} days.", window_days);
        return Ok(());
    }

    println!("Most Frequently Missed (last {} days)", window_days);
    println!("=====================================");
    for entry in &ranked {
        println!(
            "  - {}: {} {} missed",
            entry.name,
            entry.missed_periods,
            entry.periodicity.unit()
        );
    }
    Ok(())
}

fn cmd_doctor(ctx: &Context, json: bool) -> Result<(), HabitsCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(if ctx.config_path.exists() {
        DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Ok,
            message: format!("Config loaded from {}", ctx.config_path.display()),
        }
    } else {
        DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Warning,
            message: format!("No config at {}, using defaults", ctx.config_path.display()),
        }
    });

    checks.push(check_data_file(ctx.store.path()));

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: VERSION.to_string(),
        now: ctx.now,
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Habits Doctor Report");
        println!("====================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("Now:      {}", report.now.format("%Y-%m-%d %H:%M:%S"));
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(HabitsCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn check_data_file(path: &Path) -> DoctorCheck {
    let name = "data_file".to_string();
    if !path.exists() {
        return DoctorCheck {
            name,
            status: CheckStatus::Warning,
            message: format!("{} does not exist yet", path.display()),
        };
    }

    match fs::read_to_string(path) {
        Ok(content) => match JsonStore::from_json(&content) {
            Ok(tracker) => DoctorCheck {
                name,
                status: CheckStatus::Ok,
                message: format!("{} habits in {}", tracker.len(), path.display()),
            },
            Err(e) => DoctorCheck {
                name,
                status: CheckStatus::Error,
                message: format!("Invalid data file: {}", e),
            },
        },
        Err(e) => DoctorCheck {
            name,
            status: CheckStatus::Error,
            message: format!("Cannot read data file: {}", e),
        },
    }
}

// Argument parsers

fn parse_periodicity(s: &str) -> Result<Periodicity, String> {
    s.parse().map_err(|e: habit_streaks::AnalyticsError| e.to_string())
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    for format in FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(ts);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .ok_or_else(|| format!("invalid timestamp {:?} (expected YYYY-MM-DD[THH:MM[:SS]])", s))
}

// Error types

#[derive(Debug)]
enum HabitsCliError {
    Tracker(TrackerError),
    Json(serde_json::Error),
    InvalidArgument(String),
    DoctorFailed,
}

impl From<TrackerError> for HabitsCliError {
    fn from(e: TrackerError) -> Self {
        HabitsCliError::Tracker(e)
    }
}

impl From<serde_json::Error> for HabitsCliError {
    fn from(e: serde_json::Error) -> Self {
        HabitsCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<HabitsCliError> for CliError {
    fn from(e: HabitsCliError) -> Self {
        match e {
            HabitsCliError::Tracker(e) => {
                let (code, hint) = match &e {
                    TrackerError::Analytics(_) => (
                        "INVALID_PERIODICITY",
                        Some("Periodicity must be 'daily' or 'weekly'"),
                    ),
                    TrackerError::Json(_) => {
                        ("DATA_ERROR", Some("Run 'habits doctor' to inspect the data file"))
                    }
                    TrackerError::Io(_) => ("IO_ERROR", Some("Check file paths and permissions")),
                    TrackerError::Config(_) => ("CONFIG_ERROR", Some("Fix the config file and retry")),
                    TrackerError::HabitNotFound(_) => {
                        ("HABIT_NOT_FOUND", Some("Run 'habits list' to see existing habits"))
                    }
                    TrackerError::DuplicateHabit(_) => ("DUPLICATE_HABIT", None),
                    TrackerError::AlreadyCompleted { .. } => ("ALREADY_COMPLETED", None),
                    TrackerError::EmptyName => ("EMPTY_NAME", None),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: hint.map(str::to_string),
                }
            }
            HabitsCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            HabitsCliError::InvalidArgument(msg) => CliError {
                code: "INVALID_ARGUMENT".to_string(),
                message: msg,
                hint: None,
            },
            HabitsCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct StreakReport {
    name: String,
    periodicity: Periodicity,
    state: StreakState,
    current_streak: u32,
    longest_streak: u32,
    periods_completed: usize,
    first_period: Option<String>,
    last_period: Option<String>,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    now: NaiveDateTime,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
