//! Habit Streaks - calendar-aware streak and adherence analytics for habits
//!
//! Habit Streaks turns a habit's completion log into adherence metrics through
//! a one-way pipeline: raw timestamps → period keys → streak / window
//! statistics → ranked reports.
//!
//! ## Modules
//!
//! - **Engine**: [`period`], [`streak`] and [`window`] are pure functions over
//!   a habit's periodicity, its completions and an explicit `now`
//! - **Facade**: [`analytics`] computes per-habit reports and the
//!   struggling-habit ranking
//! - **Tracker**: [`tracker`] and [`store`] manage habits and persist them as JSON

pub mod analytics;
pub mod config;
pub mod error;
pub mod logging;
pub mod period;
pub mod store;
pub mod streak;
pub mod tracker;
pub mod types;
pub mod window;

pub use analytics::{struggling_habits, HabitAnalytics, DEFAULT_WINDOW_DAYS};
pub use error::{AnalyticsError, TrackerError};
pub use period::{period_key, periods_between, PeriodKey, PeriodLog};
pub use store::JsonStore;
pub use streak::{current_streak, longest_streak, StreakState};
pub use tracker::HabitTracker;
pub use types::{Habit, HabitReport, Periodicity, StrugglingHabit};
pub use window::missed_periods;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Program name used in reports
pub const PRODUCER_NAME: &str = "habit-streaks";
