//! Error types for Habit Streaks

use thiserror::Error;

/// Errors raised by the analytics engine.
///
/// The engine is total over well-typed inputs, so the only failure is an
/// integration error where an unknown periodicity reaches it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    #[error("Invalid periodicity: {0:?} (expected \"daily\" or \"weekly\")")]
    InvalidPeriodicity(String),
}

/// Errors raised by the habit tracker, its store and its configuration
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Habit not found: {0}")]
    HabitNotFound(String),

    #[error("Habit already exists: {0}")]
    DuplicateHabit(String),

    #[error("Habit {name:?} has already been completed in period {period}")]
    AlreadyCompleted { name: String, period: String },

    #[error("Habit name cannot be empty")]
    EmptyName,
}

pub type Result<T, E = TrackerError> = std::result::Result<T, E>;
