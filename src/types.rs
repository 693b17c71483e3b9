//! Core types for Habit Streaks
//!
//! This module defines the data that flows through the analytics engine:
//! a habit's periodicity, its completion log, and the per-habit reports
//! produced from them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyticsError;

/// Cadence that defines one schedulable unit for a habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Periodicity {
    /// One calendar day
    Daily,
    /// One ISO 8601 week (Monday to Sunday)
    Weekly,
}

impl Periodicity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Periodicity::Daily => "daily",
            Periodicity::Weekly => "weekly",
        }
    }

    /// Human-readable unit for counts ("days" / "weeks")
    pub fn unit(&self) -> &'static str {
        match self {
            Periodicity::Daily => "days",
            Periodicity::Weekly => "weeks",
        }
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Periodicity {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Periodicity::Daily),
            "weekly" => Ok(Periodicity::Weekly),
            _ => Err(AnalyticsError::InvalidPeriodicity(s.to_string())),
        }
    }
}

impl TryFrom<String> for Periodicity {
    type Error = AnalyticsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Periodicity> for String {
    fn from(value: Periodicity) -> Self {
        value.as_str().to_string()
    }
}

/// A tracked habit and its append-only completion log.
///
/// Timestamps are local wall-clock instants as recorded by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique habit name, used as its identifier
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Fixed at creation
    pub periodicity: Periodicity,
    /// When the habit was created
    #[serde(rename = "creation_date")]
    pub created_at: NaiveDateTime,
    /// Most recent completion, if any
    #[serde(default)]
    pub last_completed: Option<NaiveDateTime>,
    /// Completion timestamps, kept in ascending order by the tracker
    #[serde(default)]
    pub completions: Vec<NaiveDateTime>,
}

impl Habit {
    /// Create a habit with an empty completion log
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        periodicity: Periodicity,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            periodicity,
            created_at,
            last_completed: None,
            completions: Vec::new(),
        }
    }

    /// Append completions, keeping the log sorted
    pub fn with_completions(mut self, completions: impl IntoIterator<Item = NaiveDateTime>) -> Self {
        self.completions.extend(completions);
        self.completions.sort();
        self.last_completed = self.completions.last().copied();
        self
    }
}

/// Computed statistics for a single habit at a reference instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitReport {
    pub name: String,
    pub periodicity: Periodicity,
    /// Unbroken run ending in the current period
    pub current_streak: u32,
    /// Longest run ever observed up to the reference instant
    pub longest_streak: u32,
    /// Periods without a completion inside the adherence window
    pub missed_periods: u32,
    /// Adherence window length in days
    pub window_days: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_completed: Option<NaiveDateTime>,
}

/// Entry in the struggling-habit ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrugglingHabit {
    pub name: String,
    pub periodicity: Periodicity,
    pub missed_periods: u32,
}
