//! JSON persistence for habit records
//!
//! The store is the only place that reads or writes the data file. Loading
//! tolerates a missing or damaged file by starting empty; an unknown
//! periodicity in an otherwise valid file is an error, never a default.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AnalyticsError, Result, TrackerError};
use crate::tracker::HabitTracker;
use crate::types::Periodicity;

/// File-backed store holding a JSON array of habit records
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all habits from disk
    pub fn load(&self) -> Result<HabitTracker> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "data file missing, starting empty");
            return Ok(HabitTracker::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            tracing::warn!(path = %self.path.display(), "data file is empty, starting with no habits");
            return Ok(HabitTracker::new());
        }

        match Self::from_json(&content) {
            Ok(tracker) => {
                tracing::debug!(path = %self.path.display(), habits = tracker.len(), "loaded habits");
                Ok(tracker)
            }
            Err(TrackerError::Json(e)) if e.is_syntax() || e.is_eof() => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "data file is corrupted, starting with no habits"
                );
                Ok(HabitTracker::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Write all habits to disk as pretty-printed JSON
    pub fn save(&self, tracker: &HabitTracker) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, Self::to_json(tracker)?)?;
        tracing::debug!(path = %self.path.display(), habits = tracker.len(), "saved habits");
        Ok(())
    }

    /// Parse a JSON array of habit records.
    ///
    /// An unknown periodicity is reported as `InvalidPeriodicity`.
    pub fn from_json(json: &str) -> Result<HabitTracker> {
        let records: Vec<serde_json::Value> = serde_json::from_str(json)?;
        for record in &records {
            if let Some(raw) = record.get("periodicity").and_then(|v| v.as_str()) {
                raw.parse::<Periodicity>()?;
            } else if record.get("periodicity").is_some() {
                return Err(AnalyticsError::InvalidPeriodicity(
                    record["periodicity"].to_string(),
                )
                .into());
            }
        }

        let habits = serde_json::from_value(serde_json::Value::Array(records))?;
        Ok(HabitTracker::from_habits(habits))
    }

    pub fn to_json(tracker: &HabitTracker) -> Result<String> {
        Ok(serde_json::to_string_pretty(tracker)?)
    }
}
