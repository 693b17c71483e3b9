//! Habit tracker
//!
//! In-memory collection of habits with an append-only completion log per
//! habit. The tracker never touches disk; callers persist it through
//! [`crate::store::JsonStore`] at an explicit boundary.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::analytics;
use crate::error::{Result, TrackerError};
use crate::period::period_key;
use crate::types::{Habit, Periodicity, StrugglingHabit};

/// Collection of habits, in creation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitTracker {
    habits: Vec<Habit>,
}

impl HabitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing list of habits.
    ///
    /// Completion logs are re-sorted and `last_completed` is recomputed, so
    /// records loaded out of order still satisfy the sorted-log invariant.
    pub fn from_habits(mut habits: Vec<Habit>) -> Self {
        for habit in &mut habits {
            habit.completions.sort();
            habit.last_completed = habit.completions.last().copied();
        }
        Self { habits }
    }

    /// Register a new habit
    pub fn add_habit(
        &mut self,
        name: &str,
        description: &str,
        periodicity: Periodicity,
        created_at: NaiveDateTime,
    ) -> Result<&Habit> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::EmptyName);
        }
        if self.get(name).is_some() {
            return Err(TrackerError::DuplicateHabit(name.to_string()));
        }

        tracing::info!(habit = name, periodicity = %periodicity, "adding habit");
        self.habits
            .push(Habit::new(name, description, periodicity, created_at));
        let index = self.habits.len() - 1;
        Ok(&self.habits[index])
    }

    /// Remove a habit by name. Returns whether anything was removed.
    pub fn delete_habit(&mut self, name: &str) -> bool {
        let before = self.habits.len();
        self.habits.retain(|habit| habit.name != name);
        let removed = self.habits.len() < before;
        if removed {
            tracing::info!(habit = name, "deleted habit");
        }
        removed
    }

    /// Append a completion at `at`.
    ///
    /// Rejects a second completion in a period that is already satisfied.
    pub fn complete_habit(&mut self, name: &str, at: NaiveDateTime) -> Result<&Habit> {
        let habit = self
            .habits
            .iter_mut()
            .find(|habit| habit.name == name)
            .ok_or_else(|| TrackerError::HabitNotFound(name.to_string()))?;

        let key = period_key(at, habit.periodicity);
        if habit
            .completions
            .iter()
            .any(|existing| period_key(*existing, habit.periodicity) == key)
        {
            return Err(TrackerError::AlreadyCompleted {
                name: name.to_string(),
                period: key.to_string(),
            });
        }

        let position = habit.completions.partition_point(|existing| *existing <= at);
        habit.completions.insert(position, at);
        habit.last_completed = habit.completions.last().copied();

        tracing::info!(habit = name, period = %key, "recorded completion");
        Ok(&*habit)
    }

    pub fn get(&self, name: &str) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.name == name)
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn by_periodicity(&self, periodicity: Periodicity) -> Vec<&Habit> {
        analytics::habits_by_periodicity(&self.habits, periodicity)
    }

    /// Longest streak of a named habit, or `HabitNotFound`
    pub fn longest_streak(&self, name: &str, now: NaiveDateTime) -> Result<u32> {
        self.get(name)
            .map(|habit| analytics::longest_streak(habit, now))
            .ok_or_else(|| TrackerError::HabitNotFound(name.to_string()))
    }

    /// Struggling-habit ranking over all tracked habits
    pub fn struggling(&self, window_days: u32, now: NaiveDateTime) -> Vec<StrugglingHabit> {
        analytics::struggling_habits(&self.habits, window_days, now)
    }
}
