//! Habit analytics facade
//!
//! This module provides the public analytics API. It turns a habit's raw
//! completion log into a period log and runs the streak and adherence
//! computations over it, then aggregates results across habits for the
//! struggling-habit ranking.
//!
//! Every entry point takes the reference instant `now` explicitly.

use chrono::NaiveDateTime;

use crate::period::PeriodLog;
use crate::streak;
use crate::types::{Habit, HabitReport, Periodicity, StrugglingHabit};
use crate::window;

/// Default adherence window in days
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Period log of a habit as seen at `now`
pub fn period_log(habit: &Habit, now: NaiveDateTime) -> PeriodLog {
    PeriodLog::from_completions(habit.periodicity, &habit.completions, now)
}

/// Longest run of consecutive completed periods up to `now`
pub fn longest_streak(habit: &Habit, now: NaiveDateTime) -> u32 {
    streak::longest_streak(&period_log(habit, now))
}

/// Run of consecutive completed periods ending in the period containing `now`
pub fn current_streak(habit: &Habit, now: NaiveDateTime) -> u32 {
    streak::current_streak(&period_log(habit, now), now)
}

/// Missed periods in the trailing `window_days` ending at `now`
pub fn missed_periods(habit: &Habit, window_days: u32, now: NaiveDateTime) -> u32 {
    window::missed_periods(&period_log(habit, now), window_days, now)
}

/// Compute all statistics for one habit
pub fn report(habit: &Habit, window_days: u32, now: NaiveDateTime) -> HabitReport {
    let log = period_log(habit, now);

    let report = HabitReport {
        name: habit.name.clone(),
        periodicity: habit.periodicity,
        current_streak: streak::current_streak(&log, now),
        longest_streak: streak::longest_streak(&log),
        missed_periods: window::missed_periods(&log, window_days, now),
        window_days,
        last_completed: habit.completions.iter().filter(|ts| **ts <= now).max().copied(),
    };

    tracing::debug!(
        habit = %report.name,
        current = report.current_streak,
        longest = report.longest_streak,
        missed = report.missed_periods,
        "computed habit report"
    );

    report
}

/// Rank habits by missed periods over a shared window.
///
/// Habits with no misses are dropped. The sort is stable, so tied habits keep
/// their input order.
pub fn struggling_habits(
    habits: &[Habit],
    window_days: u32,
    now: NaiveDateTime,
) -> Vec<StrugglingHabit> {
    let mut ranked: Vec<StrugglingHabit> = habits
        .iter()
        .map(|habit| StrugglingHabit {
            name: habit.name.clone(),
            periodicity: habit.periodicity,
            missed_periods: missed_periods(habit, window_days, now),
        })
        .filter(|entry| entry.missed_periods > 0)
        .collect();

    ranked.sort_by(|a, b| b.missed_periods.cmp(&a.missed_periods));
    ranked
}

/// Names of struggling habits, most-missed first
pub fn struggling_habit_names(habits: &[Habit], window_days: u32, now: NaiveDateTime) -> Vec<String> {
    struggling_habits(habits, window_days, now)
        .into_iter()
        .map(|entry| entry.name)
        .collect()
}

/// Longest streak of every habit, in input order
pub fn longest_streaks(habits: &[Habit], now: NaiveDateTime) -> Vec<(String, u32)> {
    habits
        .iter()
        .map(|habit| (habit.name.clone(), longest_streak(habit, now)))
        .collect()
}

/// Habits with the given periodicity, in input order
pub fn habits_by_periodicity(habits: &[Habit], periodicity: Periodicity) -> Vec<&Habit> {
    habits
        .iter()
        .filter(|habit| habit.periodicity == periodicity)
        .collect()
}

/// Analytics runner with a configured adherence window.
///
/// Use this when the window comes from configuration rather than per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HabitAnalytics {
    window_days: u32,
}

impl Default for HabitAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

impl HabitAnalytics {
    /// Create an analytics runner with the default 30-day window
    pub fn new() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    /// Create an analytics runner with a specific window size
    pub fn with_window(window_days: u32) -> Self {
        Self { window_days }
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// Reports for every habit, in input order
    pub fn reports(&self, habits: &[Habit], now: NaiveDateTime) -> Vec<HabitReport> {
        habits
            .iter()
            .map(|habit| report(habit, self.window_days, now))
            .collect()
    }

    pub fn report(&self, habit: &Habit, now: NaiveDateTime) -> HabitReport {
        report(habit, self.window_days, now)
    }

    pub fn struggling(&self, habits: &[Habit], now: NaiveDateTime) -> Vec<StrugglingHabit> {
        struggling_habits(habits, self.window_days, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use pretty_assertions::assert_eq;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, 30)
            .unwrap()
            .and_hms_opt(21, 15, 0)
            .unwrap()
    }

    fn habit(name: &str, periodicity: Periodicity, days_ago: &[i64]) -> Habit {
        let now = now();
        Habit::new(name, "", periodicity, now - Duration::days(365))
            .with_completions(days_ago.iter().map(|d| now - Duration::days(*d)))
    }

    #[test]
    fn test_struggling_ranking_scenario() {
        let all: Vec<i64> = (0..30).collect();
        let habits = vec![
            habit("A", Periodicity::Daily, &all),
            habit("B", Periodicity::Daily, &[25]),
            habit("C", Periodicity::Daily, &(0..20).collect::<Vec<_>>()),
        ];

        let ranked = struggling_habits(&habits, 30, now());
        assert_eq!(
            ranked,
            vec![
                StrugglingHabit {
                    name: "B".to_string(),
                    periodicity: Periodicity::Daily,
                    missed_periods: 29,
                },
                StrugglingHabit {
                    name: "C".to_string(),
                    periodicity: Periodicity::Daily,
                    missed_periods: 10,
                },
            ]
        );
        assert_eq!(
            struggling_habit_names(&habits, 30, now()),
            vec!["B".to_string(), "C".to_string()]
        );
    }

    #[test]
    fn test_struggling_ties_keep_input_order() {
        let habits = vec![
            habit("first", Periodicity::Daily, &[1]),
            habit("worst", Periodicity::Daily, &[]),
            habit("second", Periodicity::Daily, &[2]),
        ];

        assert_eq!(
            struggling_habit_names(&habits, 7, now()),
            vec!["worst".to_string(), "first".to_string(), "second".to_string()]
        );
    }

    #[test]
    fn test_report() {
        let h = habit("stretch", Periodicity::Daily, &[0, 1, 2, 10, 11, 12, 13, -3]);
        let report = report(&h, 14, now());

        assert_eq!(report.current_streak, 3);
        assert_eq!(report.longest_streak, 4);
        // Days 3..=9 missed in the 14-day window
        assert_eq!(report.missed_periods, 7);
        assert_eq!(report.last_completed, Some(now()));
    }

    #[test]
    fn test_weekly_facade() {
        // Completed the previous two weeks but not this week
        let h = habit("review", Periodicity::Weekly, &[8, 15]);
        assert_eq!(current_streak(&h, now()), 0);
        assert_eq!(longest_streak(&h, now()), 2);
    }

    #[test]
    fn test_empty_habit() {
        let h = habit("new", Periodicity::Weekly, &[]);
        assert_eq!(longest_streak(&h, now()), 0);
        assert_eq!(current_streak(&h, now()), 0);
        assert_eq!(report(&h, 30, now()).last_completed, None);
    }

    #[test]
    fn test_longest_streaks_and_filter() {
        let habits = vec![
            habit("run", Periodicity::Daily, &[0, 1]),
            habit("plan", Periodicity::Weekly, &[0]),
        ];

        assert_eq!(
            longest_streaks(&habits, now()),
            vec![("run".to_string(), 2), ("plan".to_string(), 1)]
        );

        let weekly = habits_by_periodicity(&habits, Periodicity::Weekly);
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].name, "plan");
    }

    #[test]
    fn test_analytics_runner_window() {
        let runner = HabitAnalytics::with_window(7);
        let habits = vec![habit("read", Periodicity::Daily, &[0, 1, 2])];

        let reports = runner.reports(&habits, now());
        assert_eq!(reports[0].missed_periods, 4);
        assert_eq!(reports[0].window_days, 7);
        assert_eq!(HabitAnalytics::default().window_days(), DEFAULT_WINDOW_DAYS);
    }
}
