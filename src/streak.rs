//! Streak calculation
//!
//! Computes the longest historical run of consecutive periods and the run
//! that is still active at a reference instant. Both are recomputed from the
//! period log on every call; nothing is cached.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::period::{period_key, PeriodLog};

/// Conceptual streak state of a habit at a reference instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "periods", rename_all = "snake_case")]
pub enum StreakState {
    /// No completion at or before the reference instant
    NoHistory,
    /// Completions exist but none in the current period
    Broken,
    /// The current period is completed; carries the run length
    Active(u32),
}

/// Longest run of consecutive periods anywhere in the log.
///
/// Single forward pass over the ascending keys. Returns 0 only for an empty log.
pub fn longest_streak(log: &PeriodLog) -> u32 {
    let mut keys = log.iter();
    let Some(mut prev) = keys.next() else {
        return 0;
    };

    let mut current = 1u32;
    let mut best = 1u32;

    for key in keys {
        if prev.successor().as_ref() == Some(key) {
            current += 1;
        } else {
            current = 1;
        }
        best = best.max(current);
        prev = key;
    }

    best
}

/// Run of consecutive periods ending at the period containing `now`.
///
/// Zero when the current period has no completion, even if the previous one
/// does.
pub fn current_streak(log: &PeriodLog, now: NaiveDateTime) -> u32 {
    let today = period_key(now, log.periodicity());
    if !log.contains(&today) {
        return 0;
    }

    let mut streak = 1u32;
    let mut cursor = today;
    while let Some(prev) = cursor.predecessor() {
        if !log.contains(&prev) {
            break;
        }
        streak += 1;
        cursor = prev;
    }

    streak
}

/// Reconstruct the streak state at `now`
pub fn streak_state(log: &PeriodLog, now: NaiveDateTime) -> StreakState {
    if log.is_empty() {
        return StreakState::NoHistory;
    }
    match current_streak(log, now) {
        0 => StreakState::Broken,
        n => StreakState::Active(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Periodicity;
    use chrono::{Duration, NaiveDate};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap()
    }

    fn daily(now: NaiveDateTime, offsets: &[i64]) -> PeriodLog {
        let completions: Vec<NaiveDateTime> = offsets
            .iter()
            .map(|o| now + Duration::days(*o))
            .collect();
        PeriodLog::from_completions(Periodicity::Daily, &completions, now)
    }

    #[test]
    fn test_empty_log() {
        let now = at(2024, 5, 1);
        for periodicity in [Periodicity::Daily, Periodicity::Weekly] {
            let log = PeriodLog::from_completions(periodicity, &[], now);
            assert_eq!(longest_streak(&log), 0);
            assert_eq!(current_streak(&log, now), 0);
            assert_eq!(streak_state(&log, now), StreakState::NoHistory);
        }
    }

    #[test]
    fn test_daily_run_ending_today() {
        let now = at(2024, 5, 10);
        let log = daily(now, &[-2, -1, 0]);
        assert_eq!(current_streak(&log, now), 3);
        assert_eq!(longest_streak(&log), 3);
        assert_eq!(streak_state(&log, now), StreakState::Active(3));
    }

    #[test]
    fn test_daily_gap_today() {
        let now = at(2024, 5, 10);
        let log = daily(now, &[-1]);
        assert_eq!(current_streak(&log, now), 0);
        assert_eq!(longest_streak(&log), 1);
        assert_eq!(streak_state(&log, now), StreakState::Broken);
    }

    #[test]
    fn test_longest_picks_best_run() {
        let now = at(2024, 5, 30);
        let log = daily(now, &[-20, -19, -18, -17, -10, -9, -1, 0]);
        assert_eq!(longest_streak(&log), 4);
        assert_eq!(current_streak(&log, now), 2);
    }

    #[test]
    fn test_same_day_duplicates_count_once() {
        let now = at(2024, 5, 10);
        let log = PeriodLog::from_completions(
            Periodicity::Daily,
            &[
                at(2024, 5, 9),
                at(2024, 5, 9) + Duration::hours(1),
                at(2024, 5, 10) - Duration::hours(10),
                at(2024, 5, 10),
            ],
            now,
        );
        assert_eq!(longest_streak(&log), 2);
        assert_eq!(current_streak(&log, now), 2);
    }

    #[test]
    fn test_future_completions_ignored() {
        let now = at(2024, 5, 10);
        let log = daily(now, &[1, 2, 3]);
        assert_eq!(longest_streak(&log), 0);
        assert_eq!(current_streak(&log, now), 0);
    }

    #[test]
    fn test_weekly_previous_weeks_only() {
        // 2024-05-15 is in ISO week 20; completions in weeks 18 and 19
        let now = at(2024, 5, 15);
        let log = PeriodLog::from_completions(
            Periodicity::Weekly,
            &[at(2024, 5, 1), at(2024, 5, 9)],
            now,
        );
        assert_eq!(current_streak(&log, now), 0);
        assert_eq!(longest_streak(&log), 2);
    }

    #[test]
    fn test_weekly_year_boundary_52_week_year() {
        // 2019 has 52 ISO weeks: 2019-W52 (Dec 23) then 2020-W01 (Dec 30)
        let now = at(2020, 1, 2);
        let log = PeriodLog::from_completions(
            Periodicity::Weekly,
            &[at(2019, 12, 24), at(2019, 12, 31)],
            now,
        );
        assert_eq!(longest_streak(&log), 2);
        assert_eq!(current_streak(&log, now), 2);
    }

    #[test]
    fn test_weekly_year_boundary_53_week_year() {
        // 2020 has 53 ISO weeks: week 52 and 2021-W01 are not adjacent
        let now = at(2021, 1, 6);
        let skipped = PeriodLog::from_completions(
            Periodicity::Weekly,
            &[at(2020, 12, 22), at(2021, 1, 5)],
            now,
        );
        assert_eq!(longest_streak(&skipped), 1);
        assert_eq!(current_streak(&skipped, now), 1);

        let consecutive = PeriodLog::from_completions(
            Periodicity::Weekly,
            &[at(2020, 12, 22), at(2020, 12, 29), at(2021, 1, 5)],
            now,
        );
        assert_eq!(longest_streak(&consecutive), 3);
        assert_eq!(current_streak(&consecutive, now), 3);
    }

    #[test]
    fn test_longest_at_least_current_when_now_is_last() {
        let now = at(2024, 6, 3);
        let log = daily(now, &[-40, -39, -38, -37, -36, -3, -2, -1, 0]);
        assert_eq!(log.last(), Some(&period_key(now, Periodicity::Daily)));
        assert!(longest_streak(&log) >= current_streak(&log, now));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let now = at(2024, 6, 3);
        let log = daily(now, &[-5, -3, -2, 0]);
        assert_eq!(longest_streak(&log), longest_streak(&log));
        assert_eq!(current_streak(&log, now), current_streak(&log, now));
    }
}
