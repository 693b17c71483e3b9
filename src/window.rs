//! Adherence window scanning
//!
//! Counts periods without any completion inside a trailing window of calendar
//! days. For weekly habits every ISO week that overlaps the window is checked
//! in full, including partially covered weeks at either edge.

use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::period::{date_key, PeriodLog};

/// Count missed periods in the window `[now.date - (window_days - 1), now.date]`.
///
/// A zero-length window contains no periods.
pub fn missed_periods(log: &PeriodLog, window_days: u32, now: NaiveDateTime) -> u32 {
    let Some(span) = window_days.checked_sub(1) else {
        return 0;
    };
    let end = now.date();
    let start = end
        .checked_sub_days(Days::new(u64::from(span)))
        .unwrap_or(NaiveDate::MIN);

    missed_periods_between(log, start, end)
}

/// Count missed periods overlapping the inclusive date range `[start, end]`
pub fn missed_periods_between(log: &PeriodLog, start: NaiveDate, end: NaiveDate) -> u32 {
    if start > end {
        return 0;
    }

    let periodicity = log.periodicity();
    let last = date_key(end, periodicity);
    let mut cursor = Some(date_key(start, periodicity));
    let mut missed = 0u32;

    while let Some(key) = cursor {
        if key > last {
            break;
        }
        if !log.contains(&key) {
            missed += 1;
        }
        cursor = key.successor();
    }

    tracing::trace!(%start, %end, periodicity = %periodicity, missed, "scanned window");
    missed
}

/// Whether any period overlapping `[start, end]` went without a completion
pub fn was_broken(log: &PeriodLog, start: NaiveDate, end: NaiveDate) -> bool {
    missed_periods_between(log, start, end) > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Periodicity;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(20, 0, 0).unwrap()
    }

    #[test]
    fn test_daily_all_completed() {
        let now = at(2024, 4, 30);
        let completions: Vec<NaiveDateTime> =
            (0..30).map(|d| now - Duration::days(d)).collect();
        let log = PeriodLog::from_completions(Periodicity::Daily, &completions, now);
        assert_eq!(missed_periods(&log, 30, now), 0);
        assert_eq!(missed_periods(&log, 31, now), 1);
    }

    #[test]
    fn test_daily_single_completion() {
        let now = at(2024, 4, 30);
        let log = PeriodLog::from_completions(
            Periodicity::Daily,
            &[now - Duration::days(25)],
            now,
        );
        assert_eq!(missed_periods(&log, 30, now), 29);
    }

    #[test]
    fn test_zero_window() {
        let now = at(2024, 4, 30);
        let log = PeriodLog::new(Periodicity::Daily);
        assert_eq!(missed_periods(&log, 0, now), 0);
        assert_eq!(missed_periods(&log, 1, now), 1);
    }

    #[test]
    fn test_weekly_counts_overlapping_weeks() {
        // Wednesday 2024-05-15; a 10-day window starts Monday 2024-05-06,
        // covering ISO weeks 19 and 20
        let now = at(2024, 5, 15);
        let empty = PeriodLog::new(Periodicity::Weekly);
        assert_eq!(missed_periods(&empty, 10, now), 2);
        // An 11-day window reaches Sunday 2024-05-05 in week 18
        assert_eq!(missed_periods(&empty, 11, now), 3);
    }

    #[test]
    fn test_weekly_partial_edge_week_evaluated_in_full() {
        // Window [2024-05-08, 2024-05-15]; the completion on Monday 2024-05-06
        // lies before the window but inside its first week
        let now = at(2024, 5, 15);
        let log = PeriodLog::from_completions(Periodicity::Weekly, &[at(2024, 5, 6)], now);
        assert_eq!(missed_periods(&log, 8, now), 1);
    }

    #[test]
    fn test_weekly_window_across_53_week_year() {
        // 2020-W52, 2020-W53, 2021-W01, 2021-W02
        let now = at(2021, 1, 12);
        let log = PeriodLog::from_completions(
            Periodicity::Weekly,
            &[at(2020, 12, 23), at(2021, 1, 6)],
            now,
        );
        assert_eq!(missed_periods_between(&log, date(2020, 12, 21), now.date()), 2);
    }

    #[test]
    fn test_missed_is_monotone_in_window() {
        let now = at(2024, 3, 3);
        for periodicity in [Periodicity::Daily, Periodicity::Weekly] {
            let completions = [
                now - Duration::days(1),
                now - Duration::days(9),
                now - Duration::days(17),
                now - Duration::days(40),
            ];
            let log = PeriodLog::from_completions(periodicity, &completions, now);
            let mut previous = 0;
            for window in 0..120 {
                let missed = missed_periods(&log, window, now);
                assert!(missed >= previous, "{periodicity} window {window}");
                previous = missed;
            }
        }
    }

    #[test]
    fn test_was_broken() {
        let now = at(2024, 1, 10);
        let log = PeriodLog::from_completions(
            Periodicity::Daily,
            &[at(2024, 1, 7), at(2024, 1, 8), at(2024, 1, 10)],
            now,
        );
        assert!(!was_broken(&log, date(2024, 1, 7), date(2024, 1, 8)));
        assert!(was_broken(&log, date(2024, 1, 7), date(2024, 1, 10)));
        assert!(!was_broken(&log, date(2024, 1, 10), date(2024, 1, 7)));
    }
}
