//! Period index
//!
//! Maps completion timestamps onto comparable period keys (a calendar date for
//! daily habits, an ISO week for weekly habits) and walks between adjacent
//! periods. Weekly arithmetic uses the real number of ISO weeks in each
//! ISO week-year, so runs across 53-week years are counted correctly.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;

use crate::types::Periodicity;

/// Identifies the period a timestamp belongs to.
///
/// Keys of the same periodicity order chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodKey {
    /// A calendar date
    Day(NaiveDate),
    /// An ISO week; `year` is the ISO week-year, which may differ from the
    /// calendar year for dates near January 1
    Week { year: i32, week: u32 },
}

/// Period key of a timestamp
pub fn period_key(timestamp: NaiveDateTime, periodicity: Periodicity) -> PeriodKey {
    date_key(timestamp.date(), periodicity)
}

/// Period key of a calendar date
pub fn date_key(date: NaiveDate, periodicity: Periodicity) -> PeriodKey {
    match periodicity {
        Periodicity::Daily => PeriodKey::Day(date),
        Periodicity::Weekly => {
            let iso = date.iso_week();
            PeriodKey::Week {
                year: iso.year(),
                week: iso.week(),
            }
        }
    }
}

/// Number of ISO weeks (52 or 53) in an ISO week-year.
///
/// December 28 always falls in the last ISO week of its year.
pub fn weeks_in_iso_year(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 12, 28).map_or(52, |d| d.iso_week().week())
}

impl PeriodKey {
    pub fn periodicity(&self) -> Periodicity {
        match self {
            PeriodKey::Day(_) => Periodicity::Daily,
            PeriodKey::Week { .. } => Periodicity::Weekly,
        }
    }

    /// The immediately following period, or `None` past the end of the calendar
    pub fn successor(&self) -> Option<PeriodKey> {
        match *self {
            PeriodKey::Day(date) => date.succ_opt().map(PeriodKey::Day),
            PeriodKey::Week { year, week } => {
                if week >= weeks_in_iso_year(year) {
                    year.checked_add(1)
                        .map(|year| PeriodKey::Week { year, week: 1 })
                } else {
                    Some(PeriodKey::Week {
                        year,
                        week: week + 1,
                    })
                }
            }
        }
    }

    /// The immediately preceding period, or `None` before the start of the calendar
    pub fn predecessor(&self) -> Option<PeriodKey> {
        match *self {
            PeriodKey::Day(date) => date.pred_opt().map(PeriodKey::Day),
            PeriodKey::Week { year, week } => {
                if week <= 1 {
                    year.checked_sub(1).map(|year| PeriodKey::Week {
                        year,
                        week: weeks_in_iso_year(year),
                    })
                } else {
                    Some(PeriodKey::Week {
                        year,
                        week: week - 1,
                    })
                }
            }
        }
    }

    /// First calendar day of the period (Monday for weeks).
    ///
    /// `None` for a week number the ISO calendar does not define.
    pub fn start_date(&self) -> Option<NaiveDate> {
        match *self {
            PeriodKey::Day(date) => Some(date),
            PeriodKey::Week { year, week } => NaiveDate::from_isoywd_opt(year, week, Weekday::Mon),
        }
    }

    /// Last calendar day of the period (Sunday for weeks)
    pub fn end_date(&self) -> Option<NaiveDate> {
        match *self {
            PeriodKey::Day(date) => Some(date),
            PeriodKey::Week { year, week } => NaiveDate::from_isoywd_opt(year, week, Weekday::Sun),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKey::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            PeriodKey::Week { year, week } => write!(f, "{year}-W{week:02}"),
        }
    }
}

/// Signed number of periods from `a` to `b` (0 if equal).
///
/// Returns `None` when the keys belong to different periodicities or name a
/// week that does not exist.
pub fn periods_between(a: &PeriodKey, b: &PeriodKey) -> Option<i64> {
    match (a, b) {
        (PeriodKey::Day(a), PeriodKey::Day(b)) => Some((*b - *a).num_days()),
        (PeriodKey::Week { .. }, PeriodKey::Week { .. }) => {
            let days = (b.start_date()? - a.start_date()?).num_days();
            Some(days / 7)
        }
        _ => None,
    }
}

/// Sorted, deduplicated set of periods in which a habit was completed.
///
/// Built from a raw completion log; several completions in one period
/// collapse to a single key and completions after `now` are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodLog {
    periodicity: Periodicity,
    keys: BTreeSet<PeriodKey>,
}

impl PeriodLog {
    /// Empty log for a periodicity
    pub fn new(periodicity: Periodicity) -> Self {
        Self {
            periodicity,
            keys: BTreeSet::new(),
        }
    }

    /// Build the key set from completions recorded at or before `now`
    pub fn from_completions(
        periodicity: Periodicity,
        completions: &[NaiveDateTime],
        now: NaiveDateTime,
    ) -> Self {
        let keys: BTreeSet<PeriodKey> = completions
            .iter()
            .filter(|ts| **ts <= now)
            .map(|ts| period_key(*ts, periodicity))
            .collect();

        tracing::trace!(
            periodicity = %periodicity,
            completions = completions.len(),
            periods = keys.len(),
            "built period log"
        );

        Self { periodicity, keys }
    }

    pub fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    pub fn contains(&self, key: &PeriodKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in ascending order
    pub fn iter(&self) -> btree_set::Iter<'_, PeriodKey> {
        self.keys.iter()
    }

    pub fn first(&self) -> Option<&PeriodKey> {
        self.keys.first()
    }

    pub fn last(&self) -> Option<&PeriodKey> {
        self.keys.last()
    }
}

impl<'a> IntoIterator for &'a PeriodLog {
    type Item = &'a PeriodKey;
    type IntoIter = btree_set::Iter<'a, PeriodKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
