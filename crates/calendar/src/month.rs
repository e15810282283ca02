//! Calendar-month buckets used for monthly resampling.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// A (year, month) bucket.
///
/// Ordered chronologically, so a `BTreeMap<MonthKey, _>` iterates in time
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Bucket containing `time`.
    pub fn of(time: NaiveDateTime) -> Self {
        Self {
            year: time.year(),
            month: time.month(),
        }
    }

    /// Returns the year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// Returns the month (1..=12).
    pub fn month(self) -> u32 {
        self.month
    }

    /// The following month.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Last day of the month.
    pub fn last_day(self) -> NaiveDate {
        let next = self.next();
        NaiveDate::from_ymd_opt(next.year, next.month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Timestamp that labels this bucket: midnight on the last day of the month.
    pub fn label(self) -> NaiveDateTime {
        self.last_day().and_hms_opt(0, 0, 0).unwrap_or(NaiveDateTime::MAX)
    }
}

/// Whole and fractional days from `from` to `to`.
pub fn days_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 86_400_000.0
}
