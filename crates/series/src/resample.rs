//! Periodic resampling to coarser means.

use std::collections::BTreeMap;

use chrono::TimeDelta;
use hydroscope_calendar::MonthKey;
use hydroscope_stats::finite_mean;

use crate::series::Series;

/// Series whose native interval is at least this many days are never
/// resampled to months.
pub const MONTHLY_THRESHOLD_DAYS: i64 = 28;

/// Target period of a resample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Calendar months, labelled by their last day at midnight.
    Monthly,
}

impl Period {
    fn threshold(self) -> TimeDelta {
        match self {
            Period::Monthly => TimeDelta::days(MONTHLY_THRESHOLD_DAYS),
        }
    }
}

/// Replaces each period's samples with their mean.
///
/// Only applied when the native interval of `series` is finer than the
/// period; a series that is already as coarse, or has fewer than two
/// samples, is returned unchanged. Every month between the first and last
/// sample gets an output point, NaN when the month holds no finite value.
pub fn resample(series: &Series, period: Period) -> Series {
    let Some(interval) = series.native_interval() else {
        return series.clone();
    };
    if interval >= period.threshold() {
        tracing::debug!(
            series = series.name(),
            interval_hours = interval.num_hours(),
            "native interval is already coarse, not resampling"
        );
        return series.clone();
    }

    let mut buckets: BTreeMap<MonthKey, Vec<f64>> = BTreeMap::new();
    for (time, value) in series.iter() {
        buckets.entry(MonthKey::of(time)).or_default().push(value);
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return series.clone();
    };

    let mut pairs = Vec::with_capacity(buckets.len());
    let mut key = first;
    loop {
        let value = buckets
            .get(&key)
            .and_then(|values| finite_mean(values))
            .unwrap_or(f64::NAN);
        pairs.push((key.label(), value));
        if key == last {
            break;
        }
        key = key.next();
    }

    Series::from_unsorted(series.name(), pairs)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn daily(n: usize, start: NaiveDateTime) -> Series {
        let times = (0..n).map(|i| start + TimeDelta::days(i as i64)).collect();
        let values = (0..n).map(|i| i as f64).collect();
        Series::new("daily", times, values).unwrap()
    }

    #[test]
    fn test_sixty_days_give_two_months() {
        let s = daily(60, midnight(2000, 1, 1));
        let m = resample(&s, Period::Monthly);
        assert_eq!(m.len(), 2);
        assert_eq!(m.times(), &[midnight(2000, 1, 31), midnight(2000, 2, 29)]);
        // January holds 0..=30, February 31..=59
        assert_relative_eq!(m.values()[0], 15.0);
        assert_relative_eq!(m.values()[1], 45.0);
        assert_eq!(m.name(), "daily");
    }

    #[test]
    fn test_coarse_series_left_unchanged() {
        let times = vec![
            midnight(2000, 1, 31),
            midnight(2000, 2, 29),
            midnight(2000, 3, 31),
        ];
        let s = Series::new("monthly", times, vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(resample(&s, Period::Monthly), s);
    }

    #[test]
    fn test_single_sample_left_unchanged() {
        let s = daily(1, midnight(2000, 1, 1));
        assert_eq!(resample(&s, Period::Monthly), s);
    }

    #[test]
    fn test_gap_month_is_nan() {
        let times = vec![
            midnight(2000, 1, 1),
            midnight(2000, 1, 2),
            midnight(2000, 3, 1),
        ];
        let s = Series::new("gappy", times, vec![1.0, 3.0, 5.0]).unwrap();
        let m = resample(&s, Period::Monthly);
        assert_eq!(m.len(), 3);
        assert_relative_eq!(m.values()[0], 2.0);
        assert!(m.values()[1].is_nan());
        assert_relative_eq!(m.values()[2], 5.0);
    }

    #[test]
    fn test_nan_values_skipped_in_mean() {
        let s = Series::new(
            "n",
            vec![midnight(2000, 1, 1), midnight(2000, 1, 2), midnight(2000, 1, 3)],
            vec![1.0, f64::NAN, 3.0],
        )
        .unwrap();
        let m = resample(&s, Period::Monthly);
        assert_relative_eq!(m.values()[0], 2.0);
    }
}
