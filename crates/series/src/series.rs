//! The immutable time-series value type.

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::error::SeriesError;

/// An ordered sequence of `(timestamp, value)` pairs.
///
/// Timestamps are strictly increasing. Missing values are NaN. A series is
/// never mutated after construction; every transformation returns a new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    name: String,
    times: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

impl Series {
    /// Creates a series after checking lengths and ordering.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::LengthMismatch`] if `times` and `values` differ
    /// in length, or [`SeriesError::Unordered`] if the timestamps are not
    /// strictly increasing.
    pub fn new(
        name: impl Into<String>,
        times: Vec<NaiveDateTime>,
        values: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        let name = name.into();
        if times.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                name,
                times: times.len(),
                values: values.len(),
            });
        }
        if let Some(index) = times.windows(2).position(|w| w[0] >= w[1]) {
            return Err(SeriesError::Unordered {
                index: index + 1,
                previous: times[index],
                current: times[index + 1],
            });
        }
        Ok(Self {
            name,
            times,
            values,
        })
    }

    /// Builds a series from pairs in any order.
    ///
    /// Pairs are sorted ascending by timestamp; when a timestamp repeats, the
    /// pair that came last in the input wins.
    pub fn from_unsorted(name: impl Into<String>, mut pairs: Vec<(NaiveDateTime, f64)>) -> Self {
        pairs.sort_by_key(|&(t, _)| t);
        let mut times: Vec<NaiveDateTime> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f64> = Vec::with_capacity(pairs.len());
        for (t, v) in pairs {
            if times.last() == Some(&t) {
                if let Some(last) = values.last_mut() {
                    *last = v;
                }
            } else {
                times.push(t);
                values.push(v);
            }
        }
        Self {
            name: name.into(),
            times,
            values,
        }
    }

    /// A series with no samples.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            times: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Label used in legends and export headers.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Timestamps, strictly increasing.
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    /// Values, parallel to [`times`](Self::times).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns `true` if the series has no samples.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Iterates over `(timestamp, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    /// First and last timestamp, if any.
    pub fn bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((*self.times.first()?, *self.times.last()?))
    }

    /// Gap between the first two samples, taken as the native sampling
    /// interval. `None` for fewer than two samples.
    pub fn native_interval(&self) -> Option<TimeDelta> {
        match self.times.as_slice() {
            [first, second, ..] => Some(*second - *first),
            _ => None,
        }
    }

    /// Same samples under a different name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Applies `f` to every value, keeping the timestamps.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            name: self.name.clone(),
            times: self.times.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Values rounded to `decimals` places.
    pub fn rounded(&self, decimals: i32) -> Self {
        let scale = 10f64.powi(decimals);
        self.map_values(|v| (v * scale).round() / scale)
    }

    /// Pointwise `self - other` on `self`'s time axis.
    ///
    /// The two series are assumed to share a time axis, so only their
    /// lengths are compared.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::ShapeMismatch`] if the lengths differ.
    pub fn difference(&self, other: &Series, name: impl Into<String>) -> Result<Self, SeriesError> {
        if self.len() != other.len() {
            return Err(SeriesError::ShapeMismatch {
                left: self.name.clone(),
                left_len: self.len(),
                right: other.name.clone(),
                right_len: other.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            times: self.times.clone(),
            values: self
                .values
                .iter()
                .zip(&other.values)
                .map(|(a, b)| a - b)
                .collect(),
        })
    }

    /// Keeps the samples whose timestamps satisfy `keep`.
    pub(crate) fn filter_times(&self, keep: impl Fn(NaiveDateTime) -> bool) -> Self {
        let (times, values) = self.iter().filter(|&(t, _)| keep(t)).unzip();
        Self {
            name: self.name.clone(),
            times,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_new_valid() {
        let s = Series::new("q", vec![day(1), day(2)], vec![1.0, 2.0]).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.name(), "q");
        assert_eq!(s.bounds(), Some((day(1), day(2))));
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = Series::new("q", vec![day(1)], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, SeriesError::LengthMismatch { times: 1, values: 2, .. }));
    }

    #[test]
    fn test_new_rejects_duplicate_timestamp() {
        let err = Series::new("q", vec![day(1), day(1)], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, SeriesError::Unordered { index: 1, .. }));
    }

    #[test]
    fn test_from_unsorted_sorts_and_keeps_last_duplicate() {
        let s = Series::from_unsorted(
            "obs",
            vec![(day(3), 3.0), (day(1), 1.0), (day(3), 30.0), (day(2), 2.0)],
        );
        assert_eq!(s.times(), &[day(1), day(2), day(3)]);
        assert_eq!(s.values(), &[1.0, 2.0, 30.0]);
    }

    #[test]
    fn test_native_interval() {
        let s = Series::new("q", vec![day(1), day(3), day(4)], vec![0.0; 3]).unwrap();
        assert_eq!(s.native_interval(), Some(TimeDelta::days(2)));
        assert_eq!(Series::empty("e").native_interval(), None);
    }

    #[test]
    fn test_difference() {
        let a = Series::new("a", vec![day(1), day(2)], vec![5.0, 7.0]).unwrap();
        let b = Series::new("b", vec![day(1), day(2)], vec![1.0, 10.0]).unwrap();
        let d = a.difference(&b, "a - b").unwrap();
        assert_eq!(d.values(), &[4.0, -3.0]);
        assert_eq!(d.name(), "a - b");
    }

    #[test]
    fn test_difference_shape_mismatch() {
        let a = Series::new("a", vec![day(1), day(2)], vec![5.0, 7.0]).unwrap();
        let b = Series::new("b", vec![day(1)], vec![1.0]).unwrap();
        let err = a.difference(&b, "x").unwrap_err();
        assert!(matches!(err, SeriesError::ShapeMismatch { left_len: 2, right_len: 1, .. }));
    }

    #[test]
    fn test_rounded() {
        let s = Series::new("q", vec![day(1)], vec![1.23456]).unwrap();
        assert_eq!(s.rounded(3).values(), &[1.235]);
    }

    #[test]
    fn test_serializes_times_and_values() {
        let s = Series::new("q", vec![day(1)], vec![2.5]).unwrap();
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"name\":\"q\""));
        assert!(json.contains("2000-01-01T00:00:00"));
        assert!(json.contains("2.5"));
    }
}
