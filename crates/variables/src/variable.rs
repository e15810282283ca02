//! The read contract shared by stored and derived variables.

use chrono::NaiveDateTime;
use hydroscope_series::Series;
use serde::Serialize;

use crate::error::VariableError;
use crate::registry::VariableSpec;

/// Every element's value at one time step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSlice {
    pub time: NaiveDateTime,
    /// Element numbers, ascending.
    pub elements: Vec<u32>,
    /// One value per entry of `elements`.
    pub values: Vec<f64>,
}

impl TimeSlice {
    /// Value for `number`, if the slice covers it.
    pub fn get(&self, number: u32) -> Option<f64> {
        self.elements
            .binary_search(&number)
            .ok()
            .map(|i| self.values[i])
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Pairs of `(element, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.elements.iter().copied().zip(self.values.iter().copied())
    }

    /// Applies `f(element, value)` to every entry.
    pub fn map(
        &self,
        mut f: impl FnMut(u32, f64) -> Result<f64, VariableError>,
    ) -> Result<Self, VariableError> {
        let values = self
            .iter()
            .map(|(n, v)| f(n, v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            time: self.time,
            elements: self.elements.clone(),
            values,
        })
    }
}

/// A model output quantity readable per element or per time step.
///
/// Reads never mutate the variable and may be issued from several threads.
pub trait Variable: Send + Sync {
    fn spec(&self) -> &VariableSpec;

    /// Timestamps of the time axis.
    fn times(&self) -> &[NaiveDateTime];

    /// Element numbers this variable is defined on, ascending.
    fn elements(&self) -> &[u32];

    /// The full time series at one element.
    ///
    /// # Errors
    ///
    /// Returns [`VariableError::NotFound`] if `number` is not in
    /// [`Variable::elements`].
    fn element_series(&self, number: u32) -> Result<Series, VariableError>;

    /// All element values at time index `t`.
    ///
    /// # Errors
    ///
    /// Returns [`VariableError::OutOfRange`] if `t` is past the time axis.
    fn time_slice(&self, t: usize) -> Result<TimeSlice, VariableError>;

    fn name(&self) -> &'static str {
        self.spec().name
    }

    fn label(&self) -> &'static str {
        self.spec().label
    }

    fn is_river(&self) -> bool {
        self.spec().is_river()
    }

    fn n_times(&self) -> usize {
        self.times().len()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn slice() -> TimeSlice {
        TimeSlice {
            time: NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            elements: vec![1, 2, 4],
            values: vec![0.5, 1.5, 2.5],
        }
    }

    #[test]
    fn lookup_by_element() {
        let s = slice();
        assert_eq!(s.get(2), Some(1.5));
        assert_eq!(s.get(3), None);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn map_keeps_elements() {
        let s = slice().map(|n, v| Ok(n as f64 - v)).unwrap();
        assert_eq!(s.elements, vec![1, 2, 4]);
        assert_eq!(s.values, vec![0.5, 0.5, 1.5]);
    }
}
