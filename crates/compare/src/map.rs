//! Map frames: every element's value at one time step.

use chrono::NaiveDateTime;
use hydroscope_variables::{TimeSlice, VariableId};
use serde::Serialize;

use crate::comparator::model_at;
use crate::error::CompareError;
use crate::model::Model;

/// Values to colour the element outlines with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFrame {
    pub variable: &'static str,
    pub label: String,
    pub time: NaiveDateTime,
    pub time_index: usize,
    pub river: bool,
    pub elements: Vec<u32>,
    pub values: Vec<f64>,
    /// Colour-scale range.
    pub vmin: f64,
    pub vmax: f64,
    /// Name of the model subtracted, in difference mode.
    pub difference_from: Option<String>,
}

/// Builds the map of `variable` for model `model` at time index `t`,
/// optionally minus model `difference`.
///
/// # Errors
///
/// Fails if a model lacks the variable, `t` is past its time axis, or the
/// two models cover different elements.
pub fn map_frame(
    models: &[Model],
    model: usize,
    variable: VariableId,
    t: usize,
    difference: Option<usize>,
) -> Result<MapFrame, CompareError> {
    let selected = model_at(models, model)?;
    let var = selected.variable(variable)?;
    let mut slice = var.time_slice(t)?;

    let difference_from = match difference {
        Some(other) => {
            let other = model_at(models, other)?;
            let base = other.variable(variable)?.time_slice(t)?;
            slice = subtract(&slice, &base, selected.name(), other.name())?;
            Some(other.name().to_string())
        }
        None => None,
    };
    let (vmin, vmax) = colour_range(&slice.values);

    Ok(MapFrame {
        variable: var.name(),
        label: var.label().to_string(),
        time: slice.time,
        time_index: t,
        river: var.is_river(),
        elements: slice.elements,
        values: slice.values,
        vmin,
        vmax,
        difference_from,
    })
}

fn subtract(
    left: &TimeSlice,
    right: &TimeSlice,
    left_name: &str,
    right_name: &str,
) -> Result<TimeSlice, CompareError> {
    if left.elements != right.elements {
        return Err(CompareError::ShapeMismatch {
            left: left_name.to_string(),
            left_len: left.len(),
            right: right_name.to_string(),
            right_len: right.len(),
        });
    }
    let values = left
        .values
        .iter()
        .zip(&right.values)
        .map(|(a, b)| a - b)
        .collect();
    Ok(TimeSlice {
        time: left.time,
        elements: left.elements.clone(),
        values,
    })
}

/// Finite min and max of `values`. A range with no width (an all-zero
/// slice, for one) becomes `min..min + 1`.
pub fn colour_range(values: &[f64]) -> (f64, f64) {
    let (min, max) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() {
        return (0.0, 1.0);
    }
    if min == max {
        return (min, min + 1.0);
    }
    (min, max)
}
