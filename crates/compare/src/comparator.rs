//! Per-model series for one variable and element.

use hydroscope_io::read_discharge;
use hydroscope_series::Series;
use hydroscope_variables::VariableId;
use tracing::debug;

use crate::error::CompareError;
use crate::model::Model;

/// The model at `index`, or `OutOfRange`.
pub fn model_at(models: &[Model], index: usize) -> Result<&Model, CompareError> {
    models.get(index).ok_or(CompareError::OutOfRange {
        axis: "model",
        index,
        len: models.len(),
    })
}

/// One series per model, in model order, each named after its model.
///
/// # Errors
///
/// Fails with `NotFound` if any model lacks the variable or element.
pub fn collect(
    models: &[Model],
    variable: VariableId,
    element: u32,
) -> Result<Vec<Series>, CompareError> {
    models
        .iter()
        .map(|model| {
            let series = model.variable(variable)?.element_series(element)?;
            Ok(series.with_name(model.name()))
        })
        .collect()
}

/// Model `a` minus model `b` at one element, named `"<a> - <b>"`.
///
/// # Errors
///
/// Returns [`CompareError::ShapeMismatch`] when the two time axes differ in
/// length.
pub fn difference(
    models: &[Model],
    variable: VariableId,
    element: u32,
    a: usize,
    b: usize,
) -> Result<Series, CompareError> {
    let (model_a, model_b) = (model_at(models, a)?, model_at(models, b)?);
    let left = model_a
        .variable(variable)?
        .element_series(element)?
        .with_name(model_a.name());
    let right = model_b
        .variable(variable)?
        .element_series(element)?
        .with_name(model_b.name());
    let name = format!("{} - {}", model_a.name(), model_b.name());
    Ok(left.difference(&right, name)?)
}

/// Simulated outlet discharge, one value per day from the start date.
pub fn discharge_series(model: &Model) -> Result<Series, CompareError> {
    let path = model.discharge_path();
    debug!(model = model.name(), path = %path.display(), "reading outlet discharge");
    Ok(read_discharge(&path, model.start_date(), model.name())?)
}
