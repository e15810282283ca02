//! Writing the compared series to a CSV download.

use std::path::{Path, PathBuf};

use hydroscope_io::{export_file_name, write_export_file};
use hydroscope_variables::VariableId;
use tracing::info;

use crate::comparator::{collect, model_at};
use crate::error::CompareError;
use crate::model::Model;

/// Header line: `"<label> at <n> (<lat>,<lon>)"`, using the centroid from
/// the first model.
pub fn export_header(
    models: &[Model],
    variable: VariableId,
    element: u32,
) -> Result<String, CompareError> {
    let label = variable.spec().label;
    let first = model_at(models, 0)?;
    let (lat, lon) = first.element(element)?.centroid;
    Ok(format!("{label} at {element} ({lat},{lon})"))
}

/// Writes every model's series at `element` into `dir`, named after the
/// variable label and element. Returns the written path.
pub fn export_series(
    models: &[Model],
    variable: VariableId,
    element: u32,
    dir: &Path,
) -> Result<PathBuf, CompareError> {
    let header = export_header(models, variable, element)?;
    let columns = collect(models, variable, element)?;
    let path = dir.join(export_file_name(variable.spec().label, element));
    write_export_file(&path, &header, &columns)?;
    info!(path = %path.display(), n_models = columns.len(), "exported series");
    Ok(path)
}
