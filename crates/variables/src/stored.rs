//! Variables read directly from the array store.

use std::sync::Arc;

use chrono::NaiveDateTime;
use hydroscope_calendar::TimeUnits;
use hydroscope_elements::ElementIndex;
use hydroscope_io::{ArrayStore, IoError, VARIABLES};
use hydroscope_series::Series;
use ndarray::{Array3, ArrayD, Axis, Ix2, Ix3, s};
use tracing::{debug, warn};

use crate::error::VariableError;
use crate::registry::{ShapeClass, VariableSpec};
use crate::variable::{TimeSlice, Variable};

/// Where one element's values live in the value array.
enum Location<'a> {
    Row(usize),
    Cells(&'a [(usize, usize)]),
}

/// A variable backed by a `VARIABLES/<n> <name>` group.
///
/// Values are held as a three-axis array. Land and river arrays without a
/// layer axis get a unit-length one, so every read is `[row, layer, t]` or,
/// for grid variables, `[row, col, t]`.
#[derive(Debug, Clone)]
pub struct StoredVariable {
    spec: VariableSpec,
    index: Arc<ElementIndex>,
    values: Arc<Array3<f64>>,
    times: Vec<NaiveDateTime>,
    elements: Vec<u32>,
}

impl StoredVariable {
    /// Loads `spec` from `store`.
    ///
    /// Returns `Ok(None)` when the variable is not in the store or its
    /// arrays do not fit the element numbering. Time offsets without a
    /// `units` attribute are decoded with `default_units`.
    ///
    /// # Errors
    ///
    /// Propagates store read failures and undecodable time units.
    pub fn open(
        store: &dyn ArrayStore,
        spec: VariableSpec,
        index: Arc<ElementIndex>,
        default_units: TimeUnits,
    ) -> Result<Option<Self>, VariableError> {
        let source = store.source_name();
        let Some(group) = store.variable_group(spec.storage_name)? else {
            debug!(variable = spec.name, source = %source, "variable not stored");
            return Ok(None);
        };
        let value_path = format!("{VARIABLES}/{group}/value");
        let time_path = format!("{VARIABLES}/{group}/time");
        if !store.contains(&value_path) || !store.contains(&time_path) {
            warn!(
                variable = spec.name,
                source = %source,
                group = %group,
                "variable group lacks value or time"
            );
            return Ok(None);
        }

        let time = store.read(&time_path)?;
        let units = match time.units.as_deref() {
            Some(text) => text.parse::<TimeUnits>().map_err(IoError::from)?,
            None => default_units,
        };
        let offsets: Vec<f64> = time.values.iter().copied().collect();
        let times = units.decode(&offsets).map_err(IoError::from)?;
        if let Some(i) = times.windows(2).position(|w| w[0] >= w[1]) {
            warn!(
                variable = spec.name,
                source = %source,
                index = i + 1,
                "time axis is not strictly increasing, skipping variable"
            );
            return Ok(None);
        }

        let raw = store.read(&value_path)?;
        let values = match shape_values(&spec, &index, &raw.values, times.len()) {
            Ok(values) => values,
            Err(reason) => {
                warn!(variable = spec.name, source = %source, %reason, "skipping variable");
                return Ok(None);
            }
        };

        debug!(
            variable = spec.name,
            source = %source,
            shape = ?values.dim(),
            n_times = times.len(),
            "opened variable"
        );
        Ok(Some(Self::from_parts(spec, index, values, times)))
    }

    /// Builds a variable from an already shaped array.
    ///
    /// `values` must be `[rows, cols, t]` for grid variables and
    /// `[n, layers, t]` otherwise, with `t == times.len()`.
    pub fn from_parts(
        spec: VariableSpec,
        index: Arc<ElementIndex>,
        values: Array3<f64>,
        times: Vec<NaiveDateTime>,
    ) -> Self {
        let elements = match spec.shape_class {
            ShapeClass::Grid | ShapeClass::Land => index.land_elements().to_vec(),
            ShapeClass::River => index.river_elements().to_vec(),
        };
        Self {
            spec,
            index,
            values: Arc::new(values),
            times,
            elements,
        }
    }

    fn locate(&self, number: u32) -> Result<Location<'_>, VariableError> {
        match self.spec.shape_class {
            ShapeClass::Grid => {
                if self.index.is_excluded(number) {
                    return Err(VariableError::NotFound {
                        what: format!("element {number} among land elements"),
                    });
                }
                Ok(Location::Cells(self.index.grid_cells(number)?))
            }
            ShapeClass::Land => Ok(Location::Row(self.index.land_row(number)?)),
            ShapeClass::River => Ok(Location::Row(self.index.river_row(number)?)),
        }
    }

    fn value_at(&self, location: &Location<'_>, t: usize) -> f64 {
        let reduction = self.spec.reduction;
        match *location {
            Location::Row(row) => reduction.apply(self.values.slice(s![row, .., t]).iter().copied()),
            Location::Cells(cells) => {
                reduction.apply(cells.iter().map(|&(r, c)| self.values[[r, c, t]]))
            }
        }
    }
}

/// Reshapes a raw value array into the three-axis layout, or says why it
/// does not fit.
fn shape_values(
    spec: &VariableSpec,
    index: &ElementIndex,
    raw: &ArrayD<f64>,
    n_times: usize,
) -> Result<Array3<f64>, String> {
    let shape = raw.shape();
    let expected_rows = match spec.shape_class {
        ShapeClass::Grid => {
            let (rows, cols) = index.grid_shape();
            if shape != [rows, cols, n_times] {
                return Err(format!(
                    "expected [{rows}, {cols}, {n_times}], found {shape:?}"
                ));
            }
            return raw
                .clone()
                .into_dimensionality::<Ix3>()
                .map_err(|e| e.to_string());
        }
        ShapeClass::Land => index.n_land(),
        ShapeClass::River => index.n_river(),
    };

    match shape {
        [rows, t] if *rows == expected_rows && *t == n_times => Ok(raw
            .clone()
            .into_dimensionality::<Ix2>()
            .map_err(|e| e.to_string())?
            .insert_axis(Axis(1))),
        [rows, layers, t]
            if spec.layered && *rows == expected_rows && *layers > 0 && *t == n_times =>
        {
            raw.clone()
                .into_dimensionality::<Ix3>()
                .map_err(|e| e.to_string())
        }
        _ => {
            let layer = if spec.layered { ", layers" } else { "" };
            Err(format!(
                "expected [{expected_rows}{layer}, {n_times}], found {shape:?}"
            ))
        }
    }
}

impl Variable for StoredVariable {
    fn spec(&self) -> &VariableSpec {
        &self.spec
    }

    fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    fn elements(&self) -> &[u32] {
        &self.elements
    }

    fn element_series(&self, number: u32) -> Result<Series, VariableError> {
        let location = self.locate(number)?;
        let values = (0..self.times.len())
            .map(|t| self.value_at(&location, t))
            .collect();
        Ok(Series::new(self.spec.name, self.times.clone(), values)?)
    }

    fn time_slice(&self, t: usize) -> Result<TimeSlice, VariableError> {
        let time = *self.times.get(t).ok_or(VariableError::OutOfRange {
            axis: "time",
            index: t,
            len: self.times.len(),
        })?;
        let values = self
            .elements
            .iter()
            .map(|&n| Ok(self.value_at(&self.locate(n)?, t)))
            .collect::<Result<Vec<_>, VariableError>>()?;
        Ok(TimeSlice {
            time,
            elements: self.elements.clone(),
            values,
        })
    }
}
