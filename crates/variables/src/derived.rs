//! Variables computed from a stored variable and the surface elevation.

use std::sync::Arc;

use chrono::NaiveDateTime;
use hydroscope_elements::ElevationTable;
use hydroscope_series::Series;

use crate::error::VariableError;
use crate::registry::VariableSpec;
use crate::variable::{TimeSlice, Variable};

/// `elevation[n] - base[n, t]`, for example water-table elevation from
/// phreatic depth.
///
/// The elevation table is the model's shared one, so the map colouring and
/// plotted series agree.
#[derive(Clone)]
pub struct DerivedVariable {
    spec: VariableSpec,
    base: Arc<dyn Variable>,
    elevations: ElevationTable,
}

impl DerivedVariable {
    pub fn new(spec: VariableSpec, base: Arc<dyn Variable>, elevations: ElevationTable) -> Self {
        Self {
            spec,
            base,
            elevations,
        }
    }

    pub fn base(&self) -> &Arc<dyn Variable> {
        &self.base
    }
}

impl std::fmt::Debug for DerivedVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedVariable")
            .field("name", &self.spec.name)
            .field("base", &self.base.name())
            .finish()
    }
}

impl Variable for DerivedVariable {
    fn spec(&self) -> &VariableSpec {
        &self.spec
    }

    fn times(&self) -> &[NaiveDateTime] {
        self.base.times()
    }

    fn elements(&self) -> &[u32] {
        self.base.elements()
    }

    fn element_series(&self, number: u32) -> Result<Series, VariableError> {
        let base = self.base.element_series(number)?;
        let elevation = self.elevations.get(number)?;
        Ok(base
            .map_values(|depth| elevation - depth)
            .with_name(self.spec.name))
    }

    fn time_slice(&self, t: usize) -> Result<TimeSlice, VariableError> {
        self.base
            .time_slice(t)?
            .map(|n, depth| Ok(self.elevations.get(n)? - depth))
    }
}
