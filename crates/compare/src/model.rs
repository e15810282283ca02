//! One loaded model run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use hydroscope_elements::{
    CoordinateReference, Element, ElementCatalogue, ElementIndex, ElevationTable,
};
use hydroscope_io::{ArrayStore, NetcdfStore, RasterHeader, check_layout, discharge_path};
use hydroscope_variables::{Variable, VariableId, VariableSet};
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::error::CompareError;

/// A simulation run with its store, element tables and variables.
///
/// The store stays open for as long as the model lives.
pub struct Model {
    name: String,
    store: Box<dyn ArrayStore>,
    index: Arc<ElementIndex>,
    elevations: ElevationTable,
    catalogue: ElementCatalogue,
    variables: VariableSet,
    crs: CoordinateReference,
    catchment: String,
    start_date: NaiveDate,
    directory: PathBuf,
}

impl Model {
    /// Opens the store and terrain raster named in `config`.
    ///
    /// # Errors
    ///
    /// Fails on invalid config, unreadable files, a store missing its
    /// constant tables, or a raster that does not match the numbering grid.
    pub fn load(config: &ModelConfig) -> Result<Self, CompareError> {
        config.validate()?;
        let store = NetcdfStore::open(config.store())?;
        check_layout(&store)?;
        let raster = RasterHeader::read(config.terrain())?;
        Self::from_store(config, Box::new(store), &raster)
    }

    /// Builds a model over an already opened store.
    pub fn from_store(
        config: &ModelConfig,
        store: Box<dyn ArrayStore>,
        raster: &RasterHeader,
    ) -> Result<Self, CompareError> {
        let index = Arc::new(ElementIndex::from_store(store.as_ref())?);
        let elevations = ElevationTable::from_store(store.as_ref())?;
        let crs = config.crs();
        let mut last_logged = 0.0;
        let catalogue = ElementCatalogue::build(&index, &elevations, raster, &crs, |pct| {
            if pct - last_logged >= 10.0 || pct >= 100.0 {
                debug!(model = config.name(), progress = pct, "placing elements");
                last_logged = pct;
            }
        })?;
        let variables =
            VariableSet::load(store.as_ref(), Arc::clone(&index), &elevations, config.start_date())?;

        info!(
            model = config.name(),
            source = %store.source_name(),
            n_land = index.land_elements().len(),
            n_river = index.river_elements().len(),
            n_variables = variables.len(),
            "loaded model"
        );

        Ok(Self {
            name: config.name().to_string(),
            store,
            index,
            elevations,
            catalogue,
            variables,
            crs,
            catchment: config.catchment(),
            start_date: config.start_date(),
            directory: config.directory(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Description of the backing store, usually its path.
    pub fn source_name(&self) -> String {
        self.store.source_name()
    }

    pub fn index(&self) -> &ElementIndex {
        &self.index
    }

    /// The elevation table shared by maps, plots and derived variables.
    pub fn elevations(&self) -> &ElevationTable {
        &self.elevations
    }

    pub fn catalogue(&self) -> &ElementCatalogue {
        &self.catalogue
    }

    pub fn variables(&self) -> &VariableSet {
        &self.variables
    }

    /// The variable `id`, or `NotFound` if this store lacks it.
    pub fn variable(&self, id: VariableId) -> Result<Arc<dyn Variable>, CompareError> {
        self.variables.require(id).map_err(|_| CompareError::NotFound {
            what: format!("variable '{}' in model '{}'", id.spec().name, self.name),
        })
    }

    /// The placed element `number`.
    pub fn element(&self, number: u32) -> Result<&Element, CompareError> {
        self.catalogue.get(number).ok_or_else(|| CompareError::NotFound {
            what: format!("element {number} in model '{}'", self.name),
        })
    }

    pub fn crs(&self) -> CoordinateReference {
        self.crs
    }

    pub fn catchment(&self) -> &str {
        &self.catchment
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Where the outlet discharge file for this run is expected.
    pub fn discharge_path(&self) -> PathBuf {
        discharge_path(&self.directory, &self.catchment)
    }
}

impl Drop for Model {
    fn drop(&mut self) {
        debug!(model = %self.name, source = %self.store.source_name(), "releasing model");
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("name", &self.name)
            .field("source", &self.store.source_name())
            .field("catchment", &self.catchment)
            .field("start_date", &self.start_date)
            .field("variables", &self.variables)
            .finish()
    }
}
