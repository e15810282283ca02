//! Model and view configuration.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use hydroscope_elements::CoordinateReference;
use hydroscope_series::MAX_ZOOM;

use crate::error::CompareError;

/// How to load one model run.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    name: String,
    store: PathBuf,
    terrain: PathBuf,
    catchment: Option<String>,
    start_date: NaiveDate,
    crs: CoordinateReference,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "model".to_string(),
            store: PathBuf::new(),
            terrain: PathBuf::new(),
            catchment: None,
            start_date: NaiveDate::default(),
            crs: CoordinateReference::default(),
        }
    }
}

impl ModelConfig {
    /// Config for the store at `store` with its terrain raster at `terrain`.
    pub fn new(store: impl Into<PathBuf>, terrain: impl Into<PathBuf>) -> Self {
        Self {
            store: store.into(),
            terrain: terrain.into(),
            ..Self::default()
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the catchment name used to find the outlet discharge file.
    pub fn with_catchment(mut self, catchment: impl Into<String>) -> Self {
        self.catchment = Some(catchment.into());
        self
    }

    /// Set the simulation start date.
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = date;
        self
    }

    /// Set the grid's coordinate reference.
    pub fn with_crs(mut self, crs: CoordinateReference) -> Self {
        self.crs = crs;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> &Path {
        &self.store
    }

    pub fn terrain(&self) -> &Path {
        &self.terrain
    }

    /// The catchment name, defaulting to the store's file stem.
    pub fn catchment(&self) -> String {
        match &self.catchment {
            Some(c) => c.clone(),
            None => self
                .store
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn crs(&self) -> CoordinateReference {
        self.crs
    }

    /// Directory holding the store and its companion files.
    pub fn directory(&self) -> PathBuf {
        self.store
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    /// Check all fields.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::Validation`] listing every failed check.
    pub fn validate(&self) -> Result<(), CompareError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("name is empty".to_string());
        }
        if self.store.as_os_str().is_empty() {
            errors.push("store path is empty".to_string());
        }
        if self.terrain.as_os_str().is_empty() {
            errors.push("terrain path is empty".to_string());
        }
        if let Some(c) = &self.catchment
            && (c.trim().is_empty() || c.contains(['/', '\\']))
        {
            errors.push(format!("catchment '{c}' is not a plain name"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CompareError::Validation {
                count: errors.len(),
                details: errors.join("; "),
            })
        }
    }
}

/// Initial view settings of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewConfig {
    monthly_means: bool,
    zoom: u8,
}

impl ViewConfig {
    /// Plot monthly means instead of native samples.
    pub fn with_monthly_means(mut self, monthly: bool) -> Self {
        self.monthly_means = monthly;
        self
    }

    /// Set the zoom level, `0..=100`.
    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn monthly_means(&self) -> bool {
        self.monthly_means
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn validate(&self) -> Result<(), CompareError> {
        if self.zoom > MAX_ZOOM {
            return Err(CompareError::Validation {
                count: 1,
                details: format!("zoom {} exceeds {MAX_ZOOM}", self.zoom),
            });
        }
        Ok(())
    }
}
