//! [`ArrayStore`] over a NetCDF-4 / HDF5 file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ndarray::ArrayD;
use netcdf::AttributeValue;
use tracing::{debug, info};

use crate::error::IoError;
use crate::store::{ArrayStore, StoredArray, VARIABLES};

/// A model output file opened read-only for the lifetime of the store.
///
/// Arrays are read whole on first access and cached; the file handle is
/// released when the store is dropped.
pub struct NetcdfStore {
    path: PathBuf,
    file: netcdf::File,
    cache: Mutex<HashMap<String, Arc<StoredArray>>>,
}

impl std::fmt::Debug for NetcdfStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetcdfStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl NetcdfStore {
    /// Opens the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::FileNotFound`] if `path` does not exist, or
    /// [`IoError::Netcdf`] if the library cannot open it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IoError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = netcdf::open(path)?;
        let store = Self {
            path: path.to_path_buf(),
            file,
            cache: Mutex::new(HashMap::new()),
        };
        let n_variables = store.subgroups(VARIABLES).map(|g| g.len()).unwrap_or(0);
        info!(path = %path.display(), n_variables, "opened array store");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_uncached(&self, path: &str) -> Result<StoredArray, IoError> {
        let var = self
            .file
            .variable(path)
            .ok_or_else(|| IoError::MissingVariable {
                name: path.to_string(),
                source_name: self.source_name(),
            })?;

        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let data = var.get_values::<f64, _>(..)?;
        let got = data.len();
        let values = ArrayD::from_shape_vec(shape.clone(), data).map_err(|_| {
            IoError::DimensionMismatch {
                name: path.to_string(),
                expected: shape.iter().product(),
                got,
            }
        })?;

        let units = var
            .attribute_value("units")
            .and_then(|res| res.ok())
            .and_then(|av| match av {
                AttributeValue::Str(s) => Some(s),
                _ => None,
            });

        debug!(path, shape = ?shape, "read array");
        Ok(StoredArray { values, units })
    }
}

impl ArrayStore for NetcdfStore {
    fn source_name(&self) -> String {
        self.path.display().to_string()
    }

    fn contains(&self, path: &str) -> bool {
        self.file.variable(path).is_some()
    }

    fn read(&self, path: &str) -> Result<Arc<StoredArray>, IoError> {
        // entries are inserted whole, so a poisoned map is still consistent
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(hit) = cache.get(path) {
            return Ok(Arc::clone(hit));
        }
        let array = Arc::new(self.read_uncached(path)?);
        cache.insert(path.to_string(), Arc::clone(&array));
        Ok(array)
    }

    fn subgroups(&self, group: &str) -> Result<Vec<String>, IoError> {
        let Some(parent) = self.file.group(group)? else {
            return Ok(Vec::new());
        };
        Ok(parent.groups().map(|g| g.name()).collect())
    }
}
