//! In-memory [`ArrayStore`] for fixtures and synthetic models.

use std::collections::BTreeMap;
use std::sync::Arc;

use ndarray::ArrayD;

use crate::error::IoError;
use crate::store::{ArrayStore, StoredArray};

/// An [`ArrayStore`] backed by a map of paths to arrays.
///
/// Groups are implied by the paths: inserting `VARIABLES/1 theta/value`
/// makes `1 theta` a subgroup of `VARIABLES`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    name: String,
    arrays: BTreeMap<String, Arc<StoredArray>>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arrays: BTreeMap::new(),
        }
    }

    /// Adds an array at `path`, replacing any previous one.
    pub fn with_array(mut self, path: impl Into<String>, array: StoredArray) -> Self {
        self.insert(path, array);
        self
    }

    /// Adds a unitless array built from `shape` and row-major `data`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::DimensionMismatch`] if `data` does not fill `shape`.
    pub fn with_values(
        self,
        path: impl Into<String>,
        shape: &[usize],
        data: Vec<f64>,
    ) -> Result<Self, IoError> {
        let path = path.into();
        let expected: usize = shape.iter().product();
        let got = data.len();
        let values =
            ArrayD::from_shape_vec(shape.to_vec(), data).map_err(|_| IoError::DimensionMismatch {
                name: path.clone(),
                expected,
                got,
            })?;
        Ok(self.with_array(path, StoredArray::new(values)))
    }

    pub fn insert(&mut self, path: impl Into<String>, array: StoredArray) {
        self.arrays.insert(path.into(), Arc::new(array));
    }
}

impl ArrayStore for MemoryStore {
    fn source_name(&self) -> String {
        self.name.clone()
    }

    fn contains(&self, path: &str) -> bool {
        self.arrays.contains_key(path)
    }

    fn read(&self, path: &str) -> Result<Arc<StoredArray>, IoError> {
        self.arrays
            .get(path)
            .cloned()
            .ok_or_else(|| IoError::MissingVariable {
                name: path.to_string(),
                source_name: self.name.clone(),
            })
    }

    fn subgroups(&self, group: &str) -> Result<Vec<String>, IoError> {
        let prefix = format!("{group}/");
        let mut names: Vec<String> = Vec::new();
        for path in self.arrays.keys() {
            if let Some(rest) = path.strip_prefix(&prefix)
                && let Some((child, _)) = rest.split_once('/')
                && !names.iter().any(|n| n == child)
            {
                names.push(child.to_string());
            }
        }
        Ok(names)
    }
}
