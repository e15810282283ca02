//! The read-only array store boundary.
//!
//! Model output is addressed by slash-separated paths such as
//! `CONSTANTS/number` or `VARIABLES/  2 ph_depth/value`. Every array is
//! surfaced as `f64`; integer tables (element numbering, bank lists) are
//! converted on read.

use std::sync::Arc;

use ndarray::ArrayD;

use crate::error::IoError;

/// Group holding static per-element tables.
pub const CONSTANTS: &str = "CONSTANTS";
/// Group holding one subgroup per output variable.
pub const VARIABLES: &str = "VARIABLES";

/// An array read from the store together with its `units` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredArray {
    pub values: ArrayD<f64>,
    pub units: Option<String>,
}

impl StoredArray {
    pub fn new(values: ArrayD<f64>) -> Self {
        Self {
            values,
            units: None,
        }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }
}

/// Random-access, read-only view of one model's output.
///
/// Reads are idempotent and may be issued from any thread. Implementations
/// may cache arrays, so repeated reads of the same path are cheap.
pub trait ArrayStore: Send + Sync {
    /// Short description used in logs and errors, usually the file path.
    fn source_name(&self) -> String;

    /// Whether an array exists at `path`.
    fn contains(&self, path: &str) -> bool;

    /// Reads the whole array at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::MissingVariable`] if there is no array at `path`.
    fn read(&self, path: &str) -> Result<Arc<StoredArray>, IoError>;

    /// Names of the direct subgroups of `group`, in storage order.
    fn subgroups(&self, group: &str) -> Result<Vec<String>, IoError>;

    /// Reads `CONSTANTS/<name>`.
    fn constant(&self, name: &str) -> Result<Arc<StoredArray>, IoError> {
        self.read(&format!("{CONSTANTS}/{name}"))
    }

    /// Locates the `VARIABLES` subgroup holding `storage_name`.
    ///
    /// Subgroup names carry a numeric prefix and padding, for example
    /// `"  2 ph_depth"`; the match is on what follows the prefix.
    fn variable_group(&self, storage_name: &str) -> Result<Option<String>, IoError> {
        Ok(self
            .subgroups(VARIABLES)?
            .into_iter()
            .find(|group| strip_ordinal(group) == storage_name))
    }
}

/// The variable name inside a padded `"<n> <name>"` group name.
pub fn strip_ordinal(group: &str) -> &str {
    let trimmed = group.trim();
    match trimmed.split_once(' ') {
        Some((prefix, rest)) if prefix.chars().all(|c| c.is_ascii_digit()) => rest.trim(),
        _ => trimmed,
    }
}
