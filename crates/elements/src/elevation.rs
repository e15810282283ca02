//! The per-element surface elevation table.
//!
//! One table per model, shared by the map colouring, the plotted series and
//! the derived water-table variable so that all three read the same values.

use std::sync::Arc;

use hydroscope_io::ArrayStore;

use crate::error::ElementError;

/// Surface elevation (m) indexed by element number. Cloning shares the data.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationTable {
    values: Arc<[f64]>,
}

impl ElevationTable {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values: values.into(),
        }
    }

    /// Reads `CONSTANTS/surf_elv`.
    pub fn from_store(store: &dyn ArrayStore) -> Result<Self, ElementError> {
        let raw = store.constant("surf_elv")?;
        Ok(Self::new(raw.values.iter().copied().collect()))
    }

    /// Elevation of element `number`.
    pub fn get(&self, number: u32) -> Result<f64, ElementError> {
        (number as usize)
            .checked_sub(1)
            .and_then(|i| self.values.get(i))
            .copied()
            .ok_or_else(|| ElementError::not_found(number))
    }

    /// Elevations of `numbers`, in order.
    pub fn select(&self, numbers: &[u32]) -> Result<Vec<f64>, ElementError> {
        numbers.iter().map(|&n| self.get(n)).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
