//! Accumulated validation utilities.
//!
//! Provides [`ValidationCollector`] for gathering multiple validation errors
//! into a single [`IoError::Validation`], plus the layout check run when a
//! store is opened.

use crate::error::IoError;
use crate::store::{ArrayStore, CONSTANTS};

// ---------------------------------------------------------------------------
// ValidationCollector
// ---------------------------------------------------------------------------

/// Accumulates validation errors and converts them into a single
/// [`IoError::Validation`].
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    /// `Ok(())` if nothing was recorded, otherwise one error joining every
    /// message with `"; "`.
    pub(crate) fn finish(self) -> Result<(), IoError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: self.errors.len(),
                details: self.errors.join("; "),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Store layout
// ---------------------------------------------------------------------------

/// Checks the constant tables every model needs.
///
/// `CONSTANTS/number` must be 2-D or 3-D and `CONSTANTS/surf_elv` must be
/// 1-D. Variables are not checked here; a missing variable is simply not
/// offered.
pub fn check_layout(store: &dyn ArrayStore) -> Result<(), IoError> {
    let mut c = ValidationCollector::new();

    match store.constant("number") {
        Ok(number) if !(2..=3).contains(&number.values.ndim()) => c.push(format!(
            "{CONSTANTS}/number must have 2 or 3 dimensions, found {}",
            number.values.ndim()
        )),
        Ok(_) => {}
        Err(_) => c.push(format!("{CONSTANTS}/number is missing")),
    }

    match store.constant("surf_elv") {
        Ok(elv) if elv.values.ndim() != 1 => c.push(format!(
            "{CONSTANTS}/surf_elv must be 1-D, found {} dimensions",
            elv.values.ndim()
        )),
        Ok(_) => {}
        Err(_) => c.push(format!("{CONSTANTS}/surf_elv is missing")),
    }

    c.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[test]
    fn collector_empty_is_ok() {
        let c = ValidationCollector::new();
        assert_eq!(c.len(), 0);
        assert!(c.finish().is_ok());
    }

    #[test]
    fn collector_joins_messages() {
        let mut c = ValidationCollector::new();
        c.push("error one");
        c.push("error two");
        match c.finish().unwrap_err() {
            IoError::Validation { count, details } => {
                assert_eq!(count, 2);
                assert_eq!(details, "error one; error two");
            }
            other => panic!("expected IoError::Validation, got {other:?}"),
        }
    }

    #[test]
    fn layout_ok() {
        let store = MemoryStore::new("m")
            .with_values("CONSTANTS/number", &[2, 2], vec![1.0, 2.0, 0.0, 3.0])
            .unwrap()
            .with_values("CONSTANTS/surf_elv", &[3], vec![10.0, 11.0, 12.0])
            .unwrap();
        assert!(check_layout(&store).is_ok());
    }

    #[test]
    fn layout_reports_every_problem() {
        let store = MemoryStore::new("m")
            .with_values("CONSTANTS/number", &[4], vec![1.0, 2.0, 0.0, 3.0])
            .unwrap();
        match check_layout(&store).unwrap_err() {
            IoError::Validation { count, details } => {
                assert_eq!(count, 2);
                assert!(details.contains("2 or 3 dimensions"));
                assert!(details.contains("surf_elv is missing"));
            }
            other => panic!("expected IoError::Validation, got {other:?}"),
        }
    }
}
