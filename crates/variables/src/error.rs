//! Error types for hydroscope-variables.

use hydroscope_elements::ElementError;

/// Errors raised when reading element series or time slices.
#[derive(Debug, thiserror::Error)]
pub enum VariableError {
    /// Element or variable absent from the relevant index.
    #[error("{what} not found")]
    NotFound {
        /// What was looked up.
        what: String,
    },

    /// A time or array index beyond the stored extent.
    #[error("{axis} index {index} out of range for length {len}")]
    OutOfRange {
        /// Which axis was indexed.
        axis: &'static str,
        /// Requested index.
        index: usize,
        /// Length of the axis.
        len: usize,
    },

    /// Wraps an error originating from the hydroscope-io crate.
    #[error("io error: {reason}")]
    Io {
        /// Description of the underlying failure.
        reason: String,
    },

    /// Wraps an error originating from the hydroscope-series crate.
    #[error("series error: {reason}")]
    Series {
        /// Description of the underlying failure.
        reason: String,
    },

    /// Wraps any other error from the hydroscope-elements crate.
    #[error("element error: {reason}")]
    Element {
        /// Description of the underlying failure.
        reason: String,
    },
}

impl From<ElementError> for VariableError {
    fn from(e: ElementError) -> Self {
        match e {
            ElementError::NotFound { number, context } => VariableError::NotFound {
                what: format!("element {number}{context}"),
            },
            other => VariableError::Element {
                reason: other.to_string(),
            },
        }
    }
}

impl From<hydroscope_io::IoError> for VariableError {
    fn from(e: hydroscope_io::IoError) -> Self {
        VariableError::Io {
            reason: e.to_string(),
        }
    }
}

impl From<hydroscope_series::SeriesError> for VariableError {
    fn from(e: hydroscope_series::SeriesError) -> Self {
        VariableError::Series {
            reason: e.to_string(),
        }
    }
}
