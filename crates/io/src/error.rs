//! Error types for hydroscope-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the hydroscope-io crate.
///
/// Covers missing files, array-store failures, malformed text inputs and
/// shape problems found while reading model output.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Wraps an error from reading or writing an ordinary file.
    #[error("i/o error on {}: {reason}", path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Wraps an error from the CSV reader or writer.
    #[error("csv error: {reason}")]
    Csv {
        /// Description of the underlying CSV failure.
        reason: String,
    },

    /// Wraps an error originating from the hydroscope-calendar crate.
    #[error("calendar error: {reason}")]
    Calendar {
        /// Description of the underlying calendar failure.
        reason: String,
    },

    /// Wraps an error originating from the hydroscope-series crate.
    #[error("series error: {reason}")]
    Series {
        /// Description of the underlying series failure.
        reason: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Returned when a required array is not present in the store.
    #[error("array '{name}' not found in {source_name}")]
    MissingVariable {
        /// Path of the missing array inside the store.
        name: String,
        /// Store that was inspected.
        source_name: String,
    },

    /// Returned when an array or dimension has an unexpected size.
    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the dimension.
        name: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when a line of a text input cannot be parsed.
    #[error("parse failure in {} at line {line}: {reason}", path.display())]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },
}

impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::Csv {
            reason: e.to_string(),
        }
    }
}

impl From<hydroscope_calendar::CalendarError> for IoError {
    fn from(e: hydroscope_calendar::CalendarError) -> Self {
        IoError::Calendar {
            reason: e.to_string(),
        }
    }
}

impl From<hydroscope_series::SeriesError> for IoError {
    fn from(e: hydroscope_series::SeriesError) -> Self {
        IoError::Series {
            reason: e.to_string(),
        }
    }
}
