//! Comparison error types.

use hydroscope_elements::ElementError;
use hydroscope_io::IoError;
use hydroscope_series::SeriesError;
use hydroscope_variables::VariableError;

/// Errors raised while loading models or building comparison frames.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// One or more configuration checks failed.
    #[error("{count} validation error(s): {details}")]
    Validation { count: usize, details: String },

    /// A model, element or variable is absent.
    #[error("{what} not found")]
    NotFound { what: String },

    /// A model or time index beyond its extent.
    #[error("{axis} index {index} out of range for length {len}")]
    OutOfRange {
        axis: &'static str,
        index: usize,
        len: usize,
    },

    /// Two series expected to share a time axis do not.
    #[error("time axes differ: '{left}' has {left_len} steps, '{right}' has {right_len}")]
    ShapeMismatch {
        left: String,
        left_len: usize,
        right: String,
        right_len: usize,
    },

    /// A malformed observed-series or discharge file.
    #[error("parse failure: {reason}")]
    ParseFailure { reason: String },

    /// Wraps other errors from the hydroscope-io crate.
    #[error("io error: {reason}")]
    Io { reason: String },

    /// Wraps other errors from the hydroscope-elements crate.
    #[error("element error: {reason}")]
    Element { reason: String },

    /// Wraps other errors from the hydroscope-variables crate.
    #[error("variable error: {reason}")]
    Variable { reason: String },

    /// Wraps other errors from the hydroscope-series crate.
    #[error("series error: {reason}")]
    Series { reason: String },
}

impl From<IoError> for CompareError {
    fn from(e: IoError) -> Self {
        match e {
            IoError::Parse { .. } => CompareError::ParseFailure {
                reason: e.to_string(),
            },
            IoError::FileNotFound { path } => CompareError::NotFound {
                what: format!("file '{}'", path.display()),
            },
            other => CompareError::Io {
                reason: other.to_string(),
            },
        }
    }
}

impl From<ElementError> for CompareError {
    fn from(e: ElementError) -> Self {
        match e {
            ElementError::NotFound { number, context } => CompareError::NotFound {
                what: format!("element {number}{context}"),
            },
            other => CompareError::Element {
                reason: other.to_string(),
            },
        }
    }
}

impl From<VariableError> for CompareError {
    fn from(e: VariableError) -> Self {
        match e {
            VariableError::NotFound { what } => CompareError::NotFound { what },
            VariableError::OutOfRange { axis, index, len } => {
                CompareError::OutOfRange { axis, index, len }
            }
            other => CompareError::Variable {
                reason: other.to_string(),
            },
        }
    }
}

impl From<SeriesError> for CompareError {
    fn from(e: SeriesError) -> Self {
        match e {
            SeriesError::ShapeMismatch {
                left,
                left_len,
                right,
                right_len,
            } => CompareError::ShapeMismatch {
                left,
                left_len,
                right,
                right_len,
            },
            other => CompareError::Series {
                reason: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = CompareError::Validation {
            count: 2,
            details: "name is empty; store path is empty".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("2 validation error(s)"));
        assert!(msg.contains("store path is empty"));
    }

    #[test]
    fn test_shape_mismatch_from_series() {
        let err: CompareError = SeriesError::ShapeMismatch {
            left: "a".to_string(),
            left_len: 3,
            right: "b".to_string(),
            right_len: 4,
        }
        .into();
        assert!(matches!(err, CompareError::ShapeMismatch { left_len: 3, right_len: 4, .. }));
        assert_eq!(err.to_string(), "time axes differ: 'a' has 3 steps, 'b' has 4");
    }

    #[test]
    fn test_variable_errors_keep_their_kind() {
        let err: CompareError = VariableError::OutOfRange {
            axis: "time",
            index: 5,
            len: 2,
        }
        .into();
        assert!(matches!(err, CompareError::OutOfRange { index: 5, len: 2, .. }));

        let err: CompareError = VariableError::NotFound {
            what: "element 9".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "element 9 not found");
    }

    #[test]
    fn test_parse_error_from_io() {
        let err: CompareError = IoError::Parse {
            path: "obs.csv".into(),
            line: 3,
            reason: "bad date".to_string(),
        }
        .into();
        assert!(matches!(err, CompareError::ParseFailure { .. }));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + std::error::Error>() {}
        assert_send_sync::<CompareError>();
    }
}
