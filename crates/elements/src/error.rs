//! Error types for hydroscope-elements.

/// Errors raised while indexing, locating or placing elements.
#[derive(Debug, thiserror::Error)]
pub enum ElementError {
    /// The element number is not part of the relevant set.
    #[error("element {number} not found{context}")]
    NotFound {
        /// The requested element number.
        number: u32,
        /// Extra detail, empty or starting with a separator.
        context: String,
    },

    /// The numbering or elevation tables are inconsistent.
    #[error("invalid numbering: {reason}")]
    InvalidNumbering {
        /// What is inconsistent.
        reason: String,
    },

    /// A coordinate reference string could not be understood.
    #[error("invalid coordinate reference '{text}': {reason}")]
    InvalidCrs {
        /// The text that failed to parse.
        text: String,
        /// Why it failed.
        reason: String,
    },

    /// Wraps an error originating from the hydroscope-io crate.
    #[error("io error: {reason}")]
    Io {
        /// Description of the underlying failure.
        reason: String,
    },
}

impl ElementError {
    pub(crate) fn not_found(number: u32) -> Self {
        ElementError::NotFound {
            number,
            context: String::new(),
        }
    }

    pub(crate) fn not_found_in(number: u32, set: &str) -> Self {
        ElementError::NotFound {
            number,
            context: format!(" among {set} elements"),
        }
    }
}

impl From<hydroscope_io::IoError> for ElementError {
    fn from(e: hydroscope_io::IoError) -> Self {
        ElementError::Io {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_not_found() {
        assert_eq!(ElementError::not_found(42).to_string(), "element 42 not found");
        assert_eq!(
            ElementError::not_found_in(7, "land").to_string(),
            "element 7 not found among land elements"
        );
    }

    #[test]
    fn display_invalid_crs() {
        let err = ElementError::InvalidCrs {
            text: "utm:99Q".to_string(),
            reason: "hemisphere must be N or S".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid coordinate reference 'utm:99Q': hemisphere must be N or S"
        );
    }

    #[test]
    fn from_io_error() {
        let err: ElementError = hydroscope_io::IoError::Netcdf {
            reason: "closed".to_string(),
        }
        .into();
        assert!(matches!(err, ElementError::Io { .. }));
        assert!(err.to_string().contains("closed"));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<ElementError>();
    }
}
