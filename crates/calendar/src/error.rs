//! Error types for the hydroscope-calendar crate.

/// Error type for all fallible operations in the hydroscope-calendar crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a units string is not of the form `"<unit> since <datetime>"`.
    #[error("unexpected time units format: '{units}'")]
    InvalidUnits {
        /// The units string that could not be parsed.
        units: String,
    },

    /// Returned when the unit word is not one of seconds, minutes, hours or days.
    #[error("unknown time unit: '{unit}'")]
    UnknownUnit {
        /// The unrecognised unit word.
        unit: String,
    },

    /// Returned when the reference datetime cannot be parsed.
    #[error("invalid reference datetime: '{value}'")]
    InvalidReference {
        /// The text that failed to parse.
        value: String,
    },

    /// Returned when an offset is NaN or infinite.
    #[error("non-finite time offset at index {index}")]
    NonFiniteOffset {
        /// Position of the offending offset.
        index: usize,
    },

    /// Returned when an offset moves the reference outside chrono's range.
    #[error("time offset {offset} overflows the reference datetime")]
    Overflow {
        /// The offset that overflowed.
        offset: f64,
    },
}
