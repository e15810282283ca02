//! Series error types.

use chrono::NaiveDateTime;

/// Errors raised while building, combining or scoring series.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// Timestamps are not strictly increasing.
    #[error("timestamps must be strictly increasing: {previous} then {current} at index {index}")]
    Unordered {
        index: usize,
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },

    /// Timestamp and value arrays differ in length.
    #[error("series '{name}' has {times} timestamps but {values} values")]
    LengthMismatch {
        name: String,
        times: usize,
        values: usize,
    },

    /// Two series expected to share a time axis do not.
    #[error("time axes differ: '{left}' has {left_len} steps, '{right}' has {right_len}")]
    ShapeMismatch {
        left: String,
        left_len: usize,
        right: String,
        right_len: usize,
    },

    /// The observed values in the scoring window have no variance.
    #[error("observed variance is zero over {n_pairs} pair(s); efficiency is undefined")]
    ZeroVariance { n_pairs: usize },

    /// A window whose start lies after its end.
    #[error("invalid window: {start} is after {end}")]
    InvalidWindow {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_unordered_display() {
        let err = SeriesError::Unordered {
            index: 2,
            previous: at(3),
            current: at(2),
        };
        let msg = err.to_string();
        assert!(msg.contains("strictly increasing"));
        assert!(msg.contains("index 2"));
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = SeriesError::ShapeMismatch {
            left: "a".to_string(),
            left_len: 10,
            right: "b".to_string(),
            right_len: 12,
        };
        assert_eq!(
            err.to_string(),
            "time axes differ: 'a' has 10 steps, 'b' has 12"
        );
    }

    #[test]
    fn test_zero_variance_display() {
        let err = SeriesError::ZeroVariance { n_pairs: 5 };
        assert!(err.to_string().contains("efficiency is undefined"));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<SeriesError>();
    }
}
