//! Goodness-of-fit scores over a joined series.

use hydroscope_stats::{mean, pearson_correlation, sum_sq_dev};
use serde::Serialize;

use crate::align::Joined;
use crate::error::SeriesError;

/// Nash–Sutcliffe efficiency of the joined rows.
///
/// `1 - Σ(sim - obs)² / Σ(obs - mean(obs))²`. 1.0 is a perfect fit, 0.0 is
/// no better than the observed mean, negative is worse.
///
/// # Errors
///
/// Returns [`SeriesError::ZeroVariance`] when the observed values are
/// constant or there are no rows.
pub fn nash_sutcliffe(joined: &Joined) -> Result<f64, SeriesError> {
    let observed = joined.observed();
    let n_pairs = observed.len();

    let constant = observed.windows(2).all(|w| w[0] == w[1]);
    let denominator = sum_sq_dev(&observed);
    if constant || denominator == 0.0 {
        return Err(SeriesError::ZeroVariance { n_pairs });
    }

    let numerator: f64 = joined
        .rows()
        .iter()
        .map(|r| (r.simulated - r.observed).powi(2))
        .sum();
    Ok(1.0 - numerator / denominator)
}

/// Scores reported alongside a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub n_pairs: usize,
    /// `None` when the observed values have no variance.
    pub nse: Option<f64>,
    pub pearson_r: Option<f64>,
    /// Mean simulated minus mean observed.
    pub bias: Option<f64>,
}

pub fn summarise(joined: &Joined) -> ScoreSummary {
    let simulated = joined.simulated();
    let observed = joined.observed();
    let nse = match nash_sutcliffe(joined) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!(error = %e, "efficiency undefined");
            None
        }
    };
    ScoreSummary {
        n_pairs: joined.len(),
        nse,
        pearson_r: pearson_correlation(&simulated, &observed),
        bias: (!joined.is_empty()).then(|| mean(&simulated) - mean(&observed)),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::align::align;
    use crate::series::Series;

    fn days(n: u32) -> Vec<NaiveDateTime> {
        (1..=n)
            .map(|d| {
                NaiveDate::from_ymd_opt(2000, 1, d)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_three_day_example() {
        let sim = Series::new("sim", days(3), vec![2.0, 4.0, 6.0]).unwrap();
        let obs = Series::new("obs", days(3), vec![2.0, 5.0, 6.0]).unwrap();
        let joined = align(&sim, &obs);
        assert_eq!(joined.len(), 3);
        // Σ(obs - mean)² = 26/3, Σ(sim - obs)² = 1
        assert_relative_eq!(nash_sutcliffe(&joined).unwrap(), 1.0 - 3.0 / 26.0, epsilon = 1e-12);
    }

    #[test]
    fn test_identical_series_score_one() {
        let s = Series::new("s", days(5), vec![1.0, 3.0, 2.0, 8.0, 4.0]).unwrap();
        assert_relative_eq!(nash_sutcliffe(&align(&s, &s)).unwrap(), 1.0);
    }

    #[test]
    fn test_mean_prediction_scores_zero() {
        let sim = Series::new("sim", days(3), vec![2.0, 2.0, 2.0]).unwrap();
        let obs = Series::new("obs", days(3), vec![1.0, 2.0, 3.0]).unwrap();
        assert_relative_eq!(nash_sutcliffe(&align(&sim, &obs)).unwrap(), 0.0);
    }

    #[test]
    fn test_constant_observed_is_zero_variance() {
        let sim = Series::new("sim", days(3), vec![1.0, 2.0, 3.0]).unwrap();
        let obs = Series::new("obs", days(3), vec![0.1, 0.1, 0.1]).unwrap();
        let err = nash_sutcliffe(&align(&sim, &obs)).unwrap_err();
        assert_eq!(err, SeriesError::ZeroVariance { n_pairs: 3 });
    }

    #[test]
    fn test_empty_join_is_zero_variance() {
        let err = nash_sutcliffe(&Joined::default()).unwrap_err();
        assert_eq!(err, SeriesError::ZeroVariance { n_pairs: 0 });
    }

    #[test]
    fn test_summary() {
        let sim = Series::new("sim", days(4), vec![2.0, 3.0, 4.0, 5.0]).unwrap();
        let obs = Series::new("obs", days(4), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let s = summarise(&align(&sim, &obs));
        assert_eq!(s.n_pairs, 4);
        assert_relative_eq!(s.bias.unwrap(), 1.0);
        assert_relative_eq!(s.pearson_r.unwrap(), 1.0, epsilon = 1e-12);
        // Σ(sim-obs)² = 4, Σ(obs-mean)² = 5
        assert_relative_eq!(s.nse.unwrap(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_summary_of_empty_join() {
        let s = summarise(&Joined::default());
        assert_eq!(s.n_pairs, 0);
        assert!(s.nse.is_none());
        assert!(s.bias.is_none());
    }
}
