//! Whole-record summaries of a simulated/observed pair.

use chrono::Datelike;
use hydroscope_stats::{finite_mean, percentiles};
use serde::Serialize;

use crate::align::Joined;
use crate::series::Series;

/// Percentile levels of the flow-duration table: 1, 5, 10, ..., 95, 99.
pub const FLOW_DURATION_LEVELS: [f64; 21] = [
    1.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0, 65.0, 70.0, 75.0,
    80.0, 85.0, 90.0, 95.0, 99.0,
];

/// Percentiles of simulated and observed values at [`FLOW_DURATION_LEVELS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowDuration {
    pub levels: Vec<f64>,
    pub simulated: Vec<f64>,
    pub observed: Vec<f64>,
}

/// Flow-duration percentiles of both sides of a join.
///
/// Returns `None` for an empty join.
pub fn flow_duration(joined: &Joined) -> Option<FlowDuration> {
    let simulated = percentiles(&joined.simulated(), &FLOW_DURATION_LEVELS)?;
    let observed = percentiles(&joined.observed(), &FLOW_DURATION_LEVELS)?;
    Some(FlowDuration {
        levels: FLOW_DURATION_LEVELS.to_vec(),
        simulated,
        observed,
    })
}

/// Mean of the finite values falling in each calendar month, January first.
///
/// Months with no finite value are `None`.
pub fn monthly_water_balance(series: &Series) -> [Option<f64>; 12] {
    let mut by_month: [Vec<f64>; 12] = Default::default();
    for (time, value) in series.iter() {
        by_month[time.month0() as usize].push(value);
    }
    by_month.map(|values| finite_mean(&values))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

    use super::*;
    use crate::align::align;

    fn daily(start: NaiveDate, values: Vec<f64>) -> Series {
        let t0: NaiveDateTime = start.and_hms_opt(0, 0, 0).unwrap();
        let times = (0..values.len())
            .map(|i| t0 + TimeDelta::days(i as i64))
            .collect();
        Series::new("q", times, values).unwrap()
    }

    #[test]
    fn test_levels() {
        assert_eq!(FLOW_DURATION_LEVELS.len(), 21);
        assert_eq!(FLOW_DURATION_LEVELS[0], 1.0);
        assert_eq!(FLOW_DURATION_LEVELS[20], 99.0);
    }

    #[test]
    fn test_flow_duration_median() {
        let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let sim = daily(start, (0..=100).map(f64::from).collect());
        let obs = daily(start, (0..=100).map(|v| f64::from(v) * 2.0).collect());
        let fd = flow_duration(&align(&sim, &obs)).unwrap();
        // 50th percentile sits at index 10
        assert_relative_eq!(fd.simulated[10], 50.0);
        assert_relative_eq!(fd.observed[10], 100.0);
        assert_relative_eq!(fd.simulated[0], 1.0);
        assert_relative_eq!(fd.simulated[20], 99.0);
    }

    #[test]
    fn test_flow_duration_empty() {
        assert!(flow_duration(&Joined::default()).is_none());
    }

    #[test]
    fn test_monthly_water_balance() {
        // 31 days of January then 29 of February 2000
        let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let values: Vec<f64> = (0..60).map(|i| if i < 31 { 1.0 } else { 3.0 }).collect();
        let wb = monthly_water_balance(&daily(start, values));
        assert_relative_eq!(wb[0].unwrap(), 1.0);
        assert_relative_eq!(wb[1].unwrap(), 3.0);
        assert!(wb[2..].iter().all(Option::is_none));
    }

    #[test]
    fn test_monthly_water_balance_pools_years() {
        let a = NaiveDate::from_ymd_opt(2000, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let b = NaiveDate::from_ymd_opt(2001, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let s = Series::new("q", vec![a, b], vec![2.0, 4.0]).unwrap();
        assert_relative_eq!(monthly_water_balance(&s)[2].unwrap(), 3.0);
    }
}
