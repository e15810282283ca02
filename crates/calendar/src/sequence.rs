//! Daily timestamp sequences.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Generates `n_days` consecutive midnights starting at `start`.
///
/// Used for files whose rows are implicitly one simulated day apart, such as
/// the outlet discharge output. Stops early if the calendar overflows.
pub fn daily_sequence(start: NaiveDate, n_days: usize) -> Vec<NaiveDateTime> {
    let mut times = Vec::with_capacity(n_days);
    let Some(mut current) = start.and_hms_opt(0, 0, 0) else {
        return times;
    };
    for _ in 0..n_days {
        times.push(current);
        match current.checked_add_signed(TimeDelta::days(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    times
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty() {
        assert!(daily_sequence(date(2000, 1, 1), 0).is_empty());
    }

    #[test]
    fn single() {
        let times = daily_sequence(date(2000, 6, 15), 1);
        assert_eq!(times.len(), 1);
        assert_eq!(times[0].date(), date(2000, 6, 15));
    }

    #[test]
    fn crosses_leap_day() {
        let times = daily_sequence(date(2000, 2, 28), 3);
        assert_eq!(times[1].date(), date(2000, 2, 29));
        assert_eq!(times[2].date(), date(2000, 3, 1));
    }

    #[test]
    fn year_transition() {
        let times = daily_sequence(date(1999, 12, 30), 4);
        assert_eq!(times[2].date(), date(2000, 1, 1));
        assert_eq!(times[3].date(), date(2000, 1, 2));
    }

    #[test]
    fn strictly_increasing() {
        let times = daily_sequence(date(1990, 1, 1), 400);
        assert_eq!(times.len(), 400);
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }
}
