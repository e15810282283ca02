//! End-to-end checks of the resample, align, restrict and score pipeline.

use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use hydroscope_series::{
    ComparisonWindow, Period, Series, SeriesError, TimeSpan, align, nash_sutcliffe, resample,
    restrict, summarise,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn daily(name: &str, n: usize, f: impl Fn(usize) -> f64) -> Series {
    let times = (0..n).map(|i| t0() + TimeDelta::days(i as i64)).collect();
    let values = (0..n).map(f).collect();
    Series::new(name, times, values).unwrap()
}

/// Observed readings taken mid-morning, a few hours after each simulated step.
fn observed_offset(n: usize, f: impl Fn(usize) -> f64) -> Series {
    let times = (0..n)
        .map(|i| t0() + TimeDelta::days(i as i64) + TimeDelta::hours(9))
        .collect();
    let values = (0..n).map(f).collect();
    Series::new("observed", times, values).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn full_extent_window_keeps_every_row() {
    // 350 daily steps end on 15 December; the December mean is labelled the 31st.
    let raw_sim = daily("sim", 350, |i| (i as f64 / 20.0).sin() + 2.0);
    let sim = resample(&raw_sim, Period::Monthly);
    let obs = resample(&daily("obs", 350, |i| (i as f64 / 21.0).sin() + 2.0), Period::Monthly);

    let joined = align(&sim, &obs);
    assert_eq!(joined.len(), 12);

    let plotted = TimeSpan::of(&sim).unwrap();
    assert_eq!(joined.restrict(&plotted), joined);
    let via_restrict = align(&restrict(&sim, &plotted), &restrict(&obs, &plotted));
    assert_eq!(via_restrict, joined);

    // The daily axis stops short of the last month-end label.
    let raw = TimeSpan::of(&raw_sim).unwrap();
    assert_eq!(joined.restrict(&raw).len(), 11);
}

#[test]
fn offset_observations_pair_with_previous_day() {
    let sim = daily("sim", 10, |i| i as f64);
    let obs = observed_offset(10, |i| i as f64 + 0.5);

    // sim at day i midnight pairs with obs from day i-1 at 09:00
    let joined = align(&sim, &obs);
    assert_eq!(joined.len(), 9);
    assert_relative_eq!(joined.rows()[0].simulated, 1.0);
    assert_relative_eq!(joined.rows()[0].observed, 0.5);
}

#[test]
fn narrowing_window_changes_score() {
    let sim = daily("sim", 100, |i| if i < 50 { i as f64 } else { 100.0 - i as f64 });
    let obs = daily("obs", 100, |i| i as f64);
    let joined = align(&sim, &obs);

    let extent = TimeSpan::of(&sim).unwrap();
    let whole = nash_sutcliffe(&joined).unwrap();

    let early = ComparisonWindow::new(extent, t0(), 60);
    let early_score = nash_sutcliffe(&joined.restrict(&early.span())).unwrap();

    assert_relative_eq!(early_score, 1.0);
    assert!(whole < early_score);
}

#[test]
fn difference_of_identical_runs_is_zero() {
    let a = daily("a", 30, |i| (i * i) as f64);
    let d = a.difference(&a, "a - a").unwrap();
    assert!(d.values().iter().all(|&v| v == 0.0));
    assert_eq!(d.times(), a.times());
}

#[test]
fn constant_observed_reports_zero_variance() {
    let sim = daily("sim", 20, |i| i as f64);
    let obs = daily("obs", 20, |_| 4.2);
    let joined = align(&sim, &obs);
    assert_eq!(
        nash_sutcliffe(&joined),
        Err(SeriesError::ZeroVariance { n_pairs: 20 })
    );
    assert!(summarise(&joined).nse.is_none());
}
