//! Observed-series text files.
//!
//! Two-column delimited text with a header row: a date, then a value. The
//! delimiter is sniffed from the header (semicolon, tab, else comma).

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use hydroscope_series::Series;
use tracing::debug;

use crate::error::IoError;

/// Name given to series read by [`read_observed`].
pub const OBSERVED_NAME: &str = "observed";

const DATETIME_FORMATS: &[&str] = &["%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d"];

/// Reads an observed series from `path`.
///
/// Rows are sorted by date; when a date repeats the later row wins. Empty
/// and `NaN` values are kept as missing.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`], [`IoError::Io`], or
/// [`IoError::Parse`] naming the first malformed line.
pub fn read_observed(path: &Path) -> Result<Series, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path).map_err(|e| IoError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_observed(&text, path)
}

/// Parses observed-series text. `path` is only used in error messages.
pub fn parse_observed(text: &str, path: &Path) -> Result<Series, IoError> {
    let header = text.lines().next().unwrap_or_default();
    let delimiter = sniff_delimiter(header);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut pairs = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line() as usize);
        let parse_err = |reason: String| IoError::Parse {
            path: path.to_path_buf(),
            line,
            reason,
        };

        if record.iter().all(str::is_empty) {
            continue;
        }
        let (Some(date), Some(value)) = (record.get(0), record.get(1)) else {
            return Err(parse_err("expected a date and a value".to_string()));
        };
        let time = parse_date(date).ok_or_else(|| parse_err(format!("invalid date '{date}'")))?;
        let value = parse_value(value).ok_or_else(|| parse_err(format!("invalid value '{value}'")))?;
        pairs.push((time, value));
    }

    if pairs.is_empty() {
        return Err(IoError::Parse {
            path: path.to_path_buf(),
            line: 1,
            reason: "no observations".to_string(),
        });
    }

    let series = Series::from_unsorted(OBSERVED_NAME, pairs);
    debug!(path = %path.display(), n = series.len(), "read observed series");
    Ok(series)
}

fn sniff_delimiter(header: &str) -> u8 {
    if header.contains(';') {
        b';'
    } else if header.contains('\t') {
        b'\t'
    } else {
        b','
    }
}

fn parse_date(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_value(text: &str) -> Option<f64> {
    if text.is_empty() || text.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn parse(text: &str) -> Result<Series, IoError> {
        parse_observed(text, Path::new("obs.csv"))
    }

    #[test]
    fn day_first_dates_sorted() {
        let s = parse("date,flow\n03/01/2000,3.5\n01/01/2000,1.5\n02/01/2000,2.5\n").unwrap();
        assert_eq!(s.name(), OBSERVED_NAME);
        assert_eq!(s.times(), &[day(2000, 1, 1), day(2000, 1, 2), day(2000, 1, 3)]);
        assert_eq!(s.values(), &[1.5, 2.5, 3.5]);
    }

    #[test]
    fn duplicate_dates_keep_last() {
        let s = parse("date,flow\n01/01/2000,1\n01/01/2000,9\n").unwrap();
        assert_eq!(s.len(), 1);
        assert_relative_eq!(s.values()[0], 9.0);
    }

    #[test]
    fn semicolon_and_iso_dates() {
        let s = parse("date;flow\n2001-02-03;4.0\n").unwrap();
        assert_eq!(s.times(), &[day(2001, 2, 3)]);
    }

    #[test]
    fn missing_values_are_nan() {
        let s = parse("date,flow\n01/01/2000,\n02/01/2000,NaN\n03/01/2000,1\n").unwrap();
        assert!(s.values()[0].is_nan());
        assert!(s.values()[1].is_nan());
    }

    #[test]
    fn extra_columns_ignored() {
        let s = parse("date,flow,quality\n01/01/2000,2.0,G\n").unwrap();
        assert_eq!(s.values(), &[2.0]);
    }

    #[test]
    fn bad_date_reports_line() {
        let err = parse("date,flow\n01/01/2000,1\n31/02/2000,2\n").unwrap_err();
        match err {
            IoError::Parse { line, reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("31/02/2000"));
            }
            other => panic!("expected IoError::Parse, got {other:?}"),
        }
    }

    #[test]
    fn bad_value_is_error() {
        assert!(matches!(
            parse("date,flow\n01/01/2000,high\n"),
            Err(IoError::Parse { .. })
        ));
    }

    #[test]
    fn single_column_is_error() {
        assert!(matches!(parse("date\n01/01/2000\n"), Err(IoError::Parse { .. })));
    }

    #[test]
    fn header_only_is_error() {
        assert!(matches!(parse("date,flow\n"), Err(IoError::Parse { .. })));
    }

    #[test]
    fn missing_file() {
        let err = read_observed(Path::new("/nonexistent/obs.csv")).unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }
}
