//! Simulated outlet discharge files.
//!
//! One value per line, one line per simulated day, named after the
//! catchment. A leading non-numeric header line is skipped.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use hydroscope_calendar::daily_sequence;
use hydroscope_series::Series;
use tracing::debug;

use crate::error::IoError;

/// File name of the outlet discharge output for `catchment`.
pub fn discharge_file_name(catchment: &str) -> String {
    format!("output_{catchment}_discharge_sim_regulartimestep.txt")
}

/// Path of the outlet discharge file for `catchment` inside `dir`.
pub fn discharge_path(dir: &Path, catchment: &str) -> PathBuf {
    dir.join(discharge_file_name(catchment))
}

/// Reads a discharge file, dating row `i` as `start + i` days.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`], [`IoError::Io`], or
/// [`IoError::Parse`] for a non-numeric row after the first.
pub fn read_discharge(path: &Path, start: NaiveDate, name: &str) -> Result<Series, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = fs::read_to_string(path).map_err(|e| IoError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_discharge(&text, path, start, name)
}

/// Parses discharge text. `path` is only used in error messages.
pub fn parse_discharge(
    text: &str,
    path: &Path,
    start: NaiveDate,
    name: &str,
) -> Result<Series, IoError> {
    let mut values = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let field = line.split(',').next().unwrap_or_default().trim();
        if field.is_empty() {
            continue;
        }
        match field.parse::<f64>() {
            Ok(v) => values.push(v),
            Err(_) if i == 0 => debug!(header = field, "skipping discharge header"),
            Err(_) => {
                return Err(IoError::Parse {
                    path: path.to_path_buf(),
                    line: i + 1,
                    reason: format!("invalid discharge value '{field}'"),
                });
            }
        }
    }

    let times = daily_sequence(start, values.len());
    if times.len() != values.len() {
        return Err(IoError::Parse {
            path: path.to_path_buf(),
            line: times.len() + 1,
            reason: format!("date overflow after {} days from {start}", times.len()),
        });
    }
    Ok(Series::new(name, times, values)?)
}
