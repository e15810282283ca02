//! Per-element value export.
//!
//! A single header line naming the variable and element, then a CSV table
//! with one `time` column and one column per model.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::NaiveDateTime;
use hydroscope_series::Series;

use crate::error::IoError;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DECIMALS: i32 = 3;

/// Suggested file name for an export of `label` at `element`.
///
/// Slashes in the label (units such as `mm/hr`) become `" per "`.
pub fn export_file_name(label: &str, element: u32) -> String {
    format!("{label} at {element}.csv").replace('/', " per ")
}

/// Writes `header` then one row per timestamp found in any column.
///
/// Values are rounded to 3 decimals. A column without a sample at some
/// timestamp, or with a NaN there, gets an empty cell.
pub fn write_export<W: Write>(
    writer: &mut W,
    header: &str,
    columns: &[Series],
) -> Result<(), IoError> {
    writeln!(writer, "{header}").map_err(csv::Error::from)?;

    let mut rows: BTreeMap<NaiveDateTime, Vec<Option<f64>>> = BTreeMap::new();
    for (c, series) in columns.iter().enumerate() {
        for (time, value) in series.rounded(DECIMALS).iter() {
            let row = rows
                .entry(time)
                .or_insert_with(|| vec![None; columns.len()]);
            row[c] = value.is_finite().then_some(value);
        }
    }

    let mut csv = csv::Writer::from_writer(writer);
    let mut names = vec!["time".to_string()];
    names.extend(columns.iter().map(|s| s.name().to_string()));
    csv.write_record(&names)?;

    for (time, values) in rows {
        let mut record = Vec::with_capacity(values.len() + 1);
        record.push(time.format(TIME_FORMAT).to_string());
        record.extend(
            values
                .into_iter()
                .map(|v| v.map(|x| x.to_string()).unwrap_or_default()),
        );
        csv.write_record(&record)?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// [`write_export`] into a new file at `path`.
pub fn write_export_file(path: &Path, header: &str, columns: &[Series]) -> Result<(), IoError> {
    let file = File::create(path).map_err(|e| IoError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut writer = BufWriter::new(file);
    write_export(&mut writer, header, columns)?;
    writer.flush().map_err(|e| IoError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn file_name_replaces_slashes() {
        assert_eq!(
            export_file_name("Net Rainfall (mm/hr)", 12),
            "Net Rainfall (mm per hr) at 12.csv"
        );
    }

    #[test]
    fn writes_header_and_rounded_table() {
        let a = Series::new("base", vec![day(1), day(2)], vec![1.23456, 2.0]).unwrap();
        let b = Series::new("wet", vec![day(1), day(2)], vec![f64::NAN, 0.0004]).unwrap();
        let mut out = Vec::new();
        write_export(&mut out, "Phreatic Depth (m) at 5 (52.1,-1.2)", &[a, b]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Phreatic Depth (m) at 5 (52.1,-1.2)");
        assert_eq!(lines[1], "time,base,wet");
        assert_eq!(lines[2], "2000-01-01 00:00:00,1.235,");
        assert_eq!(lines[3], "2000-01-02 00:00:00,2,0");
    }

    #[test]
    fn unequal_axes_leave_blanks() {
        let a = Series::new("a", vec![day(1), day(2)], vec![1.0, 2.0]).unwrap();
        let b = Series::new("b", vec![day(2), day(3)], vec![5.0, 6.0]).unwrap();
        let mut out = Vec::new();
        write_export(&mut out, "h", &[a, b]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[2], "2000-01-01 00:00:00,1,");
        assert_eq!(lines[3], "2000-01-02 00:00:00,2,5");
        assert_eq!(lines[4], "2000-01-03 00:00:00,,6");
    }
}
