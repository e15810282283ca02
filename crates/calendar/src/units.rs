//! CF-style time units: `"<unit> since <reference>"`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::error::CalendarError;

/// Datetime layouts accepted for the reference part of a units string.
const REFERENCE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Granularity of a time-coordinate offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Length of one unit in milliseconds.
    pub fn millis(self) -> i64 {
        match self {
            Self::Seconds => 1_000,
            Self::Minutes => 60_000,
            Self::Hours => 3_600_000,
            Self::Days => 86_400_000,
        }
    }
}

impl FromStr for TimeUnit {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Ok(Self::Seconds),
            "min" | "mins" | "minute" | "minutes" => Ok(Self::Minutes),
            "h" | "hr" | "hrs" | "hour" | "hours" => Ok(Self::Hours),
            "d" | "day" | "days" => Ok(Self::Days),
            other => Err(CalendarError::UnknownUnit {
                unit: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
        };
        f.write_str(word)
    }
}

/// A time unit anchored at a reference datetime.
///
/// Offsets stored in a time coordinate are multiples of `unit` counted from
/// `reference`. Decoding rounds each offset to the nearest millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnits {
    unit: TimeUnit,
    reference: NaiveDateTime,
}

impl TimeUnits {
    /// Creates units from an explicit unit and reference.
    pub fn new(unit: TimeUnit, reference: NaiveDateTime) -> Self {
        Self { unit, reference }
    }

    /// Hours counted from midnight on `date`.
    ///
    /// This is the fallback used when a time coordinate has no `units`
    /// attribute: offsets are taken as hours since the model start date.
    pub fn hours_since(date: NaiveDate) -> Self {
        Self::new(TimeUnit::Hours, date.and_hms_opt(0, 0, 0).unwrap_or_default())
    }

    /// Returns the unit.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Returns the reference datetime.
    pub fn reference(&self) -> NaiveDateTime {
        self.reference
    }

    /// Converts one offset into a timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::Overflow`] if the result leaves chrono's range.
    pub fn to_datetime(&self, offset: f64) -> Result<NaiveDateTime, CalendarError> {
        let millis = offset * self.unit.millis() as f64;
        if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
            return Err(CalendarError::Overflow { offset });
        }
        let delta = TimeDelta::try_milliseconds(millis.round() as i64)
            .ok_or(CalendarError::Overflow { offset })?;
        self.reference
            .checked_add_signed(delta)
            .ok_or(CalendarError::Overflow { offset })
    }

    /// Decodes a whole time coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::NonFiniteOffset`] for NaN or infinite entries
    /// and [`CalendarError::Overflow`] for offsets outside chrono's range.
    pub fn decode(&self, offsets: &[f64]) -> Result<Vec<NaiveDateTime>, CalendarError> {
        offsets
            .iter()
            .enumerate()
            .map(|(index, &offset)| {
                if !offset.is_finite() {
                    return Err(CalendarError::NonFiniteOffset { index });
                }
                self.to_datetime(offset)
            })
            .collect()
    }
}

impl FromStr for TimeUnits {
    type Err = CalendarError;

    /// Parses `"hours since 1990-01-01"`, `"days since 2000-01-01 00:00:00"`
    /// and similar. A trailing `Z` or UTC offset on the reference is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalendarError::InvalidUnits {
            units: s.to_string(),
        };

        let trimmed = s.trim();
        let (unit, rest) = trimmed.split_once(' ').ok_or_else(invalid)?;
        let rest = rest.trim_start();
        let reference = rest
            .strip_prefix("since")
            .ok_or_else(invalid)?
            .trim();
        if reference.is_empty() {
            return Err(invalid());
        }

        let unit = unit.parse::<TimeUnit>()?;
        let reference = parse_reference(reference)?;
        Ok(Self { unit, reference })
    }
}

impl fmt::Display for TimeUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} since {}",
            self.unit,
            self.reference.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

fn parse_reference(text: &str) -> Result<NaiveDateTime, CalendarError> {
    let text = text.trim_end_matches('Z');
    // Drop a trailing zone such as "+00:00" or " UTC".
    let text = text.strip_suffix(" UTC").unwrap_or(text);
    let text = match text.rfind('+') {
        Some(pos) if pos > 10 => &text[..pos],
        _ => text,
    };
    let text = text.trim();

    for fmt in REFERENCE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(dt);
        }
    }
    // Fractional seconds are truncated to whole seconds.
    if let Some((whole, _)) = text.split_once('.')
        && let Ok(dt) = NaiveDateTime::parse_from_str(whole, "%Y-%m-%d %H:%M:%S")
    {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| CalendarError::InvalidReference {
            value: text.to_string(),
        })
}
