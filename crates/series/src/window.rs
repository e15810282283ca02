//! Visible time windows and the zoom arithmetic that derives them.

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::error::SeriesError;
use crate::series::Series;

/// Highest zoom level. At this level the window collapses to the cursor.
pub const MAX_ZOOM: u8 = 100;

/// Closed interval `[start, end]` of timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSpan {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeSpan {
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidWindow`] if `start > end`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, SeriesError> {
        if start > end {
            return Err(SeriesError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// The span covering every sample of `series`, or `None` if it is empty.
    pub fn of(series: &Series) -> Option<Self> {
        series
            .bounds()
            .map(|(start, end)| Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn contains(&self, time: NaiveDateTime) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Truncates `series` to the samples inside `span`, inclusive at both ends.
pub fn restrict(series: &Series, span: &TimeSpan) -> Series {
    series.filter_times(|t| span.contains(t))
}

/// The visible range of a time-series plot.
///
/// Derived from the data extent, the cursor time and a zoom level in
/// `0..=100`. Zoom 0 shows the whole extent; each zoom step removes one
/// hundredth of it, split evenly either side of the cursor. A cursor
/// outside the extent is centred on the nearest end. A window that would
/// spill past the extent is shifted back inside it without changing its
/// width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonWindow {
    span: TimeSpan,
    cursor: NaiveDateTime,
    zoom: u8,
}

impl ComparisonWindow {
    pub fn new(extent: TimeSpan, cursor: NaiveDateTime, zoom: u8) -> Self {
        let zoom = zoom.min(MAX_ZOOM);
        let duration = extent.duration();
        let interval = duration / 100;
        let half = (duration - interval * i32::from(zoom)) / 2;

        let centre = cursor.clamp(extent.start, extent.end);
        let mut start = centre - half;
        let mut end = centre + half;
        if start < extent.start {
            let shift = extent.start - start;
            start += shift;
            end += shift;
        }
        if end > extent.end {
            let shift = end - extent.end;
            start -= shift;
            end -= shift;
        }

        Self {
            span: TimeSpan { start, end },
            cursor,
            zoom,
        }
    }

    /// The visible range.
    pub fn span(&self) -> TimeSpan {
        self.span
    }

    pub fn cursor(&self) -> NaiveDateTime {
        self.cursor
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }
}
