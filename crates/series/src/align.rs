//! As-of join of a simulated series against an observed one.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::series::Series;
use crate::window::TimeSpan;

/// One paired sample of the join.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JoinedRow {
    pub time: NaiveDateTime,
    pub simulated: f64,
    pub observed: f64,
}

/// Rows of an as-of join, ascending by time, all values finite.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Joined {
    rows: Vec<JoinedRow>,
}

impl Joined {
    pub fn rows(&self) -> &[JoinedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn simulated(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.simulated).collect()
    }

    pub fn observed(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.observed).collect()
    }

    /// Rows whose timestamp lies inside `span` (inclusive).
    pub fn restrict(&self, span: &TimeSpan) -> Joined {
        Joined {
            rows: self
                .rows
                .iter()
                .copied()
                .filter(|r| span.contains(r.time))
                .collect(),
        }
    }
}

/// Pairs each sample of `left` with the most recent `right` sample at or
/// before it.
///
/// Left samples that precede every right sample are dropped, as are rows
/// where either value is NaN or infinite.
pub fn align(left: &Series, right: &Series) -> Joined {
    let right_times = right.times();
    let right_values = right.values();
    let mut cursor = 0usize;
    let mut rows = Vec::with_capacity(left.len());

    for (time, simulated) in left.iter() {
        while cursor < right_times.len() && right_times[cursor] <= time {
            cursor += 1;
        }
        // cursor is one past the last right sample at or before `time`
        let Some(idx) = cursor.checked_sub(1) else {
            continue;
        };
        let observed = right_values[idx];
        if simulated.is_finite() && observed.is_finite() {
            rows.push(JoinedRow {
                time,
                simulated,
                observed,
            });
        }
    }

    tracing::trace!(
        left = left.name(),
        right = right.name(),
        left_len = left.len(),
        right_len = right.len(),
        joined = rows.len(),
        "as-of join"
    );
    Joined { rows }
}
