//! Time-series plot frames.
//!
//! Each line is resampled first (when monthly means are on), then joined
//! against the observed overlay, restricted to the visible window and
//! scored. The window is taken over the plotted (resampled) lines, so at
//! zoom 0 it covers every plotted point.

use chrono::NaiveDateTime;
use hydroscope_series::{
    ComparisonWindow, FlowDuration, Period, ScoreSummary, Series, TimeSpan, align, flow_duration,
    monthly_water_balance, resample, summarise,
};
use hydroscope_variables::VariableId;
use serde::Serialize;
use tracing::warn;

use crate::comparator::{collect, difference, discharge_series, model_at};
use crate::error::CompareError;
use crate::model::Model;

/// Title of the outlet discharge plot.
pub const OUTLET_TITLE: &str = "Discharge at the Outlet";
/// Axis label of the outlet discharge plot.
pub const DISCHARGE_LABEL: &str = "Discharge (m3/s)";

/// What to plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotRequest {
    pub variable: VariableId,
    pub element: u32,
    /// Model whose time axis positions the cursor and whose element
    /// metadata titles the plot.
    pub model: usize,
    /// Cursor position on the model's time axis.
    pub time_index: usize,
    pub zoom: u8,
    pub monthly: bool,
    /// Plot `model` minus this model instead of every model.
    pub difference: Option<usize>,
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotLine {
    /// Legend entry, with the efficiency when an overlay is scored.
    pub label: String,
    pub series: Series,
    /// Scores against the observed overlay over the visible window.
    pub score: Option<ScoreSummary>,
    pub flow_duration: Option<FlowDuration>,
    /// Mean per calendar month, January first.
    pub monthly_balance: [Option<f64>; 12],
}

/// Everything a renderer needs to draw one time-series plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotFrame {
    pub title: String,
    pub y_label: String,
    /// Draw the y axis growing downwards.
    pub invert_y: bool,
    /// Horizontal reference line, the surface elevation for water-table
    /// plots.
    pub reference_line: Option<f64>,
    pub lines: Vec<PlotLine>,
    pub observed: Option<Series>,
    pub observed_balance: Option<[Option<f64>; 12]>,
    pub window: Option<TimeSpan>,
    pub cursor: Option<NaiveDateTime>,
}

/// Title for element `number`: `"Element 12 - 104.25 m (52.1, -3.4)"`.
pub fn element_title(model: &Model, number: u32) -> Result<String, CompareError> {
    let elevation = model.elevations().get(number)?;
    Ok(match model.catalogue().get(number) {
        Some(e) => format!(
            "Element {number} - {elevation:.2} m ({}, {})",
            e.centroid.0, e.centroid.1
        ),
        None => format!("Element {number} - {elevation:.2} m"),
    })
}

/// Builds the plot for one variable at one element.
///
/// # Errors
///
/// Fails if a model lacks the variable or element, or the time index is
/// past the variable's time axis.
pub fn plot_frame(
    models: &[Model],
    request: &PlotRequest,
    observed: Option<&Series>,
) -> Result<PlotFrame, CompareError> {
    let model = model_at(models, request.model)?;
    let variable = model.variable(request.variable)?;
    let spec = variable.spec();
    let times = variable.times();
    let cursor = *times.get(request.time_index).ok_or(CompareError::OutOfRange {
        axis: "time",
        index: request.time_index,
        len: times.len(),
    })?;

    let series = match request.difference {
        Some(other) => vec![difference(
            models,
            request.variable,
            request.element,
            request.model,
            other,
        )?],
        None => collect(models, request.variable, request.element)?,
    };
    let observed = observed.filter(|_| request.difference.is_none());

    let reference_line = match request.variable {
        VariableId::WaterTableElevation if request.difference.is_none() => {
            Some(model.elevations().get(request.element)?)
        }
        _ => None,
    };

    Ok(PlotFrame {
        title: element_title(model, request.element)?,
        y_label: spec.label.to_string(),
        invert_y: spec.inverted_axis && request.difference.is_none(),
        reference_line,
        ..score_lines(series, observed, request.monthly, request.zoom, Some(cursor))
    })
}

/// Builds the outlet discharge plot. Models without a discharge file are
/// left out.
///
/// The window zooms around `cursor`, or around the start of the record
/// when there is none.
///
/// # Errors
///
/// Returns `NotFound` if no model has a readable discharge file.
pub fn outlet_frame(
    models: &[Model],
    cursor: Option<NaiveDateTime>,
    zoom: u8,
    monthly: bool,
    observed: Option<&Series>,
) -> Result<PlotFrame, CompareError> {
    let mut series = Vec::new();
    for model in models {
        match discharge_series(model) {
            Ok(s) => series.push(s),
            Err(e) => warn!(model = model.name(), error = %e, "no outlet discharge"),
        }
    }
    let first = series.first().ok_or_else(|| CompareError::NotFound {
        what: "outlet discharge for any model".to_string(),
    })?;
    let cursor = cursor.or_else(|| first.times().first().copied());

    Ok(PlotFrame {
        title: OUTLET_TITLE.to_string(),
        y_label: DISCHARGE_LABEL.to_string(),
        ..score_lines(series, observed, monthly, zoom, cursor)
    })
}

/// Span covering every sample of every plotted line.
fn plotted_extent(lines: &[Series]) -> Option<TimeSpan> {
    let (start, end) = lines
        .iter()
        .filter_map(Series::bounds)
        .reduce(|(s0, e0), (s1, e1)| (s0.min(s1), e0.max(e1)))?;
    TimeSpan::new(start, end).ok()
}

fn score_lines(
    series: Vec<Series>,
    observed: Option<&Series>,
    monthly: bool,
    zoom: u8,
    cursor: Option<NaiveDateTime>,
) -> PlotFrame {
    let prepare = |s: &Series| {
        if monthly {
            resample(s, Period::Monthly)
        } else {
            s.clone()
        }
    };
    let observed = observed.map(prepare);
    let plotted: Vec<Series> = series.iter().map(prepare).collect();
    let window = plotted_extent(&plotted)
        .zip(cursor)
        .map(|(extent, c)| ComparisonWindow::new(extent, c, zoom).span());

    let lines = series
        .iter()
        .zip(plotted)
        .map(|(raw, simulated)| {
            let (score, duration) = match &observed {
                Some(obs) => {
                    let joined = align(&simulated, obs);
                    let joined = match &window {
                        Some(span) => joined.restrict(span),
                        None => joined,
                    };
                    (Some(summarise(&joined)), flow_duration(&joined))
                }
                None => (None, None),
            };
            let label = match score.as_ref().and_then(|s| s.nse) {
                Some(nse) => format!("{} ({nse:.2})", simulated.name()),
                None => simulated.name().to_string(),
            };
            PlotLine {
                label,
                monthly_balance: monthly_water_balance(raw),
                series: simulated,
                score,
                flow_duration: duration,
            }
        })
        .collect();

    PlotFrame {
        title: String::new(),
        y_label: String::new(),
        invert_y: false,
        reference_line: None,
        lines,
        observed_balance: observed.as_ref().map(monthly_water_balance),
        observed,
        window,
        cursor,
    }
}
