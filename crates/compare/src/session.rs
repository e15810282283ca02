//! The interactive comparison session.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use hydroscope_io::read_observed;
use hydroscope_series::{MAX_ZOOM, Series, TimeSpan, restrict};
use hydroscope_variables::{Variable, VariableId};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::comparator::model_at;
use crate::config::ViewConfig;
use crate::error::CompareError;
use crate::export::export_series;
use crate::map::{MapFrame, map_frame};
use crate::model::Model;
use crate::plot::{PlotFrame, PlotRequest, outlet_frame, plot_frame};

/// How the map reacts to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    Click,
    Hover,
}

/// The current choices driving every frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub model: usize,
    pub variable: VariableId,
    pub element: u32,
    pub time_index: usize,
    pub zoom: u8,
    pub monthly: bool,
    pub difference: Option<usize>,
}

/// Loaded models plus the selection and observed overlay.
///
/// There is always at least one model. Every setter validates against the
/// active model before changing anything, so a failed call leaves the
/// session as it was.
pub struct Session {
    models: Vec<Model>,
    selection: Selection,
    observed: Option<Series>,
    hover: Arc<AtomicBool>,
    toggle: Option<JoinHandle<()>>,
}

impl Session {
    /// Starts a session on `model`, selecting its first available variable
    /// and that variable's first element.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the model has no variables, or `Validation` for
    /// an invalid view config.
    pub fn new(model: Model, view: ViewConfig) -> Result<Self, CompareError> {
        view.validate()?;
        let variable = *model
            .variables()
            .available()
            .first()
            .ok_or_else(|| CompareError::NotFound {
                what: format!("any variable in model '{}'", model.name()),
            })?;
        let element = first_element(model.variable(variable)?.as_ref())?;
        info!(model = model.name(), variable = %variable, element, "session started");
        Ok(Self {
            models: vec![model],
            selection: Selection {
                model: 0,
                variable,
                element,
                time_index: 0,
                zoom: view.zoom(),
                monthly: view.monthly_means(),
                difference: None,
            },
            observed: None,
            hover: Arc::new(AtomicBool::new(false)),
            toggle: None,
        })
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn model(&self, index: usize) -> Result<&Model, CompareError> {
        model_at(&self.models, index)
    }

    /// The model driving the map and the plot title.
    pub fn active_model(&self) -> &Model {
        &self.models[self.selection.model]
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Appends a model and returns its index.
    pub fn add_model(&mut self, model: Model) -> usize {
        info!(model = model.name(), index = self.models.len(), "added model");
        self.models.push(model);
        self.models.len() - 1
    }

    /// Removes and returns the model at `index`.
    ///
    /// The last remaining model is never removed; `Ok(None)` is returned
    /// instead.
    pub fn remove_model(&mut self, index: usize) -> Result<Option<Model>, CompareError> {
        model_at(&self.models, index)?;
        if self.models.len() == 1 {
            warn!(model = self.models[0].name(), "not removing the only model");
            return Ok(None);
        }

        let removed = self.models.remove(index);
        let shift = |i: usize| if i > index { i - 1 } else { i };
        self.selection.model = if self.selection.model == index {
            0
        } else {
            shift(self.selection.model)
        };
        self.selection.difference = match self.selection.difference {
            Some(d) if d == index => None,
            Some(d) => Some(shift(d)),
            None => None,
        };
        info!(model = removed.name(), "removed model");
        self.reconcile();
        Ok(Some(removed))
    }

    pub fn rename_model(
        &mut self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), CompareError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CompareError::Validation {
                count: 1,
                details: "model name is empty".to_string(),
            });
        }
        model_at(&self.models, index)?;
        debug!(from = self.models[index].name(), to = %name, "renamed model");
        self.models[index].set_name(name);
        Ok(())
    }

    /// Makes `index` the active model.
    pub fn select_model(&mut self, index: usize) -> Result<(), CompareError> {
        model_at(&self.models, index)?;
        self.selection.model = index;
        self.reconcile();
        Ok(())
    }

    /// Switches variable, moving to its first element and keeping the time
    /// index within its time axis.
    pub fn select_variable(&mut self, id: VariableId) -> Result<(), CompareError> {
        let variable = self.active_model().variable(id)?;
        let element = first_element(variable.as_ref())?;
        self.selection.variable = id;
        self.selection.element = element;
        self.selection.time_index = self
            .selection
            .time_index
            .min(variable.n_times().saturating_sub(1));
        Ok(())
    }

    /// Selects element `number` of the current variable.
    pub fn select_element(&mut self, number: u32) -> Result<(), CompareError> {
        let variable = self.current_variable()?;
        if variable.elements().binary_search(&number).is_err() {
            let domain = if variable.is_river() { "river" } else { "land" };
            return Err(CompareError::NotFound {
                what: format!("element {number} among {domain} elements"),
            });
        }
        self.selection.element = number;
        Ok(())
    }

    pub fn set_time_index(&mut self, t: usize) -> Result<(), CompareError> {
        let len = self.current_variable()?.n_times();
        if t >= len {
            return Err(CompareError::OutOfRange {
                axis: "time",
                index: t,
                len,
            });
        }
        self.selection.time_index = t;
        Ok(())
    }

    /// Sets the zoom, clamped to `0..=100`, and returns the value kept.
    pub fn set_zoom(&mut self, zoom: u8) -> u8 {
        self.selection.zoom = zoom.min(MAX_ZOOM);
        self.selection.zoom
    }

    /// Toggles monthly means. The observed overlay is kept.
    pub fn set_monthly(&mut self, monthly: bool) {
        self.selection.monthly = monthly;
    }

    /// Plots the active model minus `other`, or every model for `None`.
    /// Turning difference mode on clears the observed overlay.
    pub fn set_difference(&mut self, other: Option<usize>) -> Result<(), CompareError> {
        if let Some(i) = other {
            model_at(&self.models, i)?;
            if self.observed.take().is_some() {
                debug!("observed overlay cleared for difference view");
            }
        }
        self.selection.difference = other;
        Ok(())
    }

    pub fn observed(&self) -> Option<&Series> {
        self.observed.as_ref()
    }

    /// Sets the observed overlay, trimmed to the first model's time extent
    /// for the current variable, and leaves difference mode. Returns the
    /// number of samples kept.
    pub fn set_observed(&mut self, series: Series) -> usize {
        let extent = self
            .models
            .first()
            .and_then(|m| m.variable(self.selection.variable).ok())
            .and_then(|v| {
                let times = v.times();
                TimeSpan::new(*times.first()?, *times.last()?).ok()
            });
        let trimmed = match extent {
            Some(span) => restrict(&series, &span),
            None => series,
        };
        self.selection.difference = None;
        let kept = trimmed.len();
        if trimmed.is_empty() {
            warn!("observed series does not overlap the model period");
            self.observed = None;
        } else {
            info!(samples = kept, "observed overlay set");
            self.observed = Some(trimmed);
        }
        kept
    }

    /// Reads an observed series from `path` and sets it as the overlay.
    ///
    /// # Errors
    ///
    /// A missing or malformed file is reported and leaves the session with
    /// no overlay.
    pub fn load_observed(&mut self, path: &Path) -> Result<usize, CompareError> {
        match read_observed(path) {
            Ok(series) => Ok(self.set_observed(series)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "dropping observed overlay");
                self.observed = None;
                Err(e.into())
            }
        }
    }

    pub fn clear_observed(&mut self) {
        self.observed = None;
    }

    pub fn interaction_mode(&self) -> InteractionMode {
        if self.hover.load(Ordering::SeqCst) {
            InteractionMode::Hover
        } else {
            InteractionMode::Click
        }
    }

    /// Flips between click and hover on a background thread. A pending
    /// toggle is joined first.
    pub fn toggle_interaction(&mut self) {
        self.join_interaction();
        let hover = Arc::clone(&self.hover);
        self.toggle = Some(thread::spawn(move || {
            let was_hover = hover.fetch_xor(true, Ordering::SeqCst);
            debug!(hover = !was_hover, "interaction mode switched");
        }));
    }

    /// Waits for a pending toggle to finish.
    pub fn join_interaction(&mut self) {
        if let Some(handle) = self.toggle.take()
            && handle.join().is_err()
        {
            warn!("interaction toggle thread panicked");
        }
    }

    /// The plot for the current selection.
    pub fn plot_frame(&self) -> Result<PlotFrame, CompareError> {
        plot_frame(&self.models, &self.plot_request(), self.observed.as_ref())
    }

    /// The outlet discharge plot of every model, zoomed around the selected
    /// time.
    pub fn outlet_frame(&self) -> Result<PlotFrame, CompareError> {
        let cursor = self
            .current_variable()
            .ok()
            .and_then(|v| v.times().get(self.selection.time_index).copied());
        outlet_frame(
            &self.models,
            cursor,
            self.selection.zoom,
            self.selection.monthly,
            self.observed.as_ref(),
        )
    }

    /// The map for the current selection.
    pub fn map_frame(&self) -> Result<MapFrame, CompareError> {
        let s = &self.selection;
        map_frame(&self.models, s.model, s.variable, s.time_index, s.difference)
    }

    /// Exports every model's series at the selected element into `dir`.
    pub fn export(&self, dir: &Path) -> Result<PathBuf, CompareError> {
        export_series(&self.models, self.selection.variable, self.selection.element, dir)
    }

    fn plot_request(&self) -> PlotRequest {
        let s = &self.selection;
        PlotRequest {
            variable: s.variable,
            element: s.element,
            model: s.model,
            time_index: s.time_index,
            zoom: s.zoom,
            monthly: s.monthly,
            difference: s.difference,
        }
    }

    fn current_variable(&self) -> Result<Arc<dyn Variable>, CompareError> {
        self.active_model().variable(self.selection.variable)
    }

    /// Re-establishes a valid selection after the active model changed.
    fn reconcile(&mut self) {
        let model = &self.models[self.selection.model];
        let still_valid = model.variable(self.selection.variable).is_ok_and(|v| {
            v.elements().binary_search(&self.selection.element).is_ok()
                && self.selection.time_index < v.n_times()
        });
        if still_valid {
            return;
        }
        let fallback = model
            .variable(self.selection.variable)
            .ok()
            .map(|_| self.selection.variable)
            .or_else(|| model.variables().available().first().copied());
        match fallback {
            Some(id) => {
                if let Err(e) = self.select_variable(id) {
                    warn!(error = %e, "selection could not be restored");
                }
            }
            None => warn!(model = model.name(), "active model has no variables"),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.join_interaction();
    }
}

fn first_element(variable: &dyn Variable) -> Result<u32, CompareError> {
    variable
        .elements()
        .first()
        .copied()
        .ok_or_else(|| CompareError::NotFound {
            what: format!("any element for variable '{}'", variable.name()),
        })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDateTime, TimeDelta};

    use super::*;
    use crate::model::tests::{model, start};

    fn day(i: i64) -> NaiveDateTime {
        start().and_hms_opt(0, 0, 0).unwrap() + TimeDelta::days(i)
    }

    fn session() -> Session {
        let mut s = Session::new(model("a", 5, 0.0), ViewConfig::default()).unwrap();
        s.add_model(model("b", 5, 1.0));
        s
    }

    #[test]
    fn test_defaults() {
        let s = session();
        let sel = s.selection();
        assert_eq!(sel.variable, VariableId::PhreaticDepth);
        assert_eq!(sel.element, 1);
        assert_eq!(sel.model, 0);
        assert_eq!(s.interaction_mode(), InteractionMode::Click);
    }

    #[test]
    fn test_variable_switch_moves_to_first_element() {
        let mut s = session();
        s.select_element(2).unwrap();
        s.select_variable(VariableId::SurfaceDepth).unwrap();
        assert_eq!(s.selection().element, 3);
        assert!(s.select_element(1).is_err());
        assert!(matches!(
            s.select_variable(VariableId::SnowDepth),
            Err(CompareError::NotFound { .. })
        ));
        assert_eq!(s.selection().variable, VariableId::SurfaceDepth);
    }

    #[test]
    fn test_time_and_zoom() {
        let mut s = session();
        s.set_time_index(4).unwrap();
        assert!(matches!(
            s.set_time_index(5),
            Err(CompareError::OutOfRange { index: 5, len: 5, .. })
        ));
        assert_eq!(s.selection().time_index, 4);
        assert_eq!(s.set_zoom(250), 100);
    }

    #[test]
    fn test_never_removes_last_model() {
        let mut s = session();
        let removed = s.remove_model(0).unwrap().unwrap();
        assert_eq!(removed.name(), "a");
        assert_eq!(s.models().len(), 1);
        assert!(s.remove_model(0).unwrap().is_none());
        assert_eq!(s.models().len(), 1);
        assert!(s.remove_model(3).is_err());
    }

    #[test]
    fn test_remove_shifts_difference() {
        let mut s = session();
        s.add_model(model("c", 5, 2.0));
        s.set_difference(Some(2)).unwrap();
        s.remove_model(1).unwrap();
        assert_eq!(s.selection().difference, Some(1));
        s.remove_model(1).unwrap();
        assert_eq!(s.selection().difference, None);
    }

    #[test]
    fn test_rename() {
        let mut s = session();
        s.rename_model(1, "scenario").unwrap();
        assert_eq!(s.model(1).unwrap().name(), "scenario");
        assert!(s.rename_model(1, "  ").is_err());
        assert!(s.rename_model(5, "x").is_err());
    }

    #[test]
    fn test_observed_trimmed_and_survives_monthly_toggle() {
        let mut s = session();
        let obs = Series::new(
            "observed",
            vec![day(-2), day(1), day(3), day(9)],
            vec![9.0, 1.0, 3.0, 9.0],
        )
        .unwrap();
        assert_eq!(s.set_observed(obs), 2);
        assert_eq!(s.observed().unwrap().times(), &[day(1), day(3)]);

        s.set_monthly(true);
        assert!(s.observed().is_some());
        s.set_monthly(false);
        assert!(s.observed().is_some());
    }

    #[test]
    fn test_difference_and_observed_exclude_each_other() {
        let mut s = session();
        let obs = Series::new("observed", vec![day(1)], vec![1.0]).unwrap();
        s.set_observed(obs.clone());
        s.set_difference(Some(1)).unwrap();
        assert!(s.observed().is_none());

        s.set_observed(obs);
        assert_eq!(s.selection().difference, None);
        assert!(s.observed().is_some());
        s.clear_observed();
        assert!(s.observed().is_none());
    }

    #[test]
    fn test_bad_observed_file_drops_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obs.csv");
        std::fs::write(&path, "date,flow\nnot a date,1.0\n").unwrap();

        let mut s = session();
        s.set_observed(Series::new("observed", vec![day(1)], vec![1.0]).unwrap());
        assert!(s.load_observed(&path).is_err());
        assert!(s.observed().is_none());
    }

    #[test]
    fn test_load_observed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obs.csv");
        std::fs::write(&path, "date,flow\n03/01/2000,2.0\n02/01/2000,1.0\n").unwrap();

        let mut s = session();
        assert_eq!(s.load_observed(&path).unwrap(), 2);
        assert_eq!(s.observed().unwrap().values(), &[1.0, 2.0]);
    }

    #[test]
    fn test_interaction_toggle() {
        let mut s = session();
        s.toggle_interaction();
        s.join_interaction();
        assert_eq!(s.interaction_mode(), InteractionMode::Hover);
        s.toggle_interaction();
        s.toggle_interaction();
        s.toggle_interaction();
        s.join_interaction();
        assert_eq!(s.interaction_mode(), InteractionMode::Click);
    }

    #[test]
    fn test_frames_follow_selection() {
        let mut s = session();
        s.select_element(2).unwrap();
        s.set_time_index(2).unwrap();
        let plot = s.plot_frame().unwrap();
        assert_eq!(plot.lines.len(), 2);
        assert_eq!(plot.cursor, Some(day(2)));

        let map = s.map_frame().unwrap();
        assert_eq!(map.values, vec![2.0, 4.0]);

        s.select_model(1).unwrap();
        s.set_difference(Some(0)).unwrap();
        let map = s.map_frame().unwrap();
        assert_eq!(map.values, vec![1.0, 1.0]);
        let plot = s.plot_frame().unwrap();
        assert_eq!(plot.lines[0].label, "b - a");
    }
}
