//! # hydroscope-compare
//!
//! Compare several runs of a distributed hydrological model.
//!
//! A [`Session`] holds the loaded [`Model`]s, the current selection
//! (variable, element, time step, zoom, difference model) and an optional
//! observed overlay. From these it builds:
//!
//! - a [`PlotFrame`]: one line per model, or the active model minus
//!   another, scored against the overlay over the visible window;
//! - a [`MapFrame`]: every element's value at the selected time step;
//! - a CSV export of the selected element.
//!
//! ```ignore
//! let model = Model::load(&ModelConfig::new("output.h5", "dem.asc"))?;
//! let mut session = Session::new(model, ViewConfig::default())?;
//! session.select_variable(VariableId::PhreaticDepth)?;
//! session.load_observed(Path::new("borehole.csv"))?;
//! let frame = session.plot_frame()?;
//! ```

mod comparator;
mod config;
mod error;
mod export;
mod map;
mod model;
mod plot;
mod session;

pub use comparator::{collect, difference, discharge_series, model_at};
pub use config::{ModelConfig, ViewConfig};
pub use error::CompareError;
pub use export::{export_header, export_series};
pub use map::{MapFrame, colour_range, map_frame};
pub use model::Model;
pub use plot::{
    DISCHARGE_LABEL, OUTLET_TITLE, PlotFrame, PlotLine, PlotRequest, element_title, outlet_frame,
    plot_frame,
};
pub use session::{InteractionMode, Selection, Session};
