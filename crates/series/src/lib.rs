//! # hydroscope-series
//!
//! Series alignment and scoring: merge a simulated and an observed series on
//! a shared time axis, optionally resample both to monthly means, restrict
//! the result to the visible comparison window and compute the
//! Nash–Sutcliffe efficiency over it.
//!
//! ```ignore
//! use hydroscope_series::{Period, align, resample, nash_sutcliffe};
//!
//! let sim = resample(&simulated, Period::Monthly);
//! let obs = resample(&observed, Period::Monthly);
//! let joined = align(&sim, &obs).restrict(&window.span());
//! let nse = nash_sutcliffe(&joined)?;
//! ```

mod align;
mod error;
mod resample;
mod scoring;
mod series;
mod summary;
mod window;

pub use align::{Joined, JoinedRow, align};
pub use error::SeriesError;
pub use resample::{MONTHLY_THRESHOLD_DAYS, Period, resample};
pub use scoring::{ScoreSummary, nash_sutcliffe, summarise};
pub use series::Series;
pub use summary::{FLOW_DURATION_LEVELS, FlowDuration, flow_duration, monthly_water_balance};
pub use window::{ComparisonWindow, MAX_ZOOM, TimeSpan, restrict};
