//! # hydroscope-calendar
//!
//! Calendar arithmetic shared by the store readers and the series engine.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["units attribute"] -->|"TimeUnits::from_str()"| B["TimeUnits"]
//!     B -->|".decode()"| C["Vec of NaiveDateTime"]
//!     D["start date + n"] -->|"daily_sequence()"| C
//!     C -->|"MonthKey::of()"| E["MonthKey"]
//!     E -->|".label()"| F["month-end timestamp"]
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `units` | CF-style `"<unit> since <datetime>"` time units |
//! | `sequence` | Daily timestamp sequences |
//! | `month` | Calendar-month buckets and labels |
//! | `error` | Error types |

mod error;
mod month;
mod sequence;
mod units;

pub use error::CalendarError;
pub use month::{MonthKey, days_between};
pub use sequence::daily_sequence;
pub use units::{TimeUnit, TimeUnits};
