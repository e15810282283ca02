//! # hydroscope-variables
//!
//! Model output variables behind one read contract, [`Variable`]:
//! a full series at one element, or every element at one time step.
//!
//! ```mermaid
//! graph LR
//!     S["ArrayStore"] -->|"StoredVariable::open()"| V["StoredVariable"]
//!     V --> D["DerivedVariable<br/>elevation - base"]
//!     V --> Set["VariableSet"]
//!     D --> Set
//!     Set -->|".element_series(n)"| Series
//!     Set -->|".time_slice(t)"| TimeSlice
//! ```
//!
//! The registry in [`VariableId`] is fixed. A registered variable missing
//! from a store, or whose arrays do not fit the element numbering, is left
//! out of the [`VariableSet`] with a warning.

mod derived;
mod error;
mod registry;
mod set;
mod stored;
mod variable;

pub use derived::DerivedVariable;
pub use error::VariableError;
pub use registry::{Reduction, ShapeClass, VariableId, VariableSpec};
pub use set::VariableSet;
pub use stored::StoredVariable;
pub use variable::{TimeSlice, Variable};
