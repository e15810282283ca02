//! # hydroscope-elements
//!
//! The spatial side of a model run: which element numbers are land, river
//! or bank, where each sits on the square grid, its surface elevation, and
//! its outline on a lat/long map.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `index` | [`ElementIndex`]: classification, grid lookups, array rows |
//! | `elevation` | [`ElevationTable`]: shared per-element elevation |
//! | `projection` | [`CoordinateReference`]: BNG, UTM and geographic grids |
//! | `placement` | [`ElementCatalogue`]: outlines and centroids |

mod elevation;
mod error;
mod index;
mod placement;
mod projection;

pub use elevation::ElevationTable;
pub use error::ElementError;
pub use index::{BANK_LISTS, Classification, Edge, ElementIndex};
pub use placement::{Element, ElementCatalogue, RIVER_WIDTH_FRACTION};
pub use projection::{
    CoordinateProjection, CoordinateReference, Ellipsoid, Geographic, TransverseMercator,
};
