//! # hydroscope-io
//!
//! The file boundary of hydroscope: a read-only [`ArrayStore`] over model
//! output (NetCDF-4/HDF5 on disk, or in memory for fixtures), the terrain
//! raster header, and the small text formats around a model run: observed
//! series, outlet discharge and value exports.

mod discharge;
mod error;
mod export;
mod memory;
mod netcdf_store;
mod observed;
mod store;
mod terrain;
mod validate;

pub use discharge::{discharge_file_name, discharge_path, parse_discharge, read_discharge};
pub use error::IoError;
pub use export::{export_file_name, write_export, write_export_file};
pub use memory::MemoryStore;
pub use netcdf_store::NetcdfStore;
pub use observed::{OBSERVED_NAME, parse_observed, read_observed};
pub use store::{ArrayStore, CONSTANTS, StoredArray, VARIABLES, strip_ordinal};
pub use terrain::{Anchor, CellBounds, RasterHeader};
pub use validate::check_layout;
