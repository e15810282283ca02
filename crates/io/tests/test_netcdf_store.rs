//! Integration tests for the NetCDF-backed array store.
//!
//! Builds a miniature model output file with the CONSTANTS / VARIABLES
//! group layout and reads it back through the `ArrayStore` trait.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hydroscope_io::{ArrayStore, IoError, NetcdfStore, check_layout};
use tempfile::tempdir;

// ---------------------------------------------------------------------------
// Helper: programmatic store fixture
// ---------------------------------------------------------------------------

/// A 2 x 3 numbering grid with three land squares, two river links and one
/// bank element on the grid edge.
struct StoreFixture {
    rows: usize,
    cols: usize,
    number: Vec<i32>,
    surf_elv: Vec<f64>,
    n_time: usize,
}

impl StoreFixture {
    fn new() -> Self {
        Self {
            rows: 2,
            cols: 3,
            number: vec![1, 2, 0, 3, 0, 0],
            surf_elv: vec![10.0, 11.0, 12.0, 9.0, 8.5, 13.0],
            n_time: 4,
        }
    }

    fn write(&self, dir: &Path) -> PathBuf {
        let path = dir.join("model.h5");
        let mut file = netcdf::create(&path).expect("failed to create NetCDF file");

        {
            let mut constants = file.add_group("CONSTANTS").expect("add CONSTANTS");
            constants.add_dimension("rows", self.rows).expect("dim rows");
            constants.add_dimension("cols", self.cols).expect("dim cols");
            constants
                .add_dimension("n_elements", self.surf_elv.len())
                .expect("dim n_elements");
            {
                let mut var = constants
                    .add_variable::<i32>("number", &["rows", "cols"])
                    .expect("add number");
                var.put_values(&self.number, ..).expect("put number");
            }
            {
                let mut var = constants
                    .add_variable::<f64>("surf_elv", &["n_elements"])
                    .expect("add surf_elv");
                var.put_values(&self.surf_elv, ..).expect("put surf_elv");
                var.put_attribute("units", "m").expect("surf_elv units");
            }
        }

        {
            let mut variables = file.add_group("VARIABLES").expect("add VARIABLES");
            let mut ph = variables.add_group("2 ph_depth").expect("add ph_depth");
            ph.add_dimension("n_land", 3).expect("dim n_land");
            ph.add_dimension("time", self.n_time).expect("dim time");
            {
                let values: Vec<f64> = (0..3 * self.n_time).map(|i| i as f64 * 0.1).collect();
                let mut var = ph
                    .add_variable::<f64>("value", &["n_land", "time"])
                    .expect("add value");
                var.put_values(&values, ..).expect("put value");
            }
            {
                let times: Vec<f64> = (0..self.n_time).map(|t| t as f64 * 24.0).collect();
                let mut var = ph
                    .add_variable::<f64>("time", &["time"])
                    .expect("add time");
                var.put_values(&times, ..).expect("put time");
                var.put_attribute("units", "hours since 1990-01-01 00:00:00")
                    .expect("time units");
            }
        }

        path
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn reads_constants_with_shape_and_units() {
    let dir = tempdir().unwrap();
    let path = StoreFixture::new().write(dir.path());
    let store = NetcdfStore::open(&path).unwrap();

    let number = store.constant("number").unwrap();
    assert_eq!(number.shape(), &[2, 3]);
    assert_eq!(number.values[[1, 0]], 3.0);

    let elv = store.constant("surf_elv").unwrap();
    assert_eq!(elv.shape(), &[6]);
    assert_eq!(elv.units.as_deref(), Some("m"));

    assert!(check_layout(&store).is_ok());
}

#[test]
fn finds_variable_group_by_storage_name() {
    let dir = tempdir().unwrap();
    let path = StoreFixture::new().write(dir.path());
    let store = NetcdfStore::open(&path).unwrap();

    assert_eq!(store.subgroups("VARIABLES").unwrap(), vec!["2 ph_depth"]);
    let group = store.variable_group("ph_depth").unwrap().unwrap();
    let value = store.read(&format!("VARIABLES/{group}/value")).unwrap();
    assert_eq!(value.shape(), &[3, 4]);
    let time = store.read(&format!("VARIABLES/{group}/time")).unwrap();
    assert_eq!(
        time.units.as_deref(),
        Some("hours since 1990-01-01 00:00:00")
    );
    assert_eq!(store.variable_group("theta").unwrap(), None);
}

#[test]
fn repeated_reads_hit_cache() {
    let dir = tempdir().unwrap();
    let path = StoreFixture::new().write(dir.path());
    let store = NetcdfStore::open(&path).unwrap();

    let a = store.constant("number").unwrap();
    let b = store.constant("number").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn missing_array_is_reported() {
    let dir = tempdir().unwrap();
    let path = StoreFixture::new().write(dir.path());
    let store = NetcdfStore::open(&path).unwrap();

    assert!(!store.contains("CONSTANTS/north_bank"));
    let err = store.constant("north_bank").unwrap_err();
    assert!(matches!(err, IoError::MissingVariable { .. }));
    assert!(store.subgroups("NOPE").unwrap().is_empty());
}

#[test]
fn missing_file_is_not_found() {
    let err = NetcdfStore::open("/nonexistent/model.h5").unwrap_err();
    assert!(matches!(err, IoError::FileNotFound { .. }));
}
