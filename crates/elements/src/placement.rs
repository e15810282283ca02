//! Element outlines and centroids in lat/long.
//!
//! Land elements are whole grid squares. River elements lie along a square
//! edge and are drawn as a thin strip straddling it.

use hydroscope_io::{CellBounds, RasterHeader};
use serde::Serialize;
use tracing::debug;

use crate::elevation::ElevationTable;
use crate::error::ElementError;
use crate::index::{Classification, Edge, ElementIndex};
use crate::projection::CoordinateProjection;

/// Width of a river strip as a fraction of the cell size.
pub const RIVER_WIDTH_FRACTION: f64 = 0.1;

const CENTROID_DECIMALS: i32 = 3;

/// One analysed element, placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub number: u32,
    pub classification: Classification,
    /// Closed ring of `(lat, lon)` pairs; the last vertex repeats the first.
    pub outline: Vec<(f64, f64)>,
    /// `(lat, lon)` rounded to 3 decimals.
    pub centroid: (f64, f64),
    pub elevation: f64,
}

impl Element {
    pub fn is_river(&self) -> bool {
        self.classification == Classification::River
    }
}

/// The placed land and river elements of one model.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ElementCatalogue {
    land: Vec<Element>,
    river: Vec<Element>,
}

impl ElementCatalogue {
    /// Places every land and river element, reporting percentage progress
    /// (0 to 100) after each one.
    ///
    /// Elements with no square or edge on the grid are left out.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::InvalidNumbering`] if the raster does not
    /// match the numbering grid, or [`ElementError::NotFound`] if an element
    /// has no elevation.
    pub fn build(
        index: &ElementIndex,
        elevations: &ElevationTable,
        raster: &RasterHeader,
        projection: &dyn CoordinateProjection,
        mut progress: impl FnMut(f64),
    ) -> Result<Self, ElementError> {
        let (rows, cols) = index.grid_shape();
        raster
            .check_dimensions(rows, cols)
            .map_err(|e| ElementError::InvalidNumbering {
                reason: e.to_string(),
            })?;

        let total = index.land_elements().len() + index.river_elements().len();
        let mut done = 0usize;
        let mut catalogue = ElementCatalogue::default();

        let numbers = index
            .land_elements()
            .iter()
            .chain(index.river_elements())
            .copied();
        for number in numbers {
            let classification = index.classify(number)?;
            let ring = match classification {
                Classification::Land => {
                    let (row, col) = index.grid_position(number)?;
                    Some(square_ring(raster.cell_bounds(row, col)))
                }
                _ => index.edge_positions(number).first().map(|&(row, col, edge)| {
                    strip_ring(raster.cell_bounds(row, col), edge, raster.cellsize)
                }),
            };

            if let Some(ring) = ring {
                let outline: Vec<(f64, f64)> = ring
                    .iter()
                    .map(|&(x, y)| projection.to_geographic(x, y))
                    .collect();
                let element = Element {
                    number,
                    classification,
                    centroid: centroid(&outline),
                    outline,
                    elevation: elevations.get(number)?,
                };
                match classification {
                    Classification::Land => catalogue.land.push(element),
                    _ => catalogue.river.push(element),
                }
            } else {
                debug!(number, "element has no grid location, not placed");
            }

            done += 1;
            progress(done as f64 * 100.0 / total as f64);
        }

        debug!(
            n_land = catalogue.land.len(),
            n_river = catalogue.river.len(),
            "placed elements"
        );
        Ok(catalogue)
    }

    pub fn land(&self) -> &[Element] {
        &self.land
    }

    pub fn river(&self) -> &[Element] {
        &self.river
    }

    /// Land or river elements.
    pub fn of_kind(&self, river: bool) -> &[Element] {
        if river { &self.river } else { &self.land }
    }

    /// Both lists are ascending by number.
    pub fn get(&self, number: u32) -> Option<&Element> {
        [&self.land, &self.river].into_iter().find_map(|list| {
            list.binary_search_by_key(&number, |e| e.number)
                .ok()
                .map(|i| &list[i])
        })
    }
}

/// NW, NE, SE, SW, NW corners of a cell in projected coordinates.
fn square_ring(b: CellBounds) -> Vec<(f64, f64)> {
    vec![
        (b.west, b.north),
        (b.east, b.north),
        (b.east, b.south),
        (b.west, b.south),
        (b.west, b.north),
    ]
}

/// A strip of width `cellsize * RIVER_WIDTH_FRACTION` centred on one edge.
fn strip_ring(b: CellBounds, edge: Edge, cellsize: f64) -> Vec<(f64, f64)> {
    let half = cellsize * RIVER_WIDTH_FRACTION / 2.0;
    let strip = match edge {
        Edge::North => CellBounds {
            south: b.north - half,
            north: b.north + half,
            ..b
        },
        Edge::South => CellBounds {
            south: b.south - half,
            north: b.south + half,
            ..b
        },
        Edge::West => CellBounds {
            west: b.west - half,
            east: b.west + half,
            ..b
        },
        Edge::East => CellBounds {
            west: b.east - half,
            east: b.east + half,
            ..b
        },
    };
    square_ring(strip)
}

/// Mean of the ring vertices, closing vertex excluded, rounded.
fn centroid(ring: &[(f64, f64)]) -> (f64, f64) {
    let open = &ring[..ring.len().saturating_sub(1)];
    if open.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = open.len() as f64;
    let lat = open.iter().map(|p| p.0).sum::<f64>() / n;
    let lon = open.iter().map(|p| p.1).sum::<f64>() / n;
    let scale = 10f64.powi(CENTROID_DECIMALS);
    ((lat * scale).round() / scale, (lon * scale).round() / scale)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use approx::assert_relative_eq;

    use super::*;
    use crate::index::tests::sample_index;
    use crate::projection::Geographic;

    /// 3x3 raster of 0.1 degree cells with its south-west corner at (50N, 0E).
    fn raster() -> RasterHeader {
        RasterHeader::parse(
            "ncols 3\nnrows 3\nxllcorner 0.0\nyllcorner 50.0\ncellsize 0.1\n",
            Path::new("dem.asc"),
        )
        .unwrap()
    }

    fn elevations() -> ElevationTable {
        ElevationTable::new(vec![10.0, 20.0, 30.0, 40.0, 5.0, 6.0, 7.0, 8.0])
    }

    #[test]
    fn builds_land_and_river_without_banks() {
        let mut reports = Vec::new();
        let cat = ElementCatalogue::build(
            &sample_index(),
            &elevations(),
            &raster(),
            &Geographic,
            |p| reports.push(p),
        )
        .unwrap();

        let land: Vec<u32> = cat.land().iter().map(|e| e.number).collect();
        let river: Vec<u32> = cat.river().iter().map(|e| e.number).collect();
        assert_eq!(land, vec![1, 2, 3, 4]);
        assert_eq!(river, vec![5, 6]);
        assert!(cat.get(7).is_none());
        assert_eq!(reports.len(), 6);
        assert_relative_eq!(*reports.last().unwrap(), 100.0);
    }

    #[test]
    fn land_square_outline_and_centroid() {
        let cat = ElementCatalogue::build(
            &sample_index(),
            &elevations(),
            &raster(),
            &Geographic,
            |_| {},
        )
        .unwrap();
        let e = cat.get(1).unwrap();
        assert_eq!(e.outline.len(), 5);
        assert_eq!(e.outline.first(), e.outline.last());
        // top-left square spans 50.2..50.3 N, 0.0..0.1 E
        assert_relative_eq!(e.centroid.0, 50.25);
        assert_relative_eq!(e.centroid.1, 0.05);
        assert_eq!(e.elevation, 10.0);
        assert!(!e.is_river());
    }

    #[test]
    fn river_strip_straddles_edge() {
        let cat = ElementCatalogue::build(
            &sample_index(),
            &elevations(),
            &raster(),
            &Geographic,
            |_| {},
        )
        .unwrap();
        let e = cat.get(5).unwrap();
        assert!(e.is_river());
        // east edge of square (0, 0) is at 0.1 E
        let lons: Vec<f64> = e.outline.iter().map(|p| p.1).collect();
        let min = lons.iter().copied().fold(f64::INFINITY, f64::min);
        let max = lons.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(min, 0.095, epsilon = 1e-12);
        assert_relative_eq!(max, 0.105, epsilon = 1e-12);
        assert_relative_eq!(e.centroid.1, 0.1);
        assert_eq!(e.elevation, 5.0);
    }

    #[test]
    fn lookup_by_number_in_both_lists() {
        let cat = ElementCatalogue::build(
            &sample_index(),
            &elevations(),
            &raster(),
            &Geographic,
            |_| {},
        )
        .unwrap();
        for number in [1, 2, 3, 4, 5, 6] {
            assert_eq!(cat.get(number).map(|e| e.number), Some(number));
        }
        assert!(cat.get(0).is_none());
        assert!(cat.get(7).is_none());
        assert!(cat.get(99).is_none());
    }

    #[test]
    fn raster_must_match_grid() {
        let small = RasterHeader::parse(
            "ncols 2\nnrows 3\nxllcorner 0\nyllcorner 0\ncellsize 1\n",
            Path::new("dem.asc"),
        )
        .unwrap();
        let err = ElementCatalogue::build(&sample_index(), &elevations(), &small, &Geographic, |_| {})
            .unwrap_err();
        assert!(matches!(err, ElementError::InvalidNumbering { .. }));
    }

    #[test]
    fn centroid_ignores_closing_vertex() {
        let ring = vec![(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0), (0.0, 0.0)];
        assert_eq!(centroid(&ring), (1.0, 1.0));
    }
}
