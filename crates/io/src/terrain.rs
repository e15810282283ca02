//! ESRI ASCII terrain raster header.
//!
//! Only the header is needed: it fixes where each grid square of the
//! element numbering table lies on the ground.

use std::fs;
use std::path::Path;

use crate::error::IoError;
use crate::validate::ValidationCollector;

/// Whether `xll`/`yll` name the lower-left corner or the centre of the
/// lower-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Corner,
    Center,
}

/// Ground extent of one raster cell in projected units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

/// Georeferencing of an ESRI ASCII grid. Row 0 is the northernmost row.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterHeader {
    pub ncols: usize,
    pub nrows: usize,
    pub xll: f64,
    pub yll: f64,
    pub anchor: Anchor,
    pub cellsize: f64,
    pub nodata: Option<f64>,
}

impl RasterHeader {
    /// Reads the header lines of the raster at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::FileNotFound`], [`IoError::Io`] or
    /// [`IoError::Parse`].
    pub fn read(path: &Path) -> Result<Self, IoError> {
        if !path.exists() {
            return Err(IoError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path).map_err(|e| IoError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&text, path)
    }

    /// Parses header keywords from the start of `text`, stopping at the
    /// first line that does not begin with a keyword.
    pub fn parse(text: &str, path: &Path) -> Result<Self, IoError> {
        let parse_err = |line: usize, reason: String| IoError::Parse {
            path: path.to_path_buf(),
            line,
            reason,
        };

        let mut ncols = None;
        let mut nrows = None;
        let mut x = None;
        let mut y = None;
        let mut cellsize = None;
        let mut nodata = None;

        for (i, line) in text.lines().enumerate() {
            let mut parts = line.split_whitespace();
            let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
                continue;
            };
            if key.chars().next().is_some_and(|c| !c.is_ascii_alphabetic()) {
                break;
            }
            let number: f64 = value
                .parse()
                .map_err(|_| parse_err(i + 1, format!("'{key}' has non-numeric value '{value}'")))?;
            match key.to_ascii_lowercase().as_str() {
                "ncols" => ncols = Some(as_count(number, i + 1, key, path)?),
                "nrows" => nrows = Some(as_count(number, i + 1, key, path)?),
                "xllcorner" => x = Some((number, Anchor::Corner)),
                "xllcenter" => x = Some((number, Anchor::Center)),
                "yllcorner" => y = Some((number, Anchor::Corner)),
                "yllcenter" => y = Some((number, Anchor::Center)),
                "cellsize" => cellsize = Some(number),
                "nodata_value" => nodata = Some(number),
                other => return Err(parse_err(i + 1, format!("unknown header keyword '{other}'"))),
            }
        }

        let missing = |what: &str| parse_err(0, format!("header has no '{what}'"));
        let ncols = ncols.ok_or_else(|| missing("ncols"))?;
        let nrows = nrows.ok_or_else(|| missing("nrows"))?;
        let (xll, x_anchor) = x.ok_or_else(|| missing("xllcorner"))?;
        let (yll, y_anchor) = y.ok_or_else(|| missing("yllcorner"))?;
        let cellsize = cellsize.ok_or_else(|| missing("cellsize"))?;

        if x_anchor != y_anchor {
            return Err(parse_err(0, "mixed corner and center anchors".to_string()));
        }
        if cellsize <= 0.0 {
            return Err(parse_err(0, format!("cellsize must be positive, got {cellsize}")));
        }

        Ok(Self {
            ncols,
            nrows,
            xll,
            yll,
            anchor: x_anchor,
            cellsize,
            nodata,
        })
    }

    /// Checks that the raster has the given grid dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] listing each mismatched dimension.
    pub fn check_dimensions(&self, nrows: usize, ncols: usize) -> Result<(), IoError> {
        let mut c = ValidationCollector::new();
        if self.nrows != nrows {
            c.push(format!("terrain nrows {} != grid rows {nrows}", self.nrows));
        }
        if self.ncols != ncols {
            c.push(format!("terrain ncols {} != grid columns {ncols}", self.ncols));
        }
        c.finish()
    }

    /// Lower-left corner of the grid.
    fn origin(&self) -> (f64, f64) {
        match self.anchor {
            Anchor::Corner => (self.xll, self.yll),
            Anchor::Center => (
                self.xll - self.cellsize / 2.0,
                self.yll - self.cellsize / 2.0,
            ),
        }
    }

    /// Ground extent of the cell at `(row, col)`.
    pub fn cell_bounds(&self, row: usize, col: usize) -> CellBounds {
        let (x0, y0) = self.origin();
        let north = y0 + (self.nrows as f64 - row as f64) * self.cellsize;
        let west = x0 + col as f64 * self.cellsize;
        CellBounds {
            west,
            south: north - self.cellsize,
            east: west + self.cellsize,
            north,
        }
    }
}

fn as_count(value: f64, line: usize, key: &str, path: &Path) -> Result<usize, IoError> {
    if value < 1.0 || value.fract() != 0.0 {
        return Err(IoError::Parse {
            path: path.to_path_buf(),
            line,
            reason: format!("'{key}' must be a positive integer, got {value}"),
        });
    }
    Ok(value as usize)
}
