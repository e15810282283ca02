//! Element numbering: which elements are land, river or bank, and where
//! each one sits on the square grid.

use std::collections::{BTreeSet, HashMap};

use hydroscope_io::ArrayStore;
use ndarray::{Array3, Axis};
use serde::Serialize;
use tracing::debug;

use crate::error::ElementError;

/// Constant tables listing perimeter (bank) elements.
pub const BANK_LISTS: [&str; 4] = ["north_bank", "west_bank", "east_bank", "south_bank"];

/// Role of an element number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Land,
    River,
    Bank,
}

/// Side of a grid square an edge element lies on.
///
/// The discriminant is the numbering layer holding that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    North = 1,
    West = 2,
    East = 3,
    South = 4,
}

impl Edge {
    const ALL: [Edge; 4] = [Edge::North, Edge::West, Edge::East, Edge::South];

    fn layer(self) -> usize {
        self as usize
    }
}

/// Static lookup tables derived from a model's numbering grid.
///
/// Land elements are numbered `1..=n_land`, river elements
/// `n_land + 1..=n_elements`. Bank elements are taken out of both sets.
#[derive(Debug, Clone)]
pub struct ElementIndex {
    numbering: Array3<u32>,
    n_land: usize,
    n_elements: usize,
    banks: BTreeSet<u32>,
    land: Vec<u32>,
    river: Vec<u32>,
    squares: HashMap<u32, Vec<(usize, usize)>>,
    edges: HashMap<u32, Vec<(usize, usize, Edge)>>,
}

impl ElementIndex {
    /// Builds the index from a `[rows, cols, layers]` numbering grid, where
    /// layer 0 holds square numbers and 0 marks cells outside the catchment.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::InvalidNumbering`] if square numbers are not
    /// `1..=n_land` or any number exceeds `n_elements`.
    pub fn new(
        numbering: Array3<u32>,
        n_elements: usize,
        banks: impl IntoIterator<Item = u32>,
    ) -> Result<Self, ElementError> {
        let (rows, cols, layers) = numbering.dim();

        let mut squares: HashMap<u32, Vec<(usize, usize)>> = HashMap::new();
        let mut edges: HashMap<u32, Vec<(usize, usize, Edge)>> = HashMap::new();
        for row in 0..rows {
            for col in 0..cols {
                let n = numbering[[row, col, 0]];
                if n > 0 {
                    squares.entry(n).or_default().push((row, col));
                }
                for edge in Edge::ALL {
                    if edge.layer() >= layers {
                        break;
                    }
                    let n = numbering[[row, col, edge.layer()]];
                    if n > 0 {
                        edges.entry(n).or_default().push((row, col, edge));
                    }
                }
            }
        }

        let n_land = squares.len();
        if let Some(&max_square) = squares.keys().max()
            && max_square as usize != n_land
        {
            return Err(ElementError::InvalidNumbering {
                reason: format!(
                    "{n_land} distinct square numbers but the largest is {max_square}"
                ),
            });
        }
        if let Some(&max) = numbering.iter().max()
            && max as usize > n_elements
        {
            return Err(ElementError::InvalidNumbering {
                reason: format!("element {max} exceeds the {n_elements} elevations"),
            });
        }

        let banks: BTreeSet<u32> = banks.into_iter().filter(|&b| b > 0).collect();
        let n_elements_u32 = n_elements as u32;
        let n_land_u32 = n_land as u32;
        let land = (1..=n_land_u32).filter(|n| !banks.contains(n)).collect();
        let river = (n_land_u32 + 1..=n_elements_u32)
            .filter(|n| !banks.contains(n))
            .collect();

        Ok(Self {
            numbering,
            n_land,
            n_elements,
            banks,
            land,
            river,
            squares,
            edges,
        })
    }

    /// Reads `CONSTANTS/number`, `CONSTANTS/surf_elv` and any bank lists.
    pub fn from_store(store: &dyn ArrayStore) -> Result<Self, ElementError> {
        let raw = store.constant("number")?;
        let numbering = match raw.values.ndim() {
            2 => raw.values.clone().insert_axis(Axis(2)),
            3 => raw.values.clone(),
            n => {
                return Err(ElementError::InvalidNumbering {
                    reason: format!("numbering table has {n} dimensions"),
                });
            }
        };
        let numbering = numbering
            .into_dimensionality::<ndarray::Ix3>()
            .map_err(|e| ElementError::InvalidNumbering {
                reason: e.to_string(),
            })?
            .mapv(to_element_number);

        let n_elements = store.constant("surf_elv")?.values.len();

        let mut banks = Vec::new();
        for list in BANK_LISTS {
            let path = format!("{}/{list}", hydroscope_io::CONSTANTS);
            if store.contains(&path) {
                banks.extend(store.read(&path)?.values.iter().map(|&v| to_element_number(v)));
            }
        }

        let index = Self::new(numbering, n_elements, banks)?;
        debug!(
            source = store.source_name(),
            n_land = index.land.len(),
            n_river = index.river.len(),
            n_banks = index.banks.len(),
            "built element index"
        );
        Ok(index)
    }

    /// Land, river or bank.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::NotFound`] for 0 or numbers above
    /// `n_elements`.
    pub fn classify(&self, number: u32) -> Result<Classification, ElementError> {
        if number == 0 || number as usize > self.n_elements {
            return Err(ElementError::not_found(number));
        }
        Ok(if self.banks.contains(&number) {
            Classification::Bank
        } else if number as usize <= self.n_land {
            Classification::Land
        } else {
            Classification::River
        })
    }

    /// True for bank elements.
    pub fn is_excluded(&self, number: u32) -> bool {
        self.banks.contains(&number)
    }

    /// First `(row, col)` whose square number is `number`.
    pub fn grid_position(&self, number: u32) -> Result<(usize, usize), ElementError> {
        self.grid_cells(number).map(|cells| cells[0])
    }

    /// Every `(row, col)` whose square number is `number`.
    pub fn grid_cells(&self, number: u32) -> Result<&[(usize, usize)], ElementError> {
        self.squares
            .get(&number)
            .filter(|cells| !cells.is_empty())
            .map(Vec::as_slice)
            .ok_or_else(|| ElementError::not_found_in(number, "grid"))
    }

    /// Squares that have `number` on one of their edges.
    pub fn edge_positions(&self, number: u32) -> &[(usize, usize, Edge)] {
        self.edges.get(&number).map(Vec::as_slice).unwrap_or_default()
    }

    /// Analysed land elements, ascending.
    pub fn land_elements(&self) -> &[u32] {
        &self.land
    }

    /// Analysed river elements, ascending.
    pub fn river_elements(&self) -> &[u32] {
        &self.river
    }

    /// Row of `number` in a per-land array.
    pub fn land_row(&self, number: u32) -> Result<usize, ElementError> {
        match self.classify(number) {
            Ok(Classification::Land) => Ok(number as usize - 1),
            _ => Err(ElementError::not_found_in(number, "land")),
        }
    }

    /// Row of `number` in a per-river array.
    pub fn river_row(&self, number: u32) -> Result<usize, ElementError> {
        match self.classify(number) {
            Ok(Classification::River) => Ok(number as usize - self.n_land - 1),
            _ => Err(ElementError::not_found_in(number, "river")),
        }
    }

    pub fn n_land(&self) -> usize {
        self.n_land
    }

    /// Width of per-river arrays, banks included.
    pub fn n_river(&self) -> usize {
        self.n_elements - self.n_land
    }

    pub fn n_elements(&self) -> usize {
        self.n_elements
    }

    /// `(rows, cols)` of the numbering grid.
    pub fn grid_shape(&self) -> (usize, usize) {
        let (rows, cols, _) = self.numbering.dim();
        (rows, cols)
    }
}

fn to_element_number(v: f64) -> u32 {
    if v.is_finite() && v >= 1.0 {
        v as u32
    } else {
        0
    }
}
