// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Dense storage for binary density distributions.
//!
//! Cells are addressed by a single linear coordinate
//!
//! ```text
//! coord = (x + 1) * dim_y - y - 1
//! ```
//!
//! so each column `x` occupies a contiguous block of `dim_y` coordinates and
//! row `y = 0` (the top row of the rendering) sits at the end of its block.
//! Every component converts between `(x, y)` and `coord` through
//! [`DensityGrid::coord`] and [`DensityGrid::position`].
//!
//! # Examples
//!
//! ```
//! use density_repair::grid::{CellState, DensityGrid};
//!
//! let mut grid: DensityGrid = "#.\n##".parse().unwrap();
//! assert_eq!(grid.count(), 3);
//!
//! let top_right = grid.coord(1, 0).unwrap();
//! grid.set(top_right, CellState::Filled).unwrap();
//! assert_eq!(grid.to_string(), "##\n##\n");
//! ```

pub mod cell;
pub mod view;

pub use cell::CellState;
pub use view::GridView;

use crate::error::GridError;
use std::fmt;
use std::str::FromStr;

/// A `dim_x × dim_y` array of cell states with a cached filled-cell count.
///
/// Every mutator fails with [`GridError::OutOfRangeCoordinate`] for
/// coordinates outside the grid and leaves the grid unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensityGrid {
    dim_x: usize,
    dim_y: usize,
    cells: Vec<CellState>,
    /// Number of filled cells, kept in step with every write.
    filled: usize,
}

impl DensityGrid {
    /// Create an all-empty grid.
    pub fn new(dim_x: usize, dim_y: usize) -> Result<Self, GridError> {
        if dim_x == 0 || dim_y == 0 {
            return Err(GridError::InvalidDimensions { dim_x, dim_y });
        }
        Ok(Self {
            dim_x,
            dim_y,
            cells: vec![CellState::Empty; dim_x * dim_y],
            filled: 0,
        })
    }

    /// Create a grid from a pre-decoded cell array indexed by coordinate.
    pub fn from_cells(
        dim_x: usize,
        dim_y: usize,
        cells: Vec<CellState>,
    ) -> Result<Self, GridError> {
        let mut grid = Self::new(dim_x, dim_y)?;
        if cells.len() != grid.cells.len() {
            return Err(GridError::CellCountMismatch {
                expected: grid.cells.len(),
                found: cells.len(),
            });
        }
        if let Some(coord) = cells.iter().position(|&c| c == CellState::Marked) {
            return Err(GridError::TransientState { coord });
        }
        grid.cells = cells;
        grid.update_count();
        Ok(grid)
    }

    pub fn dim_x(&self) -> usize {
        self.dim_x
    }

    pub fn dim_y(&self) -> usize {
        self.dim_y
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.dim_x, self.dim_y)
    }

    /// Total number of cells (`dim_x * dim_y`).
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// All cells, indexed by coordinate.
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Linear coordinate of `(x, y)`, or `None` outside the grid.
    #[inline]
    pub fn coord(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.dim_x && y < self.dim_y {
            Some((x + 1) * self.dim_y - y - 1)
        } else {
            None
        }
    }

    /// `(x, y)` of an in-range coordinate.
    #[inline]
    pub fn position(&self, coord: usize) -> (usize, usize) {
        debug_assert!(coord < self.cells.len());
        (coord / self.dim_y, self.dim_y - 1 - coord % self.dim_y)
    }

    #[inline]
    pub fn contains(&self, coord: usize) -> bool {
        coord < self.cells.len()
    }

    pub(crate) fn check(&self, coord: usize) -> Result<(), GridError> {
        if self.contains(coord) {
            Ok(())
        } else {
            Err(GridError::OutOfRangeCoordinate {
                coord,
                len: self.cells.len(),
            })
        }
    }

    pub fn get(&self, coord: usize) -> Result<CellState, GridError> {
        self.check(coord)?;
        Ok(self.cells[coord])
    }

    /// Filled test that treats out-of-range coordinates as empty.
    #[inline]
    pub fn is_filled(&self, coord: usize) -> bool {
        self.cells.get(coord).is_some_and(|c| c.is_filled())
    }

    pub fn set(&mut self, coord: usize, state: CellState) -> Result<(), GridError> {
        self.check(coord)?;
        if state == CellState::Marked {
            return Err(GridError::TransientState { coord });
        }
        self.put(coord, state);
        Ok(())
    }

    pub fn del(&mut self, coord: usize) -> Result<(), GridError> {
        self.set(coord, CellState::Empty)
    }

    /// Write an in-range, storable state and return the prior one.
    pub(crate) fn put(&mut self, coord: usize, state: CellState) -> CellState {
        let prior = std::mem::replace(&mut self.cells[coord], state);
        match (prior.is_filled(), state.is_filled()) {
            (false, true) => self.filled += 1,
            (true, false) => self.filled -= 1,
            _ => {}
        }
        prior
    }

    /// Number of filled cells.
    pub fn count(&self) -> usize {
        self.filled
    }

    /// Recount filled cells from scratch and return the count.
    pub fn update_count(&mut self) -> usize {
        self.filled = self.cells.iter().filter(|c| c.is_filled()).count();
        self.filled
    }

    /// Deep copy of `other` into `self`; dimensions must agree.
    pub fn copy_from(&mut self, other: &DensityGrid) -> Result<(), GridError> {
        if self.dims() != other.dims() {
            return Err(GridError::DimensionMismatch {
                expected: self.dims(),
                found: other.dims(),
            });
        }
        self.cells.copy_from_slice(&other.cells);
        self.filled = other.filled;
        Ok(())
    }

    /// Edge-adjacent neighbors of an in-range coordinate.
    ///
    /// Order is fixed (left, right, above, below) so flood fills are reproducible.
    /// The boundary does not wrap.
    pub fn neighbors(&self, coord: usize) -> impl Iterator<Item = usize> {
        let (x, y) = self.position(coord);
        let dim_y = self.dim_y;
        [
            (x > 0).then(|| coord - dim_y),
            (x + 1 < self.dim_x).then(|| coord + dim_y),
            (y > 0).then(|| coord + 1),
            (y + 1 < self.dim_y).then(|| coord - 1),
        ]
        .into_iter()
        .flatten()
    }

    /// Number of filled edge-adjacent neighbors.
    pub fn filled_neighbors(&self, coord: usize) -> usize {
        self.neighbors(coord)
            .filter(|&n| self.cells[n].is_filled())
            .count()
    }

    /// Render row by row from the top, drawing cells selected by `marked` as
    /// [`CellState::Marked`].
    pub fn render_marked<F>(&self, marked: F) -> String
    where
        F: Fn(usize) -> bool,
    {
        let mut out = String::with_capacity((self.dim_x + 1) * self.dim_y);
        for y in 0..self.dim_y {
            for x in 0..self.dim_x {
                let coord = (x + 1) * self.dim_y - y - 1;
                let state = if marked(coord) {
                    CellState::Marked
                } else {
                    self.cells[coord]
                };
                out.push(state.symbol());
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for DensityGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_marked(|_| false))
    }
}

impl FromStr for DensityGrid {
    type Err = GridError;

    /// Parse the textual rendering: one line per row, top row first.
    /// Blank lines and surrounding whitespace are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let dim_y = rows.len();
        let dim_x = rows.first().map_or(0, |row| row.chars().count());
        let mut grid = Self::new(dim_x, dim_y)?;

        for (y, row) in rows.iter().enumerate() {
            let width = row.chars().count();
            if width != dim_x {
                return Err(GridError::MalformedRow {
                    row: y,
                    expected: dim_x,
                    found: width,
                });
            }
            for (x, symbol) in row.chars().enumerate() {
                let state = CellState::from_symbol(symbol).ok_or(GridError::InvalidSymbol {
                    row: y,
                    column: x,
                    symbol,
                })?;
                let coord = (x + 1) * dim_y - y - 1;
                grid.put(coord, state);
            }
        }
        Ok(grid)
    }
}
