// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Domain constraints on individual cells.
//!
//! - **cutout** cells must always be empty and can never be filled;
//! - **keep** cells must always be filled;
//! - **inactive** cells are frozen to the state they had when the constraints
//!   were built and are exempt from repair edits.
//!
//! A [`Constraints`] value is built once per run and then shared read-only
//! (through `Arc`) by every grid of that run, so individuals can be repaired
//! on separate threads.

use crate::error::GridError;
use crate::grid::{CellState, DensityGrid};

/// Immutable per-run constraint sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraints {
    dim_x: usize,
    dim_y: usize,
    cutout_cells: Vec<usize>,
    inactive_cells: Vec<usize>,
    keep_cells: Vec<usize>,
    cutout: Vec<bool>,
    keep: Vec<bool>,
    /// Frozen state of each inactive cell, `None` for active cells.
    frozen: Vec<Option<CellState>>,
}

impl Constraints {
    /// Constraints with every set empty.
    pub fn none(dim_x: usize, dim_y: usize) -> Self {
        let len = dim_x * dim_y;
        Self {
            dim_x,
            dim_y,
            cutout_cells: Vec::new(),
            inactive_cells: Vec::new(),
            keep_cells: Vec::new(),
            cutout: vec![false; len],
            keep: vec![false; len],
            frozen: vec![None; len],
        }
    }

    pub fn builder() -> ConstraintsBuilder {
        ConstraintsBuilder::default()
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.dim_x, self.dim_y)
    }

    /// Cutout coordinates, ascending.
    pub fn cutout_cells(&self) -> &[usize] {
        &self.cutout_cells
    }

    /// Inactive coordinates, ascending.
    pub fn inactive_cells(&self) -> &[usize] {
        &self.inactive_cells
    }

    /// Keep coordinates, ascending.
    pub fn keep_cells(&self) -> &[usize] {
        &self.keep_cells
    }

    #[inline]
    pub fn is_cutout(&self, coord: usize) -> bool {
        self.cutout[coord]
    }

    #[inline]
    pub fn is_keep(&self, coord: usize) -> bool {
        self.keep[coord]
    }

    #[inline]
    pub fn is_inactive(&self, coord: usize) -> bool {
        self.frozen[coord].is_some()
    }

    #[inline]
    pub fn frozen_state(&self, coord: usize) -> Option<CellState> {
        self.frozen[coord]
    }

    /// True if any repair edit may change this cell.
    #[inline]
    pub fn is_editable(&self, coord: usize) -> bool {
        !self.cutout[coord] && !self.keep[coord] && self.frozen[coord].is_none()
    }

    /// Material that repair must never delete: keep cells and inactive cells
    /// frozen filled.
    #[inline]
    pub fn is_required(&self, coord: usize) -> bool {
        self.keep[coord] || self.frozen[coord] == Some(CellState::Filled)
    }

    /// Coordinates of all required material, ascending.
    pub fn required_cells(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.keep.len()).filter(|&c| self.is_required(c))
    }

    /// The state a constrained cell must hold, `None` if unconstrained.
    pub fn forced_state(&self, coord: usize) -> Option<CellState> {
        if self.cutout[coord] {
            Some(CellState::Empty)
        } else if self.keep[coord] {
            Some(CellState::Filled)
        } else {
            self.frozen[coord]
        }
    }
}

/// Collects constraint coordinates and validates them against a grid.
#[derive(Debug, Default, Clone)]
pub struct ConstraintsBuilder {
    cutout: Vec<usize>,
    inactive: Vec<usize>,
    keep: Vec<usize>,
}

impl ConstraintsBuilder {
    pub fn cutout<I: IntoIterator<Item = usize>>(mut self, coords: I) -> Self {
        self.cutout.extend(coords);
        self
    }

    pub fn inactive<I: IntoIterator<Item = usize>>(mut self, coords: I) -> Self {
        self.inactive.extend(coords);
        self
    }

    pub fn keep<I: IntoIterator<Item = usize>>(mut self, coords: I) -> Self {
        self.keep.extend(coords);
        self
    }

    /// Validate the sets and freeze inactive cells.
    ///
    /// Inactive cells freeze to the state they will have once cutout and keep
    /// forcing is applied to `grid`. Fails with
    /// [`GridError::InfeasibleConstraints`] if a cell is both cutout and keep.
    pub fn build(self, grid: &DensityGrid) -> Result<Constraints, GridError> {
        let (dim_x, dim_y) = grid.dims();
        let mut constraints = Constraints::none(dim_x, dim_y);

        for coord in normalize(self.cutout, grid)? {
            constraints.cutout[coord] = true;
            constraints.cutout_cells.push(coord);
        }
        for coord in normalize(self.keep, grid)? {
            if constraints.cutout[coord] {
                return Err(GridError::InfeasibleConstraints { coord });
            }
            constraints.keep[coord] = true;
            constraints.keep_cells.push(coord);
        }
        for coord in normalize(self.inactive, grid)? {
            let state = if constraints.cutout[coord] {
                CellState::Empty
            } else if constraints.keep[coord] {
                CellState::Filled
            } else {
                grid.cells()[coord]
            };
            constraints.frozen[coord] = Some(state);
            constraints.inactive_cells.push(coord);
        }
        Ok(constraints)
    }
}

fn normalize(mut coords: Vec<usize>, grid: &DensityGrid) -> Result<Vec<usize>, GridError> {
    coords.sort_unstable();
    coords.dedup();
    for &coord in &coords {
        grid.check(coord)?;
    }
    Ok(coords)
}

/// Pre-decoded input from a density-file or image loader.
///
/// The loader owns the file format; this is only the decoded payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Layout {
    pub dim_x: usize,
    pub dim_y: usize,
    /// Cell states indexed by coordinate.
    pub cells: Vec<CellState>,
    pub cutout_cells: Vec<usize>,
    pub inactive_cells: Vec<usize>,
    pub keep_cells: Vec<usize>,
}
