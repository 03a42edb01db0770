// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Neighbor-count smoothing of small voids.

use tracing::debug;

use crate::densities::Densities;
use crate::grid::CellState;
use crate::statistics::Counters;

impl Densities {
    /// One smoothing pass: fill every empty, non-cutout, non-inactive cell
    /// with at least `neighbor_threshold` filled edge neighbors.
    ///
    /// All cells are judged against the grid as it was when the pass began.
    /// Cells on the boundary simply have fewer neighbors. Returns the number
    /// of cells filled.
    pub fn fill_voids(&mut self, neighbor_threshold: u8) -> usize {
        let threshold = usize::from(neighbor_threshold);
        let voids: Vec<usize> = (0..self.grid.cell_count())
            .filter(|&coord| {
                !self.grid.is_filled(coord)
                    && !self.constraints.is_cutout(coord)
                    && !self.constraints.is_inactive(coord)
                    && self.grid.filled_neighbors(coord) >= threshold
            })
            .collect();

        for &coord in &voids {
            self.grid.put(coord, CellState::Filled);
        }
        self.statistics.add(Counters::VoidsFilled, voids.len());
        if !voids.is_empty() {
            debug!(filled = voids.len(), neighbor_threshold, "filled voids");
        }
        voids.len()
    }
}
