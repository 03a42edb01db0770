// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Read-only export of a repaired grid for mesh generation and image output.

use serde::{Deserialize, Serialize};

use super::DensityGrid;
use crate::error::GridError;

/// Everything a mesh exporter needs to regenerate geometry: dimensions, the
/// binary densities (indexed by coordinate) and the constraint sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridView {
    pub dim_x: usize,
    pub dim_y: usize,
    pub densities: Vec<u8>,
    pub cutout_cells: Vec<usize>,
    pub inactive_cells: Vec<usize>,
    pub keep_cells: Vec<usize>,
}

impl GridView {
    /// View of a bare grid with no constraints.
    pub fn of_grid(grid: &DensityGrid) -> Self {
        Self {
            dim_x: grid.dim_x(),
            dim_y: grid.dim_y(),
            densities: grid.cells().iter().map(|c| c.density()).collect(),
            cutout_cells: Vec::new(),
            inactive_cells: Vec::new(),
            keep_cells: Vec::new(),
        }
    }

    /// Single-channel pixel buffer, 255 for material and 0 for void.
    ///
    /// The image is `dim_x * pixels_per_cell` wide and `dim_y * pixels_per_cell`
    /// high, row-major from the top row. Any nonzero density counts as
    /// material. Fails if `densities` does not hold one value per cell.
    pub fn to_luma(&self, pixels_per_cell: usize) -> Result<Vec<u8>, GridError> {
        let cells = self.dim_x * self.dim_y;
        if self.densities.len() != cells {
            return Err(GridError::CellCountMismatch {
                expected: cells,
                found: self.densities.len(),
            });
        }

        let width = self.dim_x * pixels_per_cell;
        let height = self.dim_y * pixels_per_cell;
        let mut pixels = vec![0u8; width * height];
        for py in 0..height {
            let y = py / pixels_per_cell;
            for px in 0..width {
                let x = px / pixels_per_cell;
                let coord = (x + 1) * self.dim_y - y - 1;
                if self.densities[coord] != 0 {
                    pixels[py * width + px] = u8::MAX;
                }
            }
        }
        Ok(pixels)
    }
}
