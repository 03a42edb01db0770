// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Scoped full-grid checkpoints.

use super::EditMemory;
use crate::connectivity::Piece;
use crate::grid::DensityGrid;

/// A full copy of a grid and its edit memory taken by
/// [`crate::Densities::save_snapshot`].
///
/// The caller holds the checkpoint and hands it back to either
/// [`crate::Densities::load_snapshot`] (roll back) or
/// [`crate::Densities::release_snapshot`] (keep the edits). Only one
/// checkpoint per context may be open at a time.
#[derive(Debug, Clone)]
#[must_use = "an open checkpoint must be loaded or released"]
pub struct Checkpoint {
    pub(crate) serial: u64,
    pub(crate) grid: DensityGrid,
    pub(crate) pieces: Vec<Piece>,
    pub(crate) memory: EditMemory,
}

impl Checkpoint {
    /// Identifier matched against the context's open snapshot.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// The grid as it was when the checkpoint was taken.
    pub fn grid(&self) -> &DensityGrid {
        &self.grid
    }
}
