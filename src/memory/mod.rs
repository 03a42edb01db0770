// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Edit memory for exact undo of cell and piece removals.
//!
//! Removals are recorded on two stacks: loose single-cell removals and
//! grouped removals made by piece pruning. Each record stores the cell's prior
//! state, so replaying records in reverse restores the grid exactly.
//!
//! Records leave the stacks out of order (`restore` takes the latest match
//! for one coordinate, piece restoration drains everything), so a checkpoint
//! keeps a full copy of the memory rather than stack heights.

pub mod checkpoint;

pub use checkpoint::Checkpoint;

use crate::grid::CellState;

/// One removed cell and the state it held before removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovedCell {
    pub coord: usize,
    pub prior: CellState,
}

/// Cells removed together as one piece, in removal order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemovedPiece {
    pub cells: Vec<RemovedCell>,
}

impl RemovedPiece {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn coords(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells.iter().map(|cell| cell.coord)
    }
}

/// The undo log owned by one grid context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditMemory {
    removed_cells: Vec<RemovedCell>,
    removed_pieces: Vec<RemovedPiece>,
}

impl EditMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn removed_cells(&self) -> &[RemovedCell] {
        &self.removed_cells
    }

    pub fn removed_pieces(&self) -> &[RemovedPiece] {
        &self.removed_pieces
    }

    pub(crate) fn push_cell(&mut self, record: RemovedCell) {
        self.removed_cells.push(record);
    }

    pub(crate) fn push_piece(&mut self, piece: RemovedPiece) {
        self.removed_pieces.push(piece);
    }

    /// Remove and return the most recent loose record for `coord`.
    pub(crate) fn pop_cell(&mut self, coord: usize) -> Option<RemovedCell> {
        let idx = self.removed_cells.iter().rposition(|r| r.coord == coord)?;
        Some(self.removed_cells.remove(idx))
    }

    /// Take every grouped record, oldest first.
    pub(crate) fn take_pieces(&mut self) -> Vec<RemovedPiece> {
        std::mem::take(&mut self.removed_pieces)
    }

    /// Drop all history without touching the grid.
    pub fn flush(&mut self) {
        self.removed_cells.clear();
        self.removed_pieces.clear();
    }

    /// Total number of records on both stacks.
    pub fn len(&self) -> usize {
        self.removed_cells.len() + self.removed_pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.removed_cells.is_empty() && self.removed_pieces.is_empty()
    }
}
