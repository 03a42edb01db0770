// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Grid context combining shared constraints with owned, editable state.
//!
//! A [`Densities`] value is what one optimizer run (a FESS iteration, one GA
//! individual) works on:
//!
//! ```text
//! Densities {
//!     constraints: Arc<Constraints>,   // immutable, shared by the whole run
//!     grid: DensityGrid,               // mutable, owned
//!     memory: EditMemory,              // undo log, owned
//!     pieces: Vec<Piece>,              // last connectivity result
//! }
//! ```
//!
//! Contexts never share mutable state, so many of them can be repaired in
//! parallel as long as the shared constraints stay read-only.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::connectivity::Piece;
use crate::constraints::{Constraints, Layout};
use crate::error::GridError;
use crate::grid::{CellState, DensityGrid, GridView};
use crate::memory::{Checkpoint, EditMemory, RemovedCell};
use crate::statistics::{Counters, Statistics};

/// Checkpoint serials are unique across contexts so a checkpoint can never
/// be loaded into a grid it was not taken from.
static NEXT_CHECKPOINT: AtomicU64 = AtomicU64::new(1);

/// A density grid together with its constraints, edit memory and piece
/// bookkeeping.
#[derive(Debug, Clone)]
pub struct Densities {
    pub(crate) constraints: Arc<Constraints>,
    pub(crate) grid: DensityGrid,
    pub(crate) memory: EditMemory,
    /// Pieces from the last [`Densities::init_pieces`], minus deleted cells.
    pub(crate) pieces: Vec<Piece>,
    /// Index into `pieces` for each cell owned by a piece.
    pub(crate) labels: Vec<Option<usize>>,
    pub(crate) statistics: Statistics,
    open_checkpoint: Option<u64>,
}

impl Densities {
    /// Create a context over `grid`; the constraints must have the same dimensions.
    pub fn new(grid: DensityGrid, constraints: Arc<Constraints>) -> Result<Self, GridError> {
        if constraints.dims() != grid.dims() {
            return Err(GridError::DimensionMismatch {
                expected: grid.dims(),
                found: constraints.dims(),
            });
        }
        let labels = vec![None; grid.cell_count()];
        Ok(Self {
            constraints,
            grid,
            memory: EditMemory::new(),
            pieces: Vec::new(),
            labels,
            statistics: Statistics::new(),
            open_checkpoint: None,
        })
    }

    /// Create a context with no constraints.
    pub fn unconstrained(grid: DensityGrid) -> Self {
        let (dim_x, dim_y) = grid.dims();
        let labels = vec![None; grid.cell_count()];
        Self {
            constraints: Arc::new(Constraints::none(dim_x, dim_y)),
            grid,
            memory: EditMemory::new(),
            pieces: Vec::new(),
            labels,
            statistics: Statistics::new(),
            open_checkpoint: None,
        }
    }

    /// Build a context from decoded loader output.
    ///
    /// Cutout cells are deleted, inactive cells are frozen, and the result is
    /// passed through feasibility filtering.
    pub fn from_layout(layout: Layout) -> Result<Self, GridError> {
        let mut grid = DensityGrid::from_cells(layout.dim_x, layout.dim_y, layout.cells)?;
        let constraints = Constraints::builder()
            .cutout(layout.cutout_cells)
            .inactive(layout.inactive_cells)
            .keep(layout.keep_cells)
            .build(&grid)?;
        for &coord in constraints.cutout_cells() {
            grid.put(coord, CellState::Empty);
        }

        let mut densities = Self::new(grid, Arc::new(constraints))?;
        densities.do_feasibility_filtering();
        densities.update_count();

        info!(
            filled = densities.count(),
            inactive = densities.constraints.inactive_cells().len(),
            cutout = densities.constraints.cutout_cells().len(),
            keep = densities.constraints.keep_cells().len(),
            "loaded density layout"
        );
        Ok(densities)
    }

    /// An independent copy sharing only the constraints: edit memory,
    /// statistics and snapshot state start fresh.
    pub fn fork(&self) -> Self {
        Self {
            constraints: Arc::clone(&self.constraints),
            grid: self.grid.clone(),
            memory: EditMemory::new(),
            pieces: self.pieces.clone(),
            labels: self.labels.clone(),
            statistics: Statistics::new(),
            open_checkpoint: None,
        }
    }

    pub fn grid(&self) -> &DensityGrid {
        &self.grid
    }

    pub fn constraints(&self) -> &Arc<Constraints> {
        &self.constraints
    }

    pub fn memory(&self) -> &EditMemory {
        &self.memory
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn dims(&self) -> (usize, usize) {
        self.grid.dims()
    }

    pub fn get(&self, coord: usize) -> Result<CellState, GridError> {
        self.grid.get(coord)
    }

    /// Write a cell. Constraints are not consulted; run
    /// [`Densities::do_feasibility_filtering`] afterwards.
    pub fn set(&mut self, coord: usize, state: CellState) -> Result<(), GridError> {
        self.grid.set(coord, state)?;
        if !state.is_filled() {
            self.disown(coord);
        }
        Ok(())
    }

    /// Empty a cell and drop it from the piece that owned it.
    pub fn del(&mut self, coord: usize) -> Result<(), GridError> {
        self.set(coord, CellState::Empty)
    }

    pub fn count(&self) -> usize {
        self.grid.count()
    }

    /// Recount filled cells from scratch.
    pub fn update_count(&mut self) -> usize {
        self.grid.update_count()
    }

    /// Overwrite the grid contents with `other`. Piece bookkeeping is cleared.
    pub fn copy_from(&mut self, other: &DensityGrid) -> Result<(), GridError> {
        self.grid.copy_from(other)?;
        self.forget_pieces();
        Ok(())
    }

    /// Drop piece bookkeeping after edits that bypass it.
    pub(crate) fn forget_pieces(&mut self) {
        self.pieces.clear();
        self.labels.iter_mut().for_each(|label| *label = None);
    }

    pub(crate) fn disown(&mut self, coord: usize) {
        let Some(id) = self.labels[coord].take() else {
            return;
        };
        let piece = &mut self.pieces[id];
        piece.cells.retain(|&c| c != coord);
        if piece.cells.is_empty() {
            self.pieces.remove(id);
            self.relabel();
        }
    }

    // Edit memory

    /// Empty a cell and record its prior state on the loose-cell stack.
    pub fn remove_and_remember(&mut self, coord: usize) -> Result<(), GridError> {
        self.grid.check(coord)?;
        let prior = self.grid.put(coord, CellState::Empty);
        self.disown(coord);
        self.memory.push_cell(RemovedCell { coord, prior });
        self.statistics.increment(Counters::CellsRemoved);
        Ok(())
    }

    /// Re-apply the most recent loose removal of `coord`.
    pub fn restore(&mut self, coord: usize) -> Result<(), GridError> {
        self.grid.check(coord)?;
        let record = self
            .memory
            .pop_cell(coord)
            .ok_or(GridError::EditMemoryUnderflow { coord })?;
        self.grid.put(coord, record.prior);
        Ok(())
    }

    /// Drop all undo history, keeping the current grid as the new baseline.
    pub fn flush_edit_memory(&mut self) {
        self.memory.flush();
    }

    /// Take a full checkpoint of the grid.
    ///
    /// Fails with [`GridError::SnapshotReentrancy`] while another checkpoint
    /// of this context is open.
    pub fn save_snapshot(&mut self) -> Result<Checkpoint, GridError> {
        if self.open_checkpoint.is_some() {
            return Err(GridError::SnapshotReentrancy);
        }
        let serial = NEXT_CHECKPOINT.fetch_add(1, Ordering::Relaxed);
        self.open_checkpoint = Some(serial);
        Ok(Checkpoint {
            serial,
            grid: self.grid.clone(),
            pieces: self.pieces.clone(),
            memory: self.memory.clone(),
        })
    }

    /// Roll back to `checkpoint`: grid, pieces and edit memory all return to
    /// their state at the save.
    pub fn load_snapshot(&mut self, checkpoint: Checkpoint) -> Result<(), GridError> {
        self.close_snapshot(checkpoint.serial)?;
        self.grid.copy_from(&checkpoint.grid)?;
        self.pieces = checkpoint.pieces;
        self.relabel();
        self.memory = checkpoint.memory;
        Ok(())
    }

    /// Close `checkpoint` and keep the edits made since it was taken.
    pub fn release_snapshot(&mut self, checkpoint: Checkpoint) -> Result<(), GridError> {
        self.close_snapshot(checkpoint.serial)
    }

    pub fn has_open_snapshot(&self) -> bool {
        self.open_checkpoint.is_some()
    }

    fn close_snapshot(&mut self, serial: u64) -> Result<(), GridError> {
        if self.open_checkpoint != Some(serial) {
            return Err(GridError::UnknownCheckpoint { serial });
        }
        self.open_checkpoint = None;
        Ok(())
    }

    // Output

    /// Read-only export for mesh generation.
    pub fn view(&self) -> GridView {
        GridView {
            cutout_cells: self.constraints.cutout_cells().to_vec(),
            inactive_cells: self.constraints.inactive_cells().to_vec(),
            keep_cells: self.constraints.keep_cells().to_vec(),
            ..GridView::of_grid(&self.grid)
        }
    }

    /// Rendering with keep cells drawn as marked.
    pub fn visualize_keep_cells(&self) -> String {
        self.grid.render_marked(|coord| self.constraints.is_keep(coord))
    }

    /// Rendering with the cells of one piece drawn as marked.
    pub fn visualize_piece(&self, index: usize) -> String {
        self.grid
            .render_marked(|coord| self.labels[coord] == Some(index))
    }
}

impl fmt::Display for Densities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.grid, f)
    }
}
