// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Topology repair for binary density grids.
//!
//! Structural optimizers (fully-stressed design, genetic algorithms) edit a
//! grid of solid and void cells. After every edit the structure must again be
//! one edge-connected piece that respects its boundary conditions. This crate
//! stores the grid, finds its pieces, and repairs it.
//!
//! # Architecture
//!
//! The implementation separates shared and owned data:
//!
//! ## Shared: Constraints (Immutable)
//!
//! Fixed for a whole optimization run and shared through `Arc`:
//! - Cutout cells, always empty
//! - Keep cells, always filled
//! - Inactive cells, frozen in their initial state
//!
//! ## Owned: Densities (Mutable)
//!
//! One per optimizer run or GA individual:
//! - [`DensityGrid`] - the cells and a filled count
//! - [`EditMemory`] - undo records for removed cells and removed pieces
//! - Piece bookkeeping from the last connectivity analysis
//!
//! # Repair
//!
//! [`Densities::repair`] runs, in order:
//!
//! 1. Feasibility filtering against the constraints
//! 2. Isolated-material removal (rejects candidates with no anchor piece)
//! 3. Void filling until no void qualifies
//! 4. Feasibility filtering again
//! 5. A final single-piece check
//!
//! # Coordinates
//!
//! Cells are stored column-major with the top row last in each column:
//! `coord = (x + 1) * dim_y - y - 1`, where `y = 0` is the top row.
//!
//! # Parallelism
//!
//! Contexts share nothing mutable, so [`evolve::Population`] seeds and
//! repairs its individuals on the rayon pool.

pub mod config;
pub mod connectivity;
pub mod constraints;
pub mod densities;
pub mod error;
pub mod evolve;
pub mod fess;
pub mod grid;
pub mod memory;
pub mod repair;
pub mod statistics;
pub mod telemetry;

// Re-export commonly used types
pub use config::{PopulationConfig, RepairConfig, Settings};
pub use connectivity::Piece;
pub use constraints::{Constraints, Layout};
pub use densities::Densities;
pub use error::GridError;
pub use grid::{CellState, DensityGrid, GridView};
pub use memory::{Checkpoint, EditMemory};
pub use repair::{RepairReport, RepairStage};
