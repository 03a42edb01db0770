// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for grid storage, edit memory and repair.

use thiserror::Error;

/// Errors raised by the density grid and the repair engine.
///
/// Configuration-time errors ([`GridError::InfeasibleConstraints`],
/// [`GridError::InvalidDimensions`], [`GridError::InvalidConfig`]) abort setup.
/// Per-edit errors leave the grid at its last valid state.
#[derive(Debug, Error)]
pub enum GridError {
    /// A grid was requested with a zero-length side.
    #[error("grid dimensions must be positive, got {dim_x}x{dim_y}")]
    InvalidDimensions { dim_x: usize, dim_y: usize },

    /// Two grids (or a grid and its constraints) disagree on dimensions.
    #[error("dimension mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// A per-cell array does not have `dim_x * dim_y` entries.
    #[error("expected {expected} cell values, found {found}")]
    CellCountMismatch { expected: usize, found: usize },

    /// A coordinate lies outside `[0, dim_x * dim_y)`.
    #[error("coordinate {coord} out of range for grid of {len} cells")]
    OutOfRangeCoordinate { coord: usize, len: usize },

    /// `MARKED` is a rendering-only state and cannot be stored.
    #[error("cell {coord}: MARKED is a diagnostic state and cannot be stored")]
    TransientState { coord: usize },

    /// `restore` was called for a coordinate with no removal record.
    #[error("no removal record for cell {coord}")]
    EditMemoryUnderflow { coord: usize },

    /// A snapshot was saved while another one is still open.
    #[error("a snapshot is already open; load or release it first")]
    SnapshotReentrancy,

    /// A checkpoint does not belong to the currently open snapshot.
    #[error("checkpoint {serial} is not the open snapshot")]
    UnknownCheckpoint { serial: u64 },

    /// A cell is both cutout and keep.
    #[error("cell {coord} is both a cutout cell and a keep cell")]
    InfeasibleConstraints { coord: usize },

    /// Isolated-material removal cannot satisfy the required material.
    #[error("candidate cannot be repaired: required material spans {anchored_pieces} pieces")]
    UnrepairableCandidate { anchored_pieces: usize },

    /// A character in a textual grid is not a known cell symbol.
    #[error("row {row}, column {column}: unknown cell symbol {symbol:?}")]
    InvalidSymbol {
        row: usize,
        column: usize,
        symbol: char,
    },

    /// Rows of a textual grid differ in width.
    #[error("row {row} has {found} cells, expected {expected}")]
    MalformedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A configuration value is out of its accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GridError {
    /// True for errors a caller is expected to recover from by rejecting the candidate.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GridError::UnrepairableCandidate { .. }
                | GridError::EditMemoryUnderflow { .. }
                | GridError::OutOfRangeCoordinate { .. }
                | GridError::TransientState { .. }
        )
    }
}
