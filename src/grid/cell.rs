// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Per-cell material state.

use serde::{Deserialize, Serialize};

/// State of one grid cell.
///
/// Only `Empty` and `Filled` are ever stored. `Marked` exists so diagnostic
/// renderings can highlight cells (keep cells, a selected piece) without
/// touching the stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Empty,
    Filled,
    Marked,
}

impl CellState {
    #[inline]
    pub fn is_filled(self) -> bool {
        self == CellState::Filled
    }

    /// Symbol used by the textual rendering.
    pub fn symbol(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Filled => '#',
            CellState::Marked => 'o',
        }
    }

    /// Parse a stored state from its rendering symbol (`0`/`1` are accepted too).
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' | '0' => Some(CellState::Empty),
            '#' | '1' => Some(CellState::Filled),
            _ => None,
        }
    }

    /// Binary density value (1 for filled, 0 otherwise).
    pub fn density(self) -> u8 {
        u8::from(self.is_filled())
    }
}

impl From<bool> for CellState {
    fn from(filled: bool) -> Self {
        if filled {
            CellState::Filled
        } else {
            CellState::Empty
        }
    }
}
