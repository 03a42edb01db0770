// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Pruning of secondary pieces with grouped, restorable removal records.

use tracing::debug;

use crate::connectivity::{dominant_piece, Piece};
use crate::densities::Densities;
use crate::grid::CellState;
use crate::memory::{RemovedCell, RemovedPiece};
use crate::statistics::Counters;

impl Densities {
    /// Remove every piece except the dominant one.
    ///
    /// Works on the pieces of the last [`Densities::init_pieces`]. The largest
    /// piece is kept (ties go to the lowest first coordinate), and so is any
    /// piece holding keep or frozen-filled cells, so the result can still be
    /// multi-piece. Each removed piece becomes one grouped record in edit
    /// memory. Returns the number of pieces removed.
    pub fn remove_smaller_pieces(&mut self) -> usize {
        let Some(dominant) = dominant_piece(&self.pieces) else {
            return 0;
        };
        let retain: Vec<bool> = self
            .pieces
            .iter()
            .enumerate()
            .map(|(idx, piece)| idx == dominant || self.holds_required(piece))
            .collect();
        self.prune_pieces(&retain)
    }

    /// Put back every grouped removal, most recent first.
    ///
    /// Each restored group is appended to the piece list as its own piece.
    /// Directly after [`Densities::remove_smaller_pieces`] this restores the
    /// filled count exactly. Returns the number of pieces restored.
    pub fn restore_removed_pieces(&mut self) -> usize {
        let groups = self.memory.take_pieces();
        let restored = groups.len();
        for group in groups.into_iter().rev() {
            for cell in group.cells.iter().rev() {
                self.grid.put(cell.coord, cell.prior);
            }
            let cells = group
                .cells
                .iter()
                .filter(|cell| cell.prior.is_filled())
                .map(|cell| cell.coord)
                .collect();
            self.pieces.push(Piece::new(cells));
        }
        self.relabel();
        self.statistics.add(Counters::PiecesRestored, restored);
        if restored > 0 {
            debug!(restored, count = self.grid.count(), "restored removed pieces");
        }
        restored
    }

    /// Erase every piece whose `retain` flag is false, recording each as a
    /// grouped removal.
    pub(crate) fn prune_pieces(&mut self, retain: &[bool]) -> usize {
        let pieces = std::mem::take(&mut self.pieces);
        let mut kept = Vec::with_capacity(pieces.len());
        let mut removed = 0;

        for (piece, &keep) in pieces.into_iter().zip(retain) {
            if keep {
                kept.push(piece);
                continue;
            }
            let cells: Vec<RemovedCell> = piece
                .cells
                .iter()
                .map(|&coord| RemovedCell {
                    coord,
                    prior: self.grid.put(coord, CellState::Empty),
                })
                .collect();
            self.statistics.add(Counters::CellsRemoved, cells.len());
            self.memory.push_piece(RemovedPiece { cells });
            removed += 1;
        }

        self.pieces = kept;
        self.relabel();
        self.statistics.add(Counters::PiecesRemoved, removed);
        if removed > 0 {
            debug!(removed, remaining = self.pieces.len(), "pruned pieces");
        }
        removed
    }
}
