// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Removal of material that is not attached to the anchoring piece.
//!
//! Unlike [`Densities::remove_smaller_pieces`] this is a validity gate. The
//! anchor is the piece holding all required material (keep cells and inactive
//! cells frozen filled). Without required material the anchor is the unique
//! largest piece. When no anchor exists the candidate cannot be repaired
//! and the grid is left untouched.

use tracing::warn;

use crate::connectivity::unique_largest;
use crate::densities::Densities;
use crate::error::GridError;

impl Densities {
    /// Remove every piece except the anchor.
    ///
    /// Returns `true` if the grid is left as a single anchored piece, `false`
    /// if the candidate must be rejected.
    pub fn remove_isolated_material(&mut self) -> bool {
        self.try_remove_isolated_material().is_ok()
    }

    /// As [`Densities::remove_isolated_material`], reporting why a candidate
    /// was rejected. On success returns the number of pieces removed.
    pub fn try_remove_isolated_material(&mut self) -> Result<usize, GridError> {
        self.init_pieces();
        let anchor = match self.anchor_piece() {
            Ok(anchor) => anchor,
            Err(err) => {
                warn!(pieces = self.pieces.len(), %err, "isolated material removal rejected");
                return Err(err);
            }
        };
        let retain: Vec<bool> = (0..self.pieces.len()).map(|idx| idx == anchor).collect();
        Ok(self.prune_pieces(&retain))
    }

    fn anchor_piece(&self) -> Result<usize, GridError> {
        if self.pieces.is_empty() {
            return Err(GridError::UnrepairableCandidate { anchored_pieces: 0 });
        }

        let mut anchored: Vec<usize> = Vec::new();
        let mut has_required = false;
        let mut missing = false;
        for coord in self.constraints.required_cells() {
            has_required = true;
            match self.labels[coord] {
                Some(id) if !anchored.contains(&id) => anchored.push(id),
                Some(_) => {}
                None => missing = true,
            }
        }

        if !has_required {
            return unique_largest(&self.pieces)
                .map_err(|tied| GridError::UnrepairableCandidate { anchored_pieces: tied });
        }
        match anchored.as_slice() {
            [anchor] if !missing => Ok(*anchor),
            _ => Err(GridError::UnrepairableCandidate {
                anchored_pieces: anchored.len(),
            }),
        }
    }
}
