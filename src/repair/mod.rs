// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Repair of a density grid into a single feasible structure.
//!
//! The pipeline runs a fixed sequence of stages:
//!
//! 1. **Filter** - re-apply cutout, keep and inactive constraints
//! 2. **IsolatedMaterial** - remove everything not attached to the anchor
//!    piece; stop with [`GridError::UnrepairableCandidate`] if there is none
//! 3. **FillVoids** - smoothing passes until a pass fills nothing
//! 4. **Refilter** - constraints again, after the constraint-unaware stages
//! 5. **Connectivity** - final single-piece check
//!
//! Running the pipeline on its own output changes no cells.

pub mod feasibility;
pub mod isolated;
pub mod pieces;
pub mod voids;

use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use tracing::{debug, debug_span, warn};

use crate::config::RepairConfig;
use crate::densities::Densities;
use crate::error::GridError;
use crate::statistics::Counters;

/// Stages of the repair pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum RepairStage {
    Filter,
    IsolatedMaterial,
    FillVoids,
    Refilter,
    Connectivity,
}

/// What one repair run changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    /// Cells changed by the two filtering stages.
    pub filtered: usize,
    pub pieces_removed: usize,
    pub voids_filled: usize,
    /// Smoothing passes that filled at least one cell.
    pub void_passes: usize,
    pub single_piece: bool,
    /// Filled cells after repair.
    pub filled: usize,
}

impl RepairReport {
    /// True if the run changed no cells.
    pub fn is_noop(&self) -> bool {
        self.filtered == 0 && self.pieces_removed == 0 && self.voids_filled == 0
    }
}

impl Densities {
    /// Repair with the default [`RepairConfig`].
    pub fn repair(&mut self) -> Result<RepairReport, GridError> {
        self.repair_with(&RepairConfig::default())
    }

    /// Run the repair pipeline.
    ///
    /// An [`GridError::UnrepairableCandidate`] error leaves the grid
    /// filtered but otherwise unchanged; the caller should reject the
    /// candidate.
    pub fn repair_with(&mut self, config: &RepairConfig) -> Result<RepairReport, GridError> {
        config.validate()?;
        let mut report = RepairReport::default();

        for stage in RepairStage::iter() {
            let _span = debug_span!("repair", %stage).entered();
            match stage {
                RepairStage::Filter | RepairStage::Refilter => {
                    report.filtered += self.do_feasibility_filtering();
                }
                RepairStage::IsolatedMaterial => match self.try_remove_isolated_material() {
                    Ok(removed) => report.pieces_removed = removed,
                    Err(err) => {
                        self.statistics.increment(Counters::RejectedRepairs);
                        self.update_count();
                        warn!(%err, "repair rejected candidate");
                        return Err(err);
                    }
                },
                RepairStage::FillVoids => loop {
                    let filled = self.fill_voids(config.void_neighbor_threshold);
                    if filled == 0 {
                        break;
                    }
                    report.voids_filled += filled;
                    report.void_passes += 1;
                },
                RepairStage::Connectivity => {
                    report.single_piece = self.is_single_piece();
                }
            }
        }

        report.filled = self.update_count();
        debug!(?report, "repair finished");
        Ok(report)
    }
}
