// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Fully-stressed-design iteration helpers.
//!
//! A FESS optimizer repeatedly removes material whose stress is below a
//! threshold and repairs what is left. Stresses come from an external finite
//! element solve, one value per cell in coordinate order.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::RepairConfig;
use crate::densities::Densities;
use crate::error::GridError;
use crate::repair::RepairReport;

/// Empty every filled, editable cell whose stress is below `threshold`.
///
/// Removals go through edit memory so they can be restored individually.
/// Returns the number of cells removed.
pub fn remove_low_stress_cells(
    densities: &mut Densities,
    stresses: &[f64],
    threshold: f64,
) -> Result<usize, GridError> {
    let cell_count = densities.grid().cell_count();
    if stresses.len() != cell_count {
        return Err(GridError::CellCountMismatch {
            expected: cell_count,
            found: stresses.len(),
        });
    }

    let targets: Vec<usize> = stresses
        .iter()
        .enumerate()
        .filter(|&(coord, &stress)| {
            stress < threshold
                && densities.grid().is_filled(coord)
                && densities.constraints().is_editable(coord)
        })
        .map(|(coord, _)| coord)
        .collect();
    for &coord in &targets {
        densities.remove_and_remember(coord)?;
    }
    debug!(removed = targets.len(), threshold, "removed low-stress cells");
    Ok(targets.len())
}

/// Result of one [`step`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FessOutcome {
    /// Cells removed by pruning, before repair.
    pub removed: usize,
    /// False if the step was rolled back.
    pub accepted: bool,
    /// True if nothing was below the threshold.
    pub converged: bool,
    /// Absent when repair rejected the candidate.
    pub report: Option<RepairReport>,
}

/// One guarded FESS iteration: checkpoint, flush edit memory, prune
/// low-stress cells, repair.
///
/// If repair rejects the candidate or leaves more than one piece the grid and
/// its edit memory are rolled back to the checkpoint and the outcome is not
/// accepted. A step refused because a snapshot is already open changes
/// nothing.
pub fn step(
    densities: &mut Densities,
    stresses: &[f64],
    threshold: f64,
    config: &RepairConfig,
) -> Result<FessOutcome, GridError> {
    config.validate()?;
    let checkpoint = densities.save_snapshot()?;
    densities.flush_edit_memory();

    let removed = match remove_low_stress_cells(densities, stresses, threshold) {
        Ok(removed) => removed,
        Err(err) => {
            densities.load_snapshot(checkpoint)?;
            return Err(err);
        }
    };
    let mut outcome = FessOutcome {
        removed,
        converged: removed == 0,
        ..FessOutcome::default()
    };

    match densities.repair_with(config) {
        Ok(report) if report.single_piece => {
            densities.release_snapshot(checkpoint)?;
            outcome.accepted = true;
            outcome.report = Some(report);
            info!(removed, filled = densities.count(), "fess step accepted");
        }
        Ok(report) => {
            densities.load_snapshot(checkpoint)?;
            outcome.report = Some(report);
            warn!(removed, "fess step left several pieces, rolled back");
        }
        Err(err) if err.is_recoverable() => {
            densities.load_snapshot(checkpoint)?;
            warn!(removed, %err, "fess step rejected, rolled back");
        }
        Err(err) => {
            densities.load_snapshot(checkpoint)?;
            return Err(err);
        }
    }
    Ok(outcome)
}
