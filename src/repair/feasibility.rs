// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Re-application of cutout, keep and inactive constraints.

use std::sync::Arc;

use tracing::debug;

use crate::densities::Densities;
use crate::statistics::Counters;

impl Densities {
    /// Force every constrained cell to the state its constraint requires.
    ///
    /// Cutout cells become empty, keep cells filled, inactive cells their
    /// frozen state. Piece pruning and void filling do not look at
    /// constraints, so this must run after them. Returns the number of cells
    /// changed; a second call in a row changes nothing.
    pub fn do_feasibility_filtering(&mut self) -> usize {
        let constraints = Arc::clone(&self.constraints);
        let constrained = constraints
            .cutout_cells()
            .iter()
            .chain(constraints.keep_cells())
            .chain(constraints.inactive_cells());

        let mut changed = 0;
        for &coord in constrained {
            let Some(state) = constraints.forced_state(coord) else {
                continue;
            };
            if self.grid.cells()[coord] == state {
                continue;
            }
            self.grid.put(coord, state);
            if !state.is_filled() {
                self.disown(coord);
            }
            changed += 1;
        }

        self.statistics.add(Counters::CellsFiltered, changed);
        if changed > 0 {
            debug!(changed, "feasibility filtering changed cells");
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use crate::constraints::Constraints;
    use crate::densities::Densities;
    use crate::grid::{CellState, DensityGrid};
    use std::sync::Arc;

    #[test]
    fn test_filter_forces_each_kind() {
        let grid: DensityGrid = "##.\n#..".parse().unwrap();
        let cutout = grid.coord(0, 0).unwrap();
        let keep = grid.coord(2, 1).unwrap();
        let inactive = grid.coord(1, 0).unwrap();
        let constraints = Constraints::builder()
            .cutout([cutout])
            .keep([keep])
            .inactive([inactive])
            .build(&grid)
            .unwrap();
        let mut d = Densities::new(grid, Arc::new(constraints)).unwrap();

        // Break the frozen cell after the constraints were built.
        d.set(inactive, CellState::Empty).unwrap();

        assert_eq!(d.do_feasibility_filtering(), 3);
        assert_eq!(d.get(cutout).unwrap(), CellState::Empty);
        assert_eq!(d.get(keep).unwrap(), CellState::Filled);
        assert_eq!(d.get(inactive).unwrap(), CellState::Filled);
        assert_eq!(d.count(), 3);

        assert_eq!(d.do_feasibility_filtering(), 0);
    }
}
