// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Statistics
//!
//! Counters are stored in each grid context and incremented by the repair
//! operations as they edit the grid.

use strum::EnumCount;
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter};

#[derive(Debug, EnumCountMacro, EnumIter, Display, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Counters {
    CellsFiltered,
    CellsRemoved,
    PiecesRemoved,
    PiecesRestored,
    VoidsFilled,
    RejectedRepairs,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Statistics {
    stats: [u64; Counters::COUNT],
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    pub(crate) fn add(&mut self, counter: Counters, amount: usize) {
        self.stats[counter as usize] += amount as u64;
    }

    pub(crate) fn increment(&mut self, counter: Counters) {
        self.add(counter, 1);
    }

    /// Get the current value of the specified counter.
    pub fn get(&self, counter: Counters) -> u64 {
        self.stats[counter as usize]
    }

    /// Fold another context's counters into this one.
    pub fn merge(&mut self, other: &Statistics) {
        for (total, value) in self.stats.iter_mut().zip(other.stats.iter()) {
            *total += value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_counters_start_at_zero() {
        let stats = Statistics::new();
        assert!(Counters::iter().all(|c| stats.get(c) == 0));
    }

    #[test]
    fn test_add_and_merge() {
        let mut a = Statistics::new();
        a.add(Counters::CellsRemoved, 5);
        a.increment(Counters::PiecesRemoved);

        let mut b = Statistics::new();
        b.add(Counters::CellsRemoved, 2);
        b.merge(&a);

        assert_eq!(b.get(Counters::CellsRemoved), 7);
        assert_eq!(b.get(Counters::PiecesRemoved), 1);
        assert_eq!(b.get(Counters::VoidsFilled), 0);
        assert_eq!(Counters::VoidsFilled.to_string(), "VoidsFilled");
    }
}
