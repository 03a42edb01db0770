// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Connected-component labeling of filled cells.
//!
//! A piece is a maximal set of filled cells joined through shared edges;
//! diagonal contact does not connect. Labeling is a breadth-first flood fill
//! over an explicit frontier queue, seeded from every unvisited filled cell
//! in increasing coordinate order. For identical input this yields:
//!
//! - pieces ordered by their lowest coordinate, and
//! - each piece's cells in flood-fill visitation order (the seed first).
//!
//! Pieces hold coordinates only. They are recomputed from the grid on every
//! call and never outlive the grid state they were computed from.

use std::cmp::Reverse;
use std::collections::VecDeque;

use crate::densities::Densities;
use crate::grid::DensityGrid;

/// One connected group of filled cells.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Piece {
    pub(crate) cells: Vec<usize>,
}

impl Piece {
    pub fn new(cells: Vec<usize>) -> Self {
        Self { cells }
    }

    /// Member coordinates in discovery order.
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Lowest member coordinate.
    pub fn first(&self) -> Option<usize> {
        self.cells.iter().copied().min()
    }

    pub fn contains(&self, coord: usize) -> bool {
        self.cells.contains(&coord)
    }
}

/// Label every filled cell of `grid`.
///
/// Returns the pieces and, for each coordinate, the index of the piece that
/// owns it.
pub fn find_pieces(grid: &DensityGrid) -> (Vec<Piece>, Vec<Option<usize>>) {
    let mut labels = vec![None; grid.cell_count()];
    let mut pieces = Vec::new();
    let mut frontier = VecDeque::new();

    for seed in 0..grid.cell_count() {
        if labels[seed].is_some() || !grid.is_filled(seed) {
            continue;
        }
        let id = pieces.len();
        let mut cells = Vec::new();
        labels[seed] = Some(id);
        frontier.push_back(seed);

        while let Some(coord) = frontier.pop_front() {
            cells.push(coord);
            for next in grid.neighbors(coord) {
                if labels[next].is_none() && grid.is_filled(next) {
                    labels[next] = Some(id);
                    frontier.push_back(next);
                }
            }
        }
        pieces.push(Piece { cells });
    }
    (pieces, labels)
}

/// Index of the largest piece; ties go to the piece with the lowest first
/// coordinate.
pub fn dominant_piece(pieces: &[Piece]) -> Option<usize> {
    pieces
        .iter()
        .enumerate()
        .max_by_key(|(_, piece)| (piece.len(), Reverse(piece.first())))
        .map(|(idx, _)| idx)
}

/// Index of the strictly largest piece, or the number of pieces tied for
/// largest.
pub fn unique_largest(pieces: &[Piece]) -> Result<usize, usize> {
    let largest = pieces.iter().map(Piece::len).max().unwrap_or(0);
    let mut tied = pieces
        .iter()
        .enumerate()
        .filter(|(_, piece)| piece.len() == largest);
    match (tied.next(), tied.count()) {
        (Some((idx, _)), 0) => Ok(idx),
        (Some(_), others) => Err(others + 1),
        (None, _) => Err(0),
    }
}

impl Densities {
    /// Recompute the pieces of the current grid.
    pub fn init_pieces(&mut self) -> &[Piece] {
        let (pieces, labels) = find_pieces(&self.grid);
        self.pieces = pieces;
        self.labels = labels;
        &self.pieces
    }

    /// True iff the filled cells form exactly one piece.
    ///
    /// A grid with no filled cells is not a single piece.
    pub fn is_single_piece(&mut self) -> bool {
        self.init_pieces().len() == 1
    }

    /// Pieces from the last [`Densities::init_pieces`], adjusted for deletions
    /// and restorations made since.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Index of the piece owning `coord`, if any.
    pub fn piece_of(&self, coord: usize) -> Option<usize> {
        self.labels.get(coord).copied().flatten()
    }

    /// Rebuild the coordinate-to-piece index from `pieces`.
    pub(crate) fn relabel(&mut self) {
        self.labels.iter_mut().for_each(|label| *label = None);
        for (id, piece) in self.pieces.iter().enumerate() {
            for &coord in &piece.cells {
                self.labels[coord] = Some(id);
            }
        }
    }

    /// True if any cell of `piece` is keep or frozen-filled material.
    pub(crate) fn holds_required(&self, piece: &Piece) -> bool {
        piece
            .cells
            .iter()
            .any(|&coord| self.constraints.is_required(coord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces_of(text: &str) -> Vec<Piece> {
        let grid: DensityGrid = text.parse().unwrap();
        find_pieces(&grid).0
    }

    #[test]
    fn test_diagonal_contact_does_not_connect() {
        let pieces = pieces_of("#.\n.#");
        assert_eq!(pieces.len(), 2);
    }

    #[test]
    fn test_pieces_ordered_by_lowest_coordinate() {
        // Column-major coordinates: the left column is scanned first.
        let grid: DensityGrid = "..#\n#..\n..#".parse().unwrap();
        let (pieces, labels) = find_pieces(&grid);
        assert_eq!(pieces.len(), 3);
        let firsts: Vec<_> = pieces.iter().map(|p| p.first().unwrap()).collect();
        let mut sorted = firsts.clone();
        sorted.sort();
        assert_eq!(firsts, sorted);
        assert_eq!(labels[grid.coord(0, 1).unwrap()], Some(0));
    }

    #[test]
    fn test_visitation_order_is_breadth_first() {
        let grid: DensityGrid = "###".parse().unwrap();
        let (pieces, _) = find_pieces(&grid);
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].cells(), &[0, 1, 2]);
    }

    #[test]
    fn test_dominant_piece_tie_breaks_on_first_coordinate() {
        let pieces = vec![
            Piece::new(vec![9, 10]),
            Piece::new(vec![3, 4]),
            Piece::new(vec![0]),
        ];
        assert_eq!(dominant_piece(&pieces), Some(1));
        assert_eq!(dominant_piece(&[]), None);
    }

    #[test]
    fn test_unique_largest() {
        let unique = vec![Piece::new(vec![0]), Piece::new(vec![4, 5])];
        assert_eq!(unique_largest(&unique), Ok(1));

        let tied = vec![
            Piece::new(vec![0]),
            Piece::new(vec![4]),
            Piece::new(vec![8]),
        ];
        assert_eq!(unique_largest(&tied), Err(3));
        assert_eq!(unique_largest(&[]), Err(0));
    }

    #[test]
    fn test_empty_grid_is_not_single_piece() {
        let mut d = Densities::unconstrained(DensityGrid::new(4, 4).unwrap());
        assert!(!d.is_single_piece());
        assert!(d.pieces().is_empty());
    }
}
