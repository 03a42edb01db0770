// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.
//!
//! Fixtures are ASCII pictures, top row first:
//!
//! | Symbol | Cell |
//! |--------|------|
//! | `#` | filled |
//! | `.` | empty |
//! | `K` | keep (filled) |
//! | `X` / `x` | cutout, filled / empty |
//! | `I` / `i` | inactive, filled / empty |

#![allow(dead_code)]

use std::sync::Arc;

use density_repair::{CellState, Constraints, Densities, DensityGrid, Layout};

/// Decode a fixture into loader output.
pub fn layout(text: &str) -> Layout {
    let rows: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let dim_y = rows.len();
    let dim_x = rows[0].chars().count();
    let mut grid = DensityGrid::new(dim_x, dim_y).unwrap();
    let mut layout = Layout {
        dim_x,
        dim_y,
        ..Layout::default()
    };

    for (y, row) in rows.iter().enumerate() {
        assert_eq!(row.chars().count(), dim_x, "ragged fixture row {y}");
        for (x, symbol) in row.chars().enumerate() {
            let coord = grid.coord(x, y).unwrap();
            let filled = match symbol {
                '#' => true,
                '.' => false,
                'K' => {
                    layout.keep_cells.push(coord);
                    true
                }
                'X' | 'x' => {
                    layout.cutout_cells.push(coord);
                    symbol == 'X'
                }
                'I' | 'i' => {
                    layout.inactive_cells.push(coord);
                    symbol == 'I'
                }
                other => panic!("unknown fixture symbol {other:?}"),
            };
            if filled {
                grid.set(coord, CellState::Filled).unwrap();
            }
        }
    }
    layout.cells = grid.cells().to_vec();
    layout
}

/// A context exactly as drawn: constraints attached, nothing filtered yet.
pub fn densities(text: &str) -> Densities {
    let layout = layout(text);
    let grid = DensityGrid::from_cells(layout.dim_x, layout.dim_y, layout.cells).unwrap();
    let constraints = Constraints::builder()
        .cutout(layout.cutout_cells)
        .inactive(layout.inactive_cells)
        .keep(layout.keep_cells)
        .build(&grid)
        .unwrap();
    Densities::new(grid, Arc::new(constraints)).unwrap()
}

/// Coordinate of column `x`, row `y` (row 0 at the top).
pub fn at(densities: &Densities, x: usize, y: usize) -> usize {
    densities.grid().coord(x, y).unwrap()
}
