// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integration tests for edit memory and checkpoints.
//!
//! These exercise the undo workflow an optimizer relies on: speculative
//! removals, exact restoration, and rollback of a whole iteration.

mod common;

use common::{at, densities};
use density_repair::{CellState, GridError};

#[test]
fn test_remove_and_restore_single_cell() {
    let mut d = densities(
        "
        ###
        ###
        ",
    );
    let coord = at(&d, 1, 0);
    d.remove_and_remember(coord).unwrap();
    assert_eq!(d.get(coord).unwrap(), CellState::Empty);
    assert_eq!(d.count(), 5);

    d.restore(coord).unwrap();
    assert_eq!(d.get(coord).unwrap(), CellState::Filled);
    assert_eq!(d.count(), 6);
}

#[test]
fn test_restore_uses_most_recent_record() {
    let mut d = densities(
        "
        #.
        ",
    );
    let filled = at(&d, 0, 0);
    let empty = at(&d, 1, 0);

    // Removing an empty cell records EMPTY as its prior state.
    d.remove_and_remember(empty).unwrap();
    d.remove_and_remember(filled).unwrap();
    assert_eq!(d.count(), 0);

    d.restore(filled).unwrap();
    d.restore(empty).unwrap();
    assert_eq!(d.to_string(), "#.\n");
    assert!(d.memory().is_empty());
}

#[test]
fn test_restore_without_record_fails() {
    let mut d = densities("##");
    let coord = at(&d, 0, 0);
    assert!(matches!(
        d.restore(coord),
        Err(GridError::EditMemoryUnderflow { .. })
    ));
    assert_eq!(d.count(), 2);
}

#[test]
fn test_out_of_range_edits_fail_cleanly() {
    let mut d = densities("##");
    let before = d.grid().clone();
    assert!(matches!(
        d.set(2, CellState::Empty),
        Err(GridError::OutOfRangeCoordinate { coord: 2, len: 2 })
    ));
    assert!(d.del(99).is_err());
    assert!(d.get(2).is_err());
    assert_eq!(d.grid(), &before);
}

#[test]
fn test_marked_cannot_be_stored() {
    let mut d = densities("#");
    assert!(matches!(
        d.set(0, CellState::Marked),
        Err(GridError::TransientState { coord: 0 })
    ));
}

#[test]
fn test_checkpoint_rolls_back_iteration() {
    let mut d = densities(
        "
        ####
        #..#
        ####
        ",
    );
    let before = d.grid().clone();

    let checkpoint = d.save_snapshot().unwrap();
    d.remove_and_remember(at(&d, 0, 0)).unwrap();
    d.remove_and_remember(at(&d, 1, 0)).unwrap();
    d.set(at(&d, 1, 1), CellState::Filled).unwrap();
    d.init_pieces();
    d.remove_smaller_pieces();
    assert_ne!(d.grid(), &before);

    d.load_snapshot(checkpoint).unwrap();
    assert_eq!(d.grid(), &before);
    assert_eq!(d.count(), 10);
    assert!(d.memory().is_empty());
}

#[test]
fn test_checkpoint_keeps_earlier_history() {
    let mut d = densities("###");
    d.remove_and_remember(at(&d, 0, 0)).unwrap();

    let checkpoint = d.save_snapshot().unwrap();
    d.remove_and_remember(at(&d, 1, 0)).unwrap();
    d.load_snapshot(checkpoint).unwrap();

    assert_eq!(d.memory().removed_cells().len(), 1);
    d.restore(at(&d, 0, 0)).unwrap();
    assert_eq!(d.count(), 3);
}

#[test]
fn test_rollback_resurrects_drained_piece_records() {
    let mut d = densities("###.#");
    let original = d.grid().clone();
    d.init_pieces();
    assert_eq!(d.remove_smaller_pieces(), 1);

    let checkpoint = d.save_snapshot().unwrap();
    d.restore_removed_pieces();
    d.load_snapshot(checkpoint).unwrap();
    assert_eq!(d.to_string(), "###..\n");
    assert_eq!(d.memory().removed_pieces().len(), 1);

    assert_eq!(d.restore_removed_pieces(), 1);
    assert_eq!(d.count(), 4);
    assert_eq!(d.grid(), &original);
}

#[test]
fn test_rollback_restores_memory_exactly() {
    let mut d = densities("###");
    let (a, b, c) = (at(&d, 0, 0), at(&d, 1, 0), at(&d, 2, 0));
    d.remove_and_remember(a).unwrap();
    d.remove_and_remember(b).unwrap();
    let saved = d.memory().clone();

    let checkpoint = d.save_snapshot().unwrap();
    d.restore(a).unwrap();
    d.remove_and_remember(c).unwrap();
    d.load_snapshot(checkpoint).unwrap();

    assert_eq!(d.to_string(), "..#\n");
    assert_eq!(d.memory(), &saved);
    let coords: Vec<usize> = d.memory().removed_cells().iter().map(|r| r.coord).collect();
    assert_eq!(coords, vec![a, b]);

    d.restore(a).unwrap();
    d.restore(b).unwrap();
    assert!(d.restore(c).is_err());
    assert_eq!(d.count(), 3);
}

#[test]
fn test_release_commits_edits() {
    let mut d = densities("###");
    let checkpoint = d.save_snapshot().unwrap();
    d.remove_and_remember(at(&d, 2, 0)).unwrap();
    d.release_snapshot(checkpoint).unwrap();
    assert_eq!(d.to_string(), "##.\n");
    assert!(!d.has_open_snapshot());
}

#[test]
fn test_independent_contexts() {
    // Forked contexts share constraints but never grid state or history.
    let mut a = densities(
        "
        K##
        ",
    );
    let mut b = a.fork();

    a.remove_and_remember(at(&a, 2, 0)).unwrap();
    let checkpoint = b.save_snapshot().unwrap();

    assert_eq!(a.count(), 2);
    assert_eq!(b.count(), 3);
    assert!(b.memory().is_empty());
    assert!(!a.has_open_snapshot());
    assert!(b.constraints().is_keep(at(&b, 0, 0)));
    b.release_snapshot(checkpoint).unwrap();
}
