// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integration tests for the repair stages and the full pipeline.

mod common;

use common::{at, densities, layout};
use density_repair::statistics::Counters;
use density_repair::{CellState, Densities, GridError, RepairConfig};

#[test]
fn test_fill_voids_closes_enclosed_hole() {
    let mut d = densities(
        "
        #####
        ##.##
        #####
        ",
    );
    assert_eq!(d.fill_voids(4), 1);
    assert_eq!(d.count(), 15);
    assert_eq!(d.fill_voids(4), 0);
}

#[test]
fn test_fill_voids_respects_threshold() {
    let text = "
        ###
        #..
        ###
        ";
    let mut strict = densities(text);
    assert_eq!(strict.fill_voids(4), 0);

    let mut loose = densities(text);
    // (1, 1) has three filled neighbors, (2, 1) has two.
    assert_eq!(loose.fill_voids(3), 1);
    assert_eq!(loose.get(at(&loose, 1, 1)).unwrap(), CellState::Filled);
    assert_eq!(loose.get(at(&loose, 2, 1)).unwrap(), CellState::Empty);
}

#[test]
fn test_cutout_filtering_and_rerun() {
    let mut d = densities(
        "
        X##
        ###
        ##x
        ",
    );
    assert_eq!(d.count(), 8);
    assert_eq!(d.do_feasibility_filtering(), 1);
    assert_eq!(d.count(), 7);
    assert_eq!(d.get(at(&d, 0, 0)).unwrap(), CellState::Empty);
    assert_eq!(d.do_feasibility_filtering(), 0);
}

#[test]
fn test_filtering_restores_keep_and_frozen_cells() {
    let mut d = densities(
        "
        K#I
        #.i
        ",
    );
    d.del(at(&d, 0, 0)).unwrap();
    d.del(at(&d, 2, 0)).unwrap();
    d.set(at(&d, 2, 1), CellState::Filled).unwrap();

    assert_eq!(d.do_feasibility_filtering(), 3);
    assert_eq!(d.to_string(), "###\n#..\n");
}

#[test]
fn test_from_layout_filters_on_import() {
    let d = Densities::from_layout(layout(
        "
        X#K
        ##.
        ",
    ))
    .unwrap();
    assert_eq!(d.to_string(), ".##\n##.\n");
    assert_eq!(d.count(), 4);
    assert_eq!(d.visualize_keep_cells(), ".#o\n##.\n");
}

#[test]
fn test_isolated_material_scattered_cells_rejected() {
    let mut d = densities(
        "
        #.#.#
        .....
        #...#
        ",
    );
    let before = d.grid().clone();
    assert!(!d.remove_isolated_material());
    assert_eq!(d.grid(), &before);
}

#[test]
fn test_isolated_material_two_pieces_accepted() {
    let mut d = densities(
        "
        ###..
        ###.#
        ",
    );
    assert!(d.remove_isolated_material());
    assert_eq!(d.count(), 6);
    assert!(d.is_single_piece());
}

#[test]
fn test_isolated_material_keep_group_anchors() {
    let mut d = densities(
        "
        ####..
        ####..
        ....KK
        ",
    );
    assert!(d.remove_isolated_material());
    assert_eq!(d.to_string(), "......\n......\n....##\n");
}

#[test]
fn test_isolated_material_split_keep_groups_rejected() {
    let mut d = densities(
        "
        K#..#K
        ",
    );
    assert!(matches!(
        d.try_remove_isolated_material(),
        Err(GridError::UnrepairableCandidate { anchored_pieces: 2 })
    ));
    assert_eq!(d.count(), 4);
}

#[test]
fn test_repair_connects_and_smooths() {
    let mut d = densities(
        "
        #####...
        #.#.#..#
        #####...
        ....KK..
        ....KK..
        ",
    );
    // The block touches the keep group through (4, 2)-(4, 3).
    let report = d.repair().unwrap();
    assert!(report.single_piece);
    assert_eq!(report.pieces_removed, 1);
    assert_eq!(report.voids_filled, 2);
    assert_eq!(report.filled, 19);
    assert_eq!(
        d.to_string(),
        "#####...\n#####...\n#####...\n....##..\n....##..\n"
    );
}

#[test]
fn test_repair_is_idempotent() {
    let mut d = densities(
        "
        ##..#.##
        #.#.###.
        ###...#.
        .#.#.#..
        KKKKKKKK
        ",
    );
    d.repair().unwrap();
    let repaired = d.grid().clone();

    let again = d.repair().unwrap();
    assert!(again.is_noop());
    assert_eq!(d.grid(), &repaired);
}

#[test]
fn test_rejected_repair_is_counted() {
    let mut d = densities(
        "
        K..K
        ",
    );
    assert!(matches!(
        d.repair(),
        Err(GridError::UnrepairableCandidate { .. })
    ));
    assert_eq!(d.statistics().get(Counters::RejectedRepairs), 1);
}

#[test]
fn test_repair_with_lower_threshold() {
    let mut d = densities(
        "
        ###
        #..
        ###
        ",
    );
    let config = RepairConfig {
        void_neighbor_threshold: 2,
    };
    let report = d.repair_with(&config).unwrap();
    assert_eq!(report.voids_filled, 2);
    assert_eq!(report.void_passes, 1);
    assert_eq!(d.count(), 9);
}

#[test]
fn test_bridge_between_keep_groups() {
    // A larger unanchored block must not win over the bridged keep groups.
    let bridged = "
        KK.KK.####
        .#####.###
        ......####
        ";
    let mut d = densities(bridged);
    assert!(d.remove_isolated_material());
    assert_eq!(d.to_string(), "##.##.....\n.#####....\n..........\n");

    // Without the bridge the keep groups fall into separate pieces.
    let mut cut = densities(bridged);
    cut.del(at(&cut, 3, 1)).unwrap();
    assert!(!cut.remove_isolated_material());
}
