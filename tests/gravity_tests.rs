//! Gravity tests - settled grids never leave a tile above an empty cell

use drop_jelly::core::{GravityEngine, Grid, SimConfig, TileDescriptor, TileStore};
use drop_jelly::engine::Session;
use drop_jelly::types::{Color, Vec2};

fn assert_no_floating(grid: &Grid) {
    for (pos, tile) in grid.occupied() {
        if pos.row + 1 < grid.rows() as usize {
            assert!(
                grid.tile_at(pos.row as i32 + 1, pos.col as i32).is_some(),
                "{tile:?} floats at ({}, {})",
                pos.row,
                pos.col
            );
        }
    }
    assert!(grid.cells().iter().all(|c| !c.locked), "lock left behind");
}

#[test]
fn test_settle_packs_every_column() {
    let mut grid = Grid::new(5, 3, 1.0);
    let mut store = TileStore::new();
    let d = TileDescriptor::new(&[Color::Blue]).unwrap();
    for (row, col) in [(0, 0), (2, 0), (1, 1), (0, 2), (1, 2), (3, 2)] {
        let id = store.spawn(&d, Vec2::ZERO);
        grid.occupy(row, col, id);
    }

    let mut gravity = GravityEngine::new(0);
    let passes = gravity.settle_immediately(&mut grid, &store);
    assert!(passes > 0);
    assert_eq!(grid.occupied_count(), 6);
    assert_no_floating(&grid);

    // Already settled: nothing left to move.
    assert_eq!(gravity.settle_immediately(&mut grid, &store), 0);
}

#[test]
fn test_session_never_leaves_floating_tiles() {
    let mut config = SimConfig::with_size(6, 4);
    config.seed = 7;
    let mut session = Session::new(config);

    for i in 0..60 {
        let result = session.drop_current(i % 4);
        if !result.accepted {
            assert_eq!(result.code(), Some("column_full"));
            continue;
        }
        assert!(
            session.simulation_mut().run_until_idle(100_000).is_some(),
            "cascade stuck after drop {i}"
        );
        assert_no_floating(session.simulation().grid());

        // Every live tile keeps 1-4 parts, each pointing back at it.
        let sim = session.simulation();
        for (_, id) in sim.grid().occupied() {
            let tile = sim.tile(id).unwrap();
            assert!((1..=4).contains(&tile.part_count()));
            assert!(tile.parts().iter().all(|p| p.tile == id));
            assert!(tile
                .parts()
                .iter()
                .all(|p| p.position.x.abs() <= 0.25 && p.position.y.abs() <= 0.25));
        }
    }
}
