//! Grid tests - occupancy, bounds and bottom-up placement

use drop_jelly::core::Grid;
use drop_jelly::types::{CellPos, TileId, Vec2, DEFAULT_COLUMNS, DEFAULT_ROWS};

#[test]
fn test_grid_new_empty() {
    let grid = Grid::new(DEFAULT_ROWS, DEFAULT_COLUMNS, 1.0);
    assert_eq!(grid.rows(), 8);
    assert_eq!(grid.columns(), 5);

    for row in 0..DEFAULT_ROWS as i32 {
        for col in 0..DEFAULT_COLUMNS as i32 {
            assert_eq!(grid.tile_at(row, col), None, "cell ({row}, {col}) should be empty");
            assert!(!grid.cell(row, col).unwrap().locked);
        }
    }
    assert_eq!(grid.occupied_count(), 0);
}

#[test]
fn test_tile_at_out_of_bounds_is_empty() {
    let mut grid = Grid::new(3, 3, 1.0);
    for col in 0..3 {
        grid.place(col, TileId(col as u32 + 1));
    }

    assert_eq!(grid.tile_at(-1, 0), None);
    assert_eq!(grid.tile_at(0, -1), None);
    assert_eq!(grid.tile_at(3, 0), None);
    assert_eq!(grid.tile_at(0, 3), None);
    assert!(grid.cell(3, 3).is_none());
}

#[test]
fn test_place_into_column_with_only_bottom_free() {
    let mut grid = Grid::new(4, 2, 1.0);
    // Rows 0..N-2 occupied, bottom row free.
    for row in 0..3 {
        assert!(grid.occupy(row, 0, TileId(10 + row as u32)));
    }
    assert_eq!(grid.landing_row(0), Some(3));

    assert!(grid.place(0, TileId(1)));
    assert_eq!(grid.tile_at(3, 0), Some(TileId(1)));

    let before: Vec<_> = grid.occupied().collect();
    assert!(!grid.place(0, TileId(2)));
    let after: Vec<_> = grid.occupied().collect();
    assert_eq!(before, after);
    assert!(grid.is_column_full(0));
}

#[test]
fn test_remove_tile_is_noop_on_empty() {
    let mut grid = Grid::new(2, 2, 1.0);
    assert_eq!(grid.remove_tile(0, 0), None);
    assert_eq!(grid.remove_tile(5, 5), None);

    grid.occupy(1, 1, TileId(3));
    assert_eq!(grid.remove_tile(1, 1), Some(TileId(3)));
    assert_eq!(grid.remove_tile(1, 1), None);
}

#[test]
fn test_cell_world_positions() {
    let grid = Grid::new(8, 5, 1.5);
    assert_eq!(grid.world_position(CellPos::new(0, 0)), Vec2::ZERO);
    assert_eq!(grid.world_position(CellPos::new(7, 4)), Vec2::new(6.0, -10.5));
}

#[test]
fn test_clear_resets_cells() {
    let mut grid = Grid::new(2, 2, 1.0);
    grid.place(0, TileId(1));
    grid.place(1, TileId(2));
    grid.clear();
    assert_eq!(grid.occupied_count(), 0);
    assert_eq!(grid.landing_row(0), Some(1));
}
