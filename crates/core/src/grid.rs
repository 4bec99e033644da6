//! Grid module - cells and their occupancy
//!
//! The grid is a `rows x columns` array of cells, allocated once per level.
//! Each cell holds at most one tile id and a transient lock used by gravity.
//! Uses a flat array (row-major) for cache locality.
//! Coordinates: (row, col) where row 0 is the top row and col 0 the leftmost column.

use crate::types::{CellPos, TileId, Vec2};

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub occupant: Option<TileId>,
    /// Reserved as the destination of an in-flight gravity move
    pub locked: bool,
}

/// The game grid using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: u8,
    columns: u8,
    cell_size: f32,
    /// Flat array of cells, row-major order (row * columns + col)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new empty grid
    pub fn new(rows: u8, columns: u8, cell_size: f32) -> Self {
        Self {
            rows,
            columns,
            cell_size,
            cells: vec![Cell::default(); rows as usize * columns as usize],
        }
    }

    /// Calculate flat index from (row, col), `None` when out of bounds
    #[inline(always)]
    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || row >= self.rows as i32 || col < 0 || col >= self.columns as i32 {
            return None;
        }
        Some(row as usize * self.columns as usize + col as usize)
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn cell(&self, row: i32, col: i32) -> Option<&Cell> {
        self.index(row, col).map(|idx| &self.cells[idx])
    }

    /// Occupant of a cell. Empty and out-of-bounds cells both yield `None`.
    pub fn tile_at(&self, row: i32, col: i32) -> Option<TileId> {
        self.cell(row, col).and_then(|c| c.occupant)
    }

    /// World-space centre of a cell (y grows upwards, so rows go negative)
    pub fn world_position(&self, pos: CellPos) -> Vec2 {
        Vec2::new(
            pos.col as f32 * self.cell_size,
            -(pos.row as f32) * self.cell_size,
        )
    }

    /// Row a tile dropped into `column` would land in: the first empty cell from the bottom
    pub fn landing_row(&self, column: usize) -> Option<usize> {
        if column >= self.columns as usize {
            return None;
        }
        (0..self.rows as usize)
            .rev()
            .find(|&row| self.tile_at(row as i32, column as i32).is_none())
    }

    pub fn is_column_full(&self, column: usize) -> bool {
        self.landing_row(column).is_none()
    }

    /// Put `tile` in the first empty cell of `column`, scanning bottom-up.
    ///
    /// Returns false (and leaves the grid untouched) if the column is full or out of bounds.
    pub fn place(&mut self, column: usize, tile: TileId) -> bool {
        match self.landing_row(column) {
            Some(row) => self.occupy(row, column, tile),
            None => false,
        }
    }

    /// Clear a cell's occupant; no-op on empty or out-of-bounds cells.
    /// Returns the tile that was removed.
    pub fn remove_tile(&mut self, row: usize, col: usize) -> Option<TileId> {
        self.vacate(row, col)
    }

    pub(crate) fn vacate(&mut self, row: usize, col: usize) -> Option<TileId> {
        let idx = self.index(row as i32, col as i32)?;
        self.cells[idx].occupant.take()
    }

    /// Assign a tile to an empty, unlocked cell.
    ///
    /// Returns false if the cell is occupied, reserved by a fall, or out of bounds.
    pub fn occupy(&mut self, row: usize, col: usize, tile: TileId) -> bool {
        match self.index(row as i32, col as i32) {
            Some(idx) if self.cells[idx].occupant.is_none() && !self.cells[idx].locked => {
                self.cells[idx].occupant = Some(tile);
                true
            }
            _ => false,
        }
    }

    pub fn is_locked(&self, row: usize, col: usize) -> bool {
        self.cell(row as i32, col as i32).is_some_and(|c| c.locked)
    }

    pub(crate) fn set_locked(&mut self, row: usize, col: usize, locked: bool) {
        if let Some(idx) = self.index(row as i32, col as i32) {
            self.cells[idx].locked = locked;
        }
    }

    /// Find the cell currently holding `tile`
    pub fn position_of(&self, tile: TileId) -> Option<CellPos> {
        let cols = self.columns as usize;
        self.cells
            .iter()
            .position(|c| c.occupant == Some(tile))
            .map(|idx| CellPos::new(idx / cols, idx % cols))
    }

    /// Iterate occupied cells in row-major order (top row first)
    pub fn occupied(&self) -> impl Iterator<Item = (CellPos, TileId)> + '_ {
        let cols = self.columns as usize;
        self.cells.iter().enumerate().filter_map(move |(idx, c)| {
            c.occupant
                .map(|tile| (CellPos::new(idx / cols, idx % cols), tile))
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.occupant.is_some()).count()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear every cell (level reset)
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::default();
        }
    }
}
