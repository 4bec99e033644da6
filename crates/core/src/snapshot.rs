use crate::grid::Grid;
use crate::tile::{Part, Tile, TileStore};
use crate::types::{Color, Footprint, PartId, TileId, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartSnapshot {
    pub id: PartId,
    pub color: Color,
    pub position: Vec2,
    pub scale: Vec2,
    pub footprint: Footprint,
}

impl From<&Part> for PartSnapshot {
    fn from(value: &Part) -> Self {
        Self {
            id: value.id,
            color: value.color,
            position: value.position,
            scale: value.scale,
            footprint: value.footprint(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileSnapshot {
    pub id: TileId,
    pub parts: Vec<PartSnapshot>,
}

impl From<&Tile> for TileSnapshot {
    fn from(value: &Tile) -> Self {
        Self {
            id: value.id,
            parts: value.parts().iter().map(PartSnapshot::from).collect(),
        }
    }
}

/// Row-major copy of the grid and the tiles in it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridSnapshot {
    pub rows: u8,
    pub columns: u8,
    pub cells: Vec<Option<TileSnapshot>>,
    pub cascade_idle: bool,
}

impl GridSnapshot {
    pub fn capture(grid: &Grid, store: &TileStore, cascade_idle: bool) -> Self {
        let cells = grid
            .cells()
            .iter()
            .map(|c| c.occupant.and_then(|id| store.get(id)).map(TileSnapshot::from))
            .collect();
        Self {
            rows: grid.rows(),
            columns: grid.columns(),
            cells,
            cascade_idle,
        }
    }

    pub fn tile(&self, row: usize, col: usize) -> Option<&TileSnapshot> {
        if row >= self.rows as usize || col >= self.columns as usize {
            return None;
        }
        self.cells
            .get(row * self.columns as usize + col)
            .and_then(|c| c.as_ref())
    }

    /// Part colours of the tile at `(row, col)`, in slot order
    pub fn colors(&self, row: usize, col: usize) -> Vec<Color> {
        self.tile(row, col)
            .map(|t| t.parts.iter().map(|p| p.color).collect())
            .unwrap_or_default()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}
