//! Matching module - adjacency matching between neighbouring tiles
//!
//! Two neighbouring tiles match when a part of one that faces the other has the
//! same colour as a part of the other facing back. Candidate parts are those whose
//! footprint crosses the tile centre line on the facing side. When the tile that
//! starts the check has 4 parts, candidates on both sides must also be centred on
//! the perpendicular axis (within `EDGE_CENTER_TOLERANCE`). The filter depends on
//! who asks: a corner quadrant cannot match while its own tile drives the check,
//! but can be matched by a smaller neighbour driving it.
//!
//! Pairing is first-found: candidates of the first tile are the outer loop, the
//! other tile's candidates the inner loop, both in part storage order.

use std::collections::HashSet;

use arrayvec::ArrayVec;
use tracing::trace;

use crate::grid::Grid;
use crate::tile::{Part, Tile, TileStore};
use crate::types::{CellPos, Direction, PartId, TileId, EDGE_CENTER_TOLERANCE, MAX_PARTS};

/// A part together with its owning tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartRef {
    pub tile: TileId,
    pub part: PartId,
}

/// Whether `part` reaches past the centre line towards `facing`
fn faces(part: &Part, facing: Direction) -> bool {
    match facing {
        Direction::Right => part.max_x() > 0.0,
        Direction::Left => part.min_x() < 0.0,
        Direction::Top => part.max_y() > 0.0,
        Direction::Bottom => part.min_y() < 0.0,
    }
}

fn centred_across(part: &Part, facing: Direction) -> bool {
    if facing.is_horizontal() {
        part.position.y.abs() < EDGE_CENTER_TOLERANCE
    } else {
        part.position.x.abs() < EDGE_CENTER_TOLERANCE
    }
}

/// Parts of `tile` that face outward towards `facing`, in storage order.
///
/// With `edge_only` set, parts off the perpendicular centre line are skipped.
pub fn candidates(
    tile: &Tile,
    facing: Direction,
    edge_only: bool,
) -> ArrayVec<&Part, MAX_PARTS> {
    tile.parts()
        .iter()
        .filter(|p| faces(p, facing) && (!edge_only || centred_across(p, facing)))
        .collect()
}

/// Find the first matching pair between `a` and `b`, where `direction` is the
/// position of `b` relative to `a`.
///
/// Returns `(part of a, part of b)`. The edge filter follows `a` only.
pub fn find_match(a: &Tile, b: &Tile, direction: Direction) -> Option<(PartId, PartId)> {
    let edge_only = a.part_count() == MAX_PARTS;
    let ours = candidates(a, direction, edge_only);
    let theirs = candidates(b, direction.opposite(), edge_only);

    ours.iter().find_map(|mine| {
        theirs
            .iter()
            .find(|other| other.color == mine.color)
            .map(|other| (mine.id, other.id))
    })
}

/// Like [`find_match`], deriving the direction from the two tiles' cells.
///
/// Returns `None` when both cells are the same.
pub fn find_match_between(
    grid: &Grid,
    a: &Tile,
    a_pos: CellPos,
    b: &Tile,
    b_pos: CellPos,
) -> Option<(PartId, PartId)> {
    let from = grid.world_position(a_pos);
    let to = grid.world_position(b_pos);
    let direction = Direction::from_offset(to.x - from.x, to.y - from.y)?;
    find_match(a, b, direction)
}

/// De-duplicated set of matched parts in discovery order
#[derive(Debug, Clone, Default)]
pub struct MatchSet {
    parts: Vec<PartRef>,
    seen: HashSet<PartId>,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a part; returns false if it was already present
    pub fn insert(&mut self, part: PartRef) -> bool {
        if !self.seen.insert(part.part) {
            return false;
        }
        self.parts.push(part);
        true
    }

    pub fn contains(&self, part: PartId) -> bool {
        self.seen.contains(&part)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PartRef> {
        self.parts.iter()
    }

    /// Group matched parts by tile, tiles in first-seen order
    pub fn by_tile(&self) -> Vec<(TileId, ArrayVec<PartId, MAX_PARTS>)> {
        let mut groups: Vec<(TileId, ArrayVec<PartId, MAX_PARTS>)> = Vec::new();
        for r in &self.parts {
            match groups.iter_mut().find(|(t, _)| *t == r.tile) {
                Some((_, parts)) => {
                    let pushed = parts.try_push(r.part);
                    debug_assert!(pushed.is_ok(), "tile {:?} has too many matched parts", r.tile);
                }
                None => {
                    let mut parts = ArrayVec::new();
                    parts.push(r.part);
                    groups.push((r.tile, parts));
                }
            }
        }
        groups
    }
}

fn neighbour(grid: &Grid, pos: CellPos, direction: Direction) -> Option<(CellPos, TileId)> {
    let (dr, dc) = direction.grid_delta();
    let row = pos.row as i32 + dr;
    let col = pos.col as i32 + dc;
    let tile = grid.tile_at(row, col)?;
    Some((CellPos::new(row as usize, col as usize), tile))
}

fn match_with(
    grid: &Grid,
    store: &TileStore,
    pos: CellPos,
    tile: &Tile,
    direction: Direction,
) -> Option<(PartRef, PartRef)> {
    let (other_pos, other_id) = neighbour(grid, pos, direction)?;
    let other = store.get(other_id)?;
    let (mine, theirs) = find_match_between(grid, tile, pos, other, other_pos)?;
    Some((
        PartRef {
            tile: tile.id,
            part: mine,
        },
        PartRef {
            tile: other_id,
            part: theirs,
        },
    ))
}

/// Full removal scan: every occupied cell against all four neighbours
pub fn scan_grid(grid: &Grid, store: &TileStore) -> MatchSet {
    let mut set = MatchSet::new();
    for (pos, id) in grid.occupied() {
        let Some(tile) = store.get(id) else {
            continue;
        };
        for direction in Direction::ALL {
            if let Some((mine, theirs)) = match_with(grid, store, pos, tile, direction) {
                trace!(
                    row = pos.row,
                    col = pos.col,
                    direction = direction.as_str(),
                    "parts matched"
                );
                set.insert(mine);
                set.insert(theirs);
            }
        }
    }
    set
}

/// Continuation check: does any adjacent pair match?
///
/// Each right and bottom adjacency is tested from both sides, so this agrees
/// with [`scan_grid`] even when only one tile of the pair can start a match.
pub fn has_any_match(grid: &Grid, store: &TileStore) -> bool {
    grid.occupied().any(|(pos, id)| {
        store.get(id).is_some_and(|tile| {
            [Direction::Right, Direction::Bottom].into_iter().any(|d| {
                match_with(grid, store, pos, tile, d).is_some()
                    || neighbour(grid, pos, d).is_some_and(|(other_pos, other_id)| {
                        store.get(other_id).is_some_and(|other| {
                            match_with(grid, store, other_pos, other, d.opposite()).is_some()
                        })
                    })
            })
        })
    })
}
