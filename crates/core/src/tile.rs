//! Tile module - tiles, their parts, and the store that owns them
//!
//! A tile owns an ordered list of 1-4 parts (storage order = visual slot order).
//! Each part keeps a non-owning back-reference to its tile so matched parts can be
//! grouped per tile during a cascade. Tiles live in a [`TileStore`] keyed by
//! monotonic ids; ids are never reused, so a stale id simply stops resolving.

use std::collections::HashMap;

use arrayvec::ArrayVec;

use crate::shape;
use crate::types::{Color, Footprint, PartId, TileId, TileKind, Vec2, MAX_PARTS};

/// A coloured sub-rectangle of a tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Part {
    pub id: PartId,
    /// Owning tile
    pub tile: TileId,
    pub color: Color,
    /// Local offset inside the unit cell
    pub position: Vec2,
    /// Local scale (1.0 = whole cell on that axis)
    pub scale: Vec2,
}

impl Part {
    pub fn min_x(&self) -> f32 {
        self.position.x - self.scale.x * 0.5
    }

    pub fn max_x(&self) -> f32 {
        self.position.x + self.scale.x * 0.5
    }

    pub fn min_y(&self) -> f32 {
        self.position.y - self.scale.y * 0.5
    }

    pub fn max_y(&self) -> f32 {
        self.position.y + self.scale.y * 0.5
    }

    pub fn footprint(&self) -> Footprint {
        Footprint::classify(self.scale)
    }
}

/// A grid-occupying entity made of 1-4 parts
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub id: TileId,
    parts: ArrayVec<Part, MAX_PARTS>,
    /// World position used by renderers; the grid cell is the model truth
    pub world_position: Vec2,
}

impl Tile {
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn parts_mut(&mut self) -> &mut [Part] {
        &mut self.parts
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn part(&self, id: PartId) -> Option<&Part> {
        self.parts.iter().find(|p| p.id == id)
    }

    pub fn part_mut(&mut self, id: PartId) -> Option<&mut Part> {
        self.parts.iter_mut().find(|p| p.id == id)
    }

    /// Remove a part, preserving the order of the others.
    ///
    /// Returns `None` if the part was already gone.
    pub fn remove_part(&mut self, id: PartId) -> Option<Part> {
        let idx = self.parts.iter().position(|p| p.id == id)?;
        Some(self.parts.remove(idx))
    }
}

/// Layout of a single part in a descriptor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartSpec {
    pub color: Color,
    pub position: Vec2,
    pub scale: Vec2,
}

/// A pre-coloured tile waiting to be placed
#[derive(Debug, Clone, PartialEq)]
pub struct TileDescriptor {
    parts: ArrayVec<PartSpec, MAX_PARTS>,
}

impl TileDescriptor {
    /// Build a descriptor with the canonical layout for `colors.len()` parts.
    ///
    /// Returns `None` for zero or more than four colours.
    pub fn new(colors: &[Color]) -> Option<Self> {
        let kind = TileKind::from_part_count(colors.len())?;
        let parts = shape::canonical_layout(kind)
            .iter()
            .zip(colors)
            .map(|(&(position, scale), &color)| PartSpec {
                color,
                position,
                scale,
            })
            .collect();
        Some(Self { parts })
    }

    /// A one-part tile covering the whole cell
    pub fn single(color: Color) -> Self {
        let mut parts = ArrayVec::new();
        parts.push(PartSpec {
            color,
            position: Vec2::ZERO,
            scale: Vec2::ONE,
        });
        Self { parts }
    }

    /// Build a descriptor with an explicit part layout.
    ///
    /// Offsets are clamped to the legal range. Returns `None` for zero or more than four parts.
    pub fn with_layout(specs: &[PartSpec]) -> Option<Self> {
        if specs.is_empty() || specs.len() > MAX_PARTS {
            return None;
        }
        let parts = specs
            .iter()
            .map(|s| PartSpec {
                position: s.position.clamp_offset(),
                ..*s
            })
            .collect();
        Some(Self { parts })
    }

    pub fn parts(&self) -> &[PartSpec] {
        &self.parts
    }

    pub fn kind(&self) -> TileKind {
        // Constructors guarantee 1..=4 parts.
        TileKind::from_part_count(self.parts.len()).unwrap_or(TileKind::Single)
    }

    pub fn colors(&self) -> ArrayVec<Color, MAX_PARTS> {
        self.parts.iter().map(|p| p.color).collect()
    }
}

/// Owner of every live tile
#[derive(Debug, Clone, Default)]
pub struct TileStore {
    tiles: HashMap<TileId, Tile>,
    next_tile: u32,
    next_part: u32,
}

impl TileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate a tile from a descriptor and return its id
    pub fn spawn(&mut self, descriptor: &TileDescriptor, world_position: Vec2) -> TileId {
        self.next_tile = self.next_tile.wrapping_add(1);
        let id = TileId(self.next_tile);

        let mut parts = ArrayVec::new();
        for spec in descriptor.parts() {
            self.next_part = self.next_part.wrapping_add(1);
            parts.push(Part {
                id: PartId(self.next_part),
                tile: id,
                color: spec.color,
                position: spec.position,
                scale: spec.scale,
            });
        }

        self.tiles.insert(
            id,
            Tile {
                id,
                parts,
                world_position,
            },
        );
        id
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    pub fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(&id)
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.contains_key(&id)
    }

    /// Destroy a tile. Destroying an already destroyed tile is a no-op returning `None`.
    pub fn destroy(&mut self, id: TileId) -> Option<Tile> {
        self.tiles.remove(&id)
    }

    /// Detach a part from its tile without destroying the tile.
    ///
    /// The caller is responsible for destroying the tile if it became empty.
    pub fn detach_part(&mut self, tile: TileId, part: PartId) -> Option<Part> {
        self.tiles.get_mut(&tile)?.remove_part(part)
    }

    pub fn part(&self, tile: TileId, part: PartId) -> Option<&Part> {
        self.tiles.get(&tile)?.part(part)
    }

    pub fn part_mut(&mut self, tile: TileId, part: PartId) -> Option<&mut Part> {
        self.tiles.get_mut(&tile)?.part_mut(part)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Destroy every tile. Ids keep counting so old ids stay stale.
    pub fn clear(&mut self) {
        self.tiles.clear();
    }
}
