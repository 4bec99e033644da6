//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (simulation core, placement engine, JSON adapter).
//!
//! # Grid Coordinates
//!
//! - **Row 0** is the top row, row `rows - 1` is the bottom row
//! - A cell's world-space centre is `(col * cell_size, -row * cell_size)`
//! - "Below" a cell means `row + 1`; gravity moves tiles towards larger rows
//!
//! # Part Geometry
//!
//! Parts live in the tile's local space where the unit cell spans `[-0.5, 0.5]`
//! on both axes. A part's local offset is always kept inside
//! `[-PART_OFFSET_LIMIT, PART_OFFSET_LIMIT]`.
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds and only pace the cascade; the model itself
//! never depends on them for correctness:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep used by drivers (~60 FPS) |
//! | `PLACE_MOVE_MS` | 500 | Placement transition |
//! | `MATCH_CHECK_DELAY_MS` | 100 | Delay before a scan |
//! | `MATCH_SETTLE_DELAY_MS` | 200 | Delay before matched parts are removed |
//! | `PART_SHRINK_MS` | 300 | Matched part shrink transition |
//! | `REARRANGE_MS` | 300 | Survivor re-layout transition |
//! | `FINAL_SNAP_DELAY_MS` | 350 | Delay before the corrective snap |
//! | `GRAVITY_MOVE_MS` | 300 | One-cell fall |
//! | `GRAVITY_PASS_DELAY_MS` | 350 | Pause after a productive gravity pass |
//!
//! # Examples
//!
//! ```
//! use drop_jelly_types::{Color, Direction, Footprint, TileKind, Vec2};
//!
//! assert_eq!(Color::from_str("Blue"), Some(Color::Blue));
//! assert_eq!(Direction::from_offset(1.0, 0.0), Some(Direction::Right));
//! assert_eq!(Direction::Top.opposite(), Direction::Bottom);
//! assert_eq!(Footprint::classify(Vec2::new(0.5, 1.0)), Footprint::Half);
//! assert_eq!(TileKind::from_part_count(3), Some(TileKind::Split3));
//! ```

/// Default number of grid rows
pub const DEFAULT_ROWS: u8 = 8;

/// Default number of grid columns
pub const DEFAULT_COLUMNS: u8 = 5;

/// Maximum number of parts a tile can hold
pub const MAX_PARTS: usize = 4;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Placement transition duration
pub const PLACE_MOVE_MS: u32 = 500;

/// Delay between a tile landing (or the grid settling) and the next scan
pub const MATCH_CHECK_DELAY_MS: u32 = 100;

/// Delay between finding matches and starting their removal
pub const MATCH_SETTLE_DELAY_MS: u32 = 200;

/// Shrink-to-zero transition of a matched part; parts are destroyed after it
pub const PART_SHRINK_MS: u32 = 300;

/// Transition duration of survivor re-layout
pub const REARRANGE_MS: u32 = 300;

/// Delay between starting a re-layout and the corrective snap
pub const FINAL_SNAP_DELAY_MS: u32 = 350;

/// Duration of a single one-cell fall
pub const GRAVITY_MOVE_MS: u32 = 300;

/// Pause after a productive gravity pass before the next pass
pub const GRAVITY_PASS_DELAY_MS: u32 = 350;

/// Tolerance for layout comparisons (quadrant lookup, same-column test, footprint scale)
pub const LAYOUT_TOLERANCE: f32 = 0.01;

/// Tolerance for "centred on the perpendicular axis" in 4-part candidate selection
pub const EDGE_CENTER_TOLERANCE: f32 = 0.1;

/// Local offsets are clamped to `[-PART_OFFSET_LIMIT, PART_OFFSET_LIMIT]`
pub const PART_OFFSET_LIMIT: f32 = 0.25;

/// Distance a part slides when it grows into a neighbouring quadrant
pub const QUADRANT_STEP: f32 = 0.25;

/// The four canonical quadrant centres, in lookup order
pub const CANONICAL_QUADRANTS: [Vec2; 4] = [
    Vec2::new(-0.25, 0.25),
    Vec2::new(0.25, 0.25),
    Vec2::new(-0.25, -0.25),
    Vec2::new(0.25, -0.25),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacing_defaults() {
        assert_eq!(TICK_MS, 16);
        assert_eq!(PLACE_MOVE_MS, 500);
        assert_eq!(MATCH_CHECK_DELAY_MS, 100);
        assert_eq!(MATCH_SETTLE_DELAY_MS, 200);
        assert_eq!(PART_SHRINK_MS, 300);
        assert_eq!(REARRANGE_MS, 300);
        assert_eq!(FINAL_SNAP_DELAY_MS, 350);
        assert!(GRAVITY_PASS_DELAY_MS >= GRAVITY_MOVE_MS);
        assert!(FINAL_SNAP_DELAY_MS >= REARRANGE_MS);
    }

    #[test]
    fn direction_from_offset_prefers_horizontal_on_ties() {
        assert_eq!(Direction::from_offset(1.0, 1.0), Some(Direction::Right));
        assert_eq!(Direction::from_offset(-1.0, 1.0), Some(Direction::Left));
        assert_eq!(Direction::from_offset(0.2, 1.0), Some(Direction::Top));
        assert_eq!(Direction::from_offset(0.0, -1.0), Some(Direction::Bottom));
        assert_eq!(Direction::from_offset(0.0, 0.0), None);
    }

    #[test]
    fn footprint_classification_respects_tolerance() {
        assert_eq!(Footprint::classify(Vec2::new(0.5, 0.5)), Footprint::Quarter);
        assert_eq!(Footprint::classify(Vec2::new(0.509, 0.5)), Footprint::Quarter);
        assert_eq!(Footprint::classify(Vec2::new(0.52, 0.5)), Footprint::Irregular);
        assert_eq!(Footprint::classify(Vec2::new(0.5, 1.0)), Footprint::Half);
        assert_eq!(Footprint::classify(Vec2::new(1.0, 0.5)), Footprint::Half);
        assert_eq!(Footprint::classify(Vec2::ONE), Footprint::Full);
        assert_eq!(Footprint::classify(Vec2::ZERO), Footprint::Irregular);
    }

    #[test]
    fn vec2_clamp_offset() {
        let v = Vec2::new(0.4, -0.3).clamp_offset();
        assert_eq!(v, Vec2::new(0.25, -0.25));
        assert_eq!(Vec2::new(0.1, 0.2).clamp_offset(), Vec2::new(0.1, 0.2));
    }
}

/// A two-component vector used for local part offsets, local scales and world positions
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);
    pub const ONE: Vec2 = Vec2::new(1.0, 1.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`
    pub fn distance(self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Unclamped linear interpolation (`t` may leave `[0, 1]` for overshooting easings)
    pub fn lerp(self, to: Vec2, t: f32) -> Vec2 {
        Vec2::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }

    /// Clamp both axes to the legal local offset range of a part
    pub fn clamp_offset(self) -> Vec2 {
        Vec2::new(
            self.x.clamp(-PART_OFFSET_LIMIT, PART_OFFSET_LIMIT),
            self.y.clamp(-PART_OFFSET_LIMIT, PART_OFFSET_LIMIT),
        )
    }

    /// Component-wise comparison within `tolerance`
    pub fn approx_eq(self, other: Vec2, tolerance: f32) -> bool {
        (self.x - other.x).abs() < tolerance && (self.y - other.y).abs() < tolerance
    }
}

/// Part colours (the reference palette has three)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Blue,
    Yellow,
}

impl Color {
    /// The full palette, in a stable order
    pub const ALL: [Color; 3] = [Color::Red, Color::Blue, Color::Yellow];

    /// Parse colour from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use drop_jelly_types::Color;
    ///
    /// assert_eq!(Color::from_str("red"), Some(Color::Red));
    /// assert_eq!(Color::from_str("YELLOW"), Some(Color::Yellow));
    /// assert_eq!(Color::from_str("green"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(Color::Red),
            "blue" => Some(Color::Blue),
            "yellow" => Some(Color::Yellow),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
        }
    }
}

/// Position of a neighbouring tile relative to the tile being tested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Left,
    Top,
    Bottom,
}

impl Direction {
    /// All four directions in scan order
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Top,
        Direction::Bottom,
    ];

    /// Classify a world-space centre offset (`other - this`, y pointing up).
    ///
    /// The axis with the larger magnitude wins; ties go to the horizontal axis.
    /// A zero offset has no direction.
    pub fn from_offset(dx: f32, dy: f32) -> Option<Self> {
        if dx.abs() >= dy.abs() {
            if dx > 0.0 {
                Some(Direction::Right)
            } else if dx < 0.0 {
                Some(Direction::Left)
            } else {
                None
            }
        } else if dy > 0.0 {
            Some(Direction::Top)
        } else {
            Some(Direction::Bottom)
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Right | Direction::Left)
    }

    /// Grid step `(d_row, d_col)` towards the neighbour in this direction
    pub fn grid_delta(&self) -> (i32, i32) {
        match self {
            Direction::Right => (0, 1),
            Direction::Left => (0, -1),
            Direction::Top => (-1, 0),
            Direction::Bottom => (1, 0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Right => "right",
            Direction::Left => "left",
            Direction::Top => "top",
            Direction::Bottom => "bottom",
        }
    }
}

/// Shape class of a part, derived from its local scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Footprint {
    /// Half width, half height
    Quarter,
    /// Half width and full height, or the symmetric full width and half height
    Half,
    /// The whole cell
    Full,
    /// Any other scale, typically mid-transition
    Irregular,
}

impl Footprint {
    /// Classify a local scale within `LAYOUT_TOLERANCE`
    pub fn classify(scale: Vec2) -> Self {
        let near = |v: f32, target: f32| (v - target).abs() < LAYOUT_TOLERANCE;
        match (near(scale.x, 0.5), near(scale.y, 0.5), near(scale.x, 1.0), near(scale.y, 1.0)) {
            (true, true, _, _) => Footprint::Quarter,
            (true, _, _, true) | (_, true, true, _) => Footprint::Half,
            (_, _, true, true) => Footprint::Full,
            _ => Footprint::Irregular,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Footprint::Quarter => "quarter",
            Footprint::Half => "half",
            Footprint::Full => "full",
            Footprint::Irregular => "irregular",
        }
    }
}

/// The four tile shapes, keyed by their initial part count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Single,
    Split2,
    Split3,
    Split4,
}

impl TileKind {
    pub const ALL: [TileKind; 4] = [
        TileKind::Single,
        TileKind::Split2,
        TileKind::Split3,
        TileKind::Split4,
    ];

    pub fn part_count(&self) -> usize {
        match self {
            TileKind::Single => 1,
            TileKind::Split2 => 2,
            TileKind::Split3 => 3,
            TileKind::Split4 => 4,
        }
    }

    pub fn from_part_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(TileKind::Single),
            2 => Some(TileKind::Split2),
            3 => Some(TileKind::Split3),
            4 => Some(TileKind::Split4),
            _ => None,
        }
    }
}

/// Identity of a tile; never reused within a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

/// Identity of a part; never reused within a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(pub u32);

/// A grid cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Easing curves understood by the transition system and external renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ease {
    Linear,
    OutQuad,
    InBack,
    OutBounce,
}

impl Ease {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ease::Linear => "linear",
            Ease::OutQuad => "outQuad",
            Ease::InBack => "inBack",
            Ease::OutBounce => "outBounce",
        }
    }
}

/// What a transition animates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionTarget {
    /// A part's local offset
    PartPosition { tile: TileId, part: PartId },
    /// A part's local scale
    PartScale { tile: TileId, part: PartId },
    /// A tile's world position
    TilePosition { tile: TileId },
}

impl TransitionTarget {
    /// The tile being animated
    pub fn tile(&self) -> TileId {
        match *self {
            TransitionTarget::PartPosition { tile, .. }
            | TransitionTarget::PartScale { tile, .. }
            | TransitionTarget::TilePosition { tile } => tile,
        }
    }
}

/// Outbound request for a visual transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionRequest {
    pub target: TransitionTarget,
    pub to: Vec2,
    pub duration_ms: u32,
    pub ease: Ease,
}

/// Core-side events, drained by the driver and forwarded to render/spawn collaborators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoreEvent {
    /// A tile was accepted into a cell
    TilePlaced { tile: TileId, cell: CellPos },
    /// A placement succeeded; the spawner should produce the next tile
    SpawnRequested,
    /// A visual transition started
    Transition(TransitionRequest),
    /// A scan found matches (number of distinct parts)
    MatchesFound { parts: u32 },
    /// A part's visual should be disposed
    PartDestroyed { tile: TileId, part: PartId },
    /// A tile's visual should be disposed; its cell is free
    TileDestroyed { tile: TileId, cell: Option<CellPos> },
    /// A tile completed a one-cell fall
    TileFell { tile: TileId, from: CellPos, to: CellPos },
    /// The cascade returned to idle after `rounds` resolution rounds
    CascadeFinished { rounds: u32 },
}
