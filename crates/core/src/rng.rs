//! RNG module - tile generation
//!
//! Tile shape and colours are chosen outside the cascade: a [`TileSpawner`] picks one of
//! the four tile kinds uniformly and asks a [`ColoringPolicy`] to colour its parts.
//! The reference policy keeps neighbouring slots of a tile from sharing a colour.
//!
//! Also provides a simple LCG for deterministic testing.

use arrayvec::ArrayVec;
use tracing::warn;

use crate::tile::TileDescriptor;
use crate::types::{Color, TileKind, MAX_PARTS};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits; the low bits of a power-of-two LCG cycle quickly.
        (self.next_u32() >> 16) % max.max(1)
    }

    /// Pick one element of a non-empty slice
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        let i = self.next_range(items.len() as u32) as usize;
        items.get(i).copied()
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

pub type Colors = ArrayVec<Color, MAX_PARTS>;

/// Chooses part colours for a new tile
pub trait ColoringPolicy {
    fn assign(&mut self, kind: TileKind) -> Colors;
}

/// Random colours over the full palette with per-kind neighbour rules:
///
/// - 2 parts: no two consecutive slots share a colour
/// - 3 parts: as above, and every chosen colour leaves the pool while it still holds all
///   three colours (so the three parts always differ)
/// - 4 parts: a slot differs from both of the two slots before it
#[derive(Debug, Clone)]
pub struct RandomColoring {
    rng: SimpleRng,
}

impl RandomColoring {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    pub fn from_rng(rng: SimpleRng) -> Self {
        Self { rng }
    }
}

impl ColoringPolicy for RandomColoring {
    fn assign(&mut self, kind: TileKind) -> Colors {
        let count = kind.part_count();
        let mut pool: ArrayVec<Color, 3> = Color::ALL.into_iter().collect();
        let mut colors = Colors::new();

        for i in 0..count {
            let prev = i.checked_sub(1).map(|j| colors[j]);
            let prev2 = i.checked_sub(2).map(|j| colors[j]);
            let allowed: ArrayVec<Color, 3> = pool
                .iter()
                .copied()
                .filter(|c| match kind {
                    TileKind::Single => true,
                    TileKind::Split2 | TileKind::Split3 => prev != Some(*c),
                    TileKind::Split4 => prev != Some(*c) && prev2 != Some(*c),
                })
                .collect();

            // The palette always leaves at least one legal colour.
            let Some(chosen) = self.rng.pick(&allowed) else {
                break;
            };
            if kind == TileKind::Split3 && pool.len() >= 3 {
                pool.retain(|c| *c != chosen);
            }
            colors.push(chosen);
        }
        colors
    }
}

/// Produces the next tile to place
#[derive(Debug, Clone)]
pub struct TileSpawner<P: ColoringPolicy = RandomColoring> {
    rng: SimpleRng,
    coloring: P,
}

impl TileSpawner<RandomColoring> {
    /// Spawner with random colouring, both streams derived from `seed`
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let coloring = RandomColoring::new(rng.next_u32());
        Self { rng, coloring }
    }
}

impl<P: ColoringPolicy> TileSpawner<P> {
    pub fn with_policy(seed: u32, coloring: P) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            coloring,
        }
    }

    pub fn next_kind(&mut self) -> TileKind {
        self.rng.pick(&TileKind::ALL).unwrap_or(TileKind::Single)
    }

    /// Draw a tile: uniform kind, colours from the policy, canonical layout
    pub fn spawn(&mut self) -> TileDescriptor {
        let kind = self.next_kind();
        self.spawn_kind(kind)
    }

    /// Draw a tile of `kind`.
    ///
    /// A policy returning the wrong number of colours is logged and corrected:
    /// extra colours are dropped and missing ones filled with red.
    pub fn spawn_kind(&mut self, kind: TileKind) -> TileDescriptor {
        let mut colors = self.coloring.assign(kind);
        if colors.len() != kind.part_count() {
            warn!(
                ?kind,
                got = colors.len(),
                want = kind.part_count(),
                "colouring policy returned wrong colour count"
            );
        }
        colors.truncate(kind.part_count());
        while colors.len() < kind.part_count() {
            colors.push(Color::Red);
        }
        TileDescriptor::new(&colors).unwrap_or_else(|| {
            warn!(?kind, ?colors, "no valid layout for colours, spawning a red single");
            TileDescriptor::single(Color::Red)
        })
    }
}
