//! Core simulation module - pure, deterministic, and testable
//!
//! This crate contains the rules of the falling-block match game: grid occupancy,
//! part layout, adjacency matching, gravity and the cascade that ties them together.
//! It has **no dependencies** on rendering, input or I/O:
//!
//! - **Deterministic**: same placements and tick sizes produce the same cascade
//! - **Headless**: visual transitions are interpolated here and reported as events
//! - **Single-threaded**: every phase is a countdown advanced by [`Simulation::tick`]
//!
//! # Module Structure
//!
//! - [`grid`]: `rows x columns` cells with occupancy and gravity locks
//! - [`tile`]: tiles, their 1-4 coloured parts, and the id-keyed store
//! - [`shape`]: canonical layouts, re-layout after removal, the corrective snap
//! - [`matching`]: facing-part matching between neighbouring tiles and grid scans
//! - [`gravity`]: one-cell-per-pass falling with destination locks
//! - [`cascade`]: the scan / resolve / rearrange / settle state machine
//! - [`transition`]: eased interpolation standing in for the animation layer
//! - [`rng`]: tile kind and colour generation
//! - [`simulation`]: the context owning all of the above
//!
//! # Example
//!
//! ```
//! use drop_jelly_core::{SimConfig, Simulation, TileDescriptor, Timings};
//! use drop_jelly_types::Color;
//!
//! let mut config = SimConfig::with_size(3, 3);
//! config.timings = Timings::instant();
//! let mut sim = Simulation::new(config);
//!
//! let tile = TileDescriptor::new(&[Color::Red, Color::Blue]).unwrap();
//! let placed = sim.place(0, &tile).unwrap();
//! assert_eq!(placed.cell.row, 2);
//!
//! sim.run_until_idle(100).unwrap();
//! assert!(sim.is_idle());
//! ```
//!
//! # Timing
//!
//! Delays only pace the cascade so a renderer can show each step; the model never
//! depends on them for correctness. Call [`Simulation::tick`] every frame with the
//! elapsed time, or use [`Timings::instant`] to run cascades as fast as ticks arrive.

pub mod cascade;
pub mod config;
pub mod error;
pub mod gravity;
pub mod grid;
pub mod matching;
pub mod rng;
pub mod shape;
pub mod simulation;
pub mod snapshot;
pub mod tile;
pub mod transition;

pub use drop_jelly_types as types;

// Re-export commonly used types for convenience
pub use cascade::{CascadeController, Phase, ResolveStep};
pub use config::{SimConfig, Timings};
pub use error::{ConfigError, PlaceError};
pub use gravity::{FallingTile, GravityEngine, Landing};
pub use grid::{Cell, Grid};
pub use matching::{find_match, has_any_match, scan_grid, MatchSet, PartRef};
pub use rng::{ColoringPolicy, RandomColoring, SimpleRng, TileSpawner};
pub use simulation::{PlacementOutcome, Simulation};
pub use snapshot::{GridSnapshot, PartSnapshot, TileSnapshot};
pub use tile::{Part, PartSpec, Tile, TileDescriptor, TileStore};
pub use transition::Transitions;
