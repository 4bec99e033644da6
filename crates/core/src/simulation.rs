//! Simulation module - the single context owning a level's state
//!
//! Holds the grid, the tile store, the cascade, gravity and running transitions, and
//! drains outbound [`CoreEvent`]s. Drivers call [`Simulation::tick`] with the elapsed
//! time of each frame and [`Simulation::place`] when the player drops a tile.

use tracing::{debug, trace, warn};

use crate::cascade::{self, CascadeContext, CascadeController, Phase};
use crate::config::SimConfig;
use crate::error::PlaceError;
use crate::gravity::{GravityEngine, Landing};
use crate::grid::Grid;
use crate::snapshot::GridSnapshot;
use crate::tile::{Tile, TileDescriptor, TileStore};
use crate::transition::Transitions;
use crate::types::{
    CellPos, CoreEvent, Ease, TileId, TransitionRequest, TransitionTarget, Vec2, TICK_MS,
};

/// Where an accepted tile went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementOutcome {
    pub tile: TileId,
    pub cell: CellPos,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    grid: Grid,
    store: TileStore,
    cascade: CascadeController,
    gravity: GravityEngine,
    transitions: Transitions,
    events: Vec<CoreEvent>,
    elapsed_ms: u64,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self {
            grid: Grid::new(config.rows, config.columns, config.cell_size),
            store: TileStore::new(),
            cascade: CascadeController::new(config.timings),
            gravity: GravityEngine::new(config.timings.gravity_move_ms),
            transitions: Transitions::new(),
            events: Vec::new(),
            elapsed_ms: 0,
            config,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn store(&self) -> &TileStore {
        &self.store
    }

    pub fn phase(&self) -> Phase {
        self.cascade.phase()
    }

    /// No cascade running; placements are accepted
    pub fn is_idle(&self) -> bool {
        self.cascade.is_idle()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.store.get(id)
    }

    /// Tile occupying `(row, col)`, if any
    pub fn tile_at(&self, row: i32, col: i32) -> Option<&Tile> {
        self.grid.tile_at(row, col).and_then(|id| self.store.get(id))
    }

    /// Drop a tile into `column`.
    ///
    /// The tile takes the lowest empty cell immediately; the landing transition and the
    /// cascade that follows run on later ticks. Placements are refused while a cascade
    /// is running.
    pub fn place(
        &mut self,
        column: usize,
        descriptor: &TileDescriptor,
    ) -> Result<PlacementOutcome, PlaceError> {
        if !self.cascade.is_idle() {
            return Err(PlaceError::CascadeBusy);
        }
        if column >= self.grid.columns() as usize {
            return Err(PlaceError::ColumnOutOfBounds {
                column,
                columns: self.grid.columns(),
            });
        }
        let row = self
            .grid
            .landing_row(column)
            .ok_or(PlaceError::ColumnFull(column))?;

        let cell = CellPos::new(row, column);
        // Spawned one cell above the top row, then moved into place.
        let above = self.grid.world_position(CellPos::new(0, column));
        let spawn_at = Vec2::new(above.x, above.y + self.grid.cell_size());
        let tile = self.store.spawn(descriptor, spawn_at);
        if !self.grid.occupy(row, column, tile) {
            self.store.destroy(tile);
            return Err(PlaceError::ColumnFull(column));
        }

        debug!(?tile, row, column, parts = descriptor.parts().len(), "tile placed");
        self.events.push(CoreEvent::TilePlaced { tile, cell });
        self.request(TransitionRequest {
            target: TransitionTarget::TilePosition { tile },
            to: self.grid.world_position(cell),
            duration_ms: self.config.timings.place_move_ms,
            ease: Ease::OutQuad,
        });
        self.events.push(CoreEvent::SpawnRequested);

        let timings = self.config.timings;
        self.cascade
            .arm(timings.place_move_ms + timings.match_check_delay_ms);

        Ok(PlacementOutcome { tile, cell })
    }

    /// Put a tile straight into a cell, bypassing placement rules.
    ///
    /// Returns `None` if the cell is occupied, reserved by a falling tile, or out of
    /// bounds. No cascade is started; see [`Simulation::request_scan`].
    pub fn insert(&mut self, cell: CellPos, descriptor: &TileDescriptor) -> Option<TileId> {
        if cell.row >= self.grid.rows() as usize
            || cell.col >= self.grid.columns() as usize
            || self.grid.tile_at(cell.row as i32, cell.col as i32).is_some()
            || self.grid.is_locked(cell.row, cell.col)
        {
            return None;
        }
        let tile = self.store.spawn(descriptor, self.grid.world_position(cell));
        let occupied = self.grid.occupy(cell.row, cell.col, tile);
        debug_assert!(occupied);
        Some(tile)
    }

    /// Start a cascade with an immediate scan. Returns false if one is already running.
    pub fn request_scan(&mut self) -> bool {
        self.cascade.arm(0)
    }

    /// Advance transitions, gravity and the cascade by `elapsed_ms`
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.elapsed_ms += u64::from(elapsed_ms);

        self.transitions.advance(&mut self.store, elapsed_ms);

        let landings = self.gravity.advance(&mut self.grid, &self.store, elapsed_ms);

        let mut ctx = CascadeContext {
            grid: &mut self.grid,
            store: &mut self.store,
            gravity: &mut self.gravity,
            transitions: &mut self.transitions,
            events: &mut self.events,
        };
        for landing in landings {
            match landing {
                Landing::Arrived(fall) => {
                    trace!(tile = ?fall.tile, from = fall.from.row, to = fall.to.row, col = fall.to.col, "tile fell");
                    ctx.events.push(CoreEvent::TileFell {
                        tile: fall.tile,
                        from: fall.from,
                        to: fall.to,
                    });
                }
                Landing::Blocked(fall) => {
                    warn!(tile = ?fall.tile, row = fall.to.row, col = fall.to.col, "dropping tile with no cell");
                    cascade::destroy_tile(&mut ctx, fall.tile);
                }
            }
        }
        self.cascade.tick(&mut ctx, elapsed_ms);
    }

    /// Tick at the fixed timestep until the cascade is idle.
    ///
    /// Returns the number of ticks taken, or `None` if still busy after `max_ticks`.
    pub fn run_until_idle(&mut self, max_ticks: u32) -> Option<u32> {
        for n in 0..max_ticks {
            if self.is_idle() {
                return Some(n);
            }
            self.tick(TICK_MS);
        }
        self.is_idle().then_some(max_ticks)
    }

    /// Drain pending events, oldest first
    pub fn take_events(&mut self) -> Vec<CoreEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::capture(&self.grid, &self.store, self.cascade.is_idle())
    }

    /// Tear the level down: every tile is destroyed and the cascade abandoned.
    ///
    /// Ids keep counting, so references into the old level stay stale.
    pub fn reset(&mut self) {
        debug!("level reset");
        self.gravity.clear(&mut self.grid);
        self.cascade.reset();
        self.transitions.clear();
        self.grid.clear();
        self.store.clear();
        self.events.clear();
    }

    fn request(&mut self, request: TransitionRequest) {
        if let Some(started) = self.transitions.start(&self.store, request) {
            self.events.push(CoreEvent::Transition(started));
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}
