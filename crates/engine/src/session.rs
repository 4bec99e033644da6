//! Play session - a simulation plus the tile waiting to be dropped

use tracing::{debug, info};

use crate::core::{
    ColoringPolicy, GridSnapshot, RandomColoring, SimConfig, Simulation, TileDescriptor,
    TileSpawner,
};
use crate::place::{apply_place, PlacementRequest, PlacementResult};
use crate::types::CoreEvent;

#[derive(Debug, Clone)]
pub struct Session<P: ColoringPolicy = RandomColoring> {
    sim: Simulation,
    spawner: TileSpawner<P>,
    current: TileDescriptor,
    placed: u32,
}

impl Session<RandomColoring> {
    /// New level with tiles drawn from `config.seed`
    pub fn new(config: SimConfig) -> Self {
        let spawner = TileSpawner::new(config.seed);
        Self::with_spawner(config, spawner)
    }
}

impl<P: ColoringPolicy> Session<P> {
    pub fn with_spawner(config: SimConfig, mut spawner: TileSpawner<P>) -> Self {
        info!(
            rows = config.rows,
            columns = config.columns,
            seed = config.seed,
            "session started"
        );
        let current = spawner.spawn();
        Self {
            sim: Simulation::new(config),
            spawner,
            current,
            placed: 0,
        }
    }

    /// The tile the next [`Session::drop_current`] will place
    pub fn current(&self) -> &TileDescriptor {
        &self.current
    }

    /// Drop the current tile into `column`.
    ///
    /// On success the spawner produces the next tile; on rejection the current tile
    /// stays and can be dropped again.
    pub fn drop_current(&mut self, column: usize) -> PlacementResult {
        let result = apply_place(
            &mut self.sim,
            PlacementRequest {
                column,
                descriptor: &self.current,
            },
        );
        if result.accepted {
            self.placed += 1;
            self.current = self.spawner.spawn();
            debug!(next_parts = self.current.parts().len(), "next tile spawned");
        }
        result
    }

    pub fn tick(&mut self, elapsed_ms: u32) {
        self.sim.tick(elapsed_ms);
    }

    pub fn is_idle(&self) -> bool {
        self.sim.is_idle()
    }

    pub fn take_events(&mut self) -> Vec<CoreEvent> {
        self.sim.take_events()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        self.sim.snapshot()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    /// Tiles accepted since the session (or level) started
    pub fn placed(&self) -> u32 {
        self.placed
    }

    /// Restart the level; the spawner keeps its sequence
    pub fn reset(&mut self) {
        self.sim.reset();
        self.placed = 0;
        self.current = self.spawner.spawn();
    }
}
