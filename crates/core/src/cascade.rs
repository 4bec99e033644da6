//! Cascade module - the scan / resolve / rearrange / settle state machine
//!
//! ```text
//! Idle -> Scanning -> Resolving(settle) -> Resolving(shrink) -> Rearranging -> Settling
//!            ^                                                                   |
//!            +-------------------------------------------------------------------+
//! ```
//!
//! Every phase is a countdown advanced by [`CascadeController::tick`]; no phase ever
//! blocks. A scan that finds nothing returns the controller to `Idle`.

use arrayvec::ArrayVec;
use tracing::{debug, trace};

use crate::config::Timings;
use crate::gravity::GravityEngine;
use crate::grid::Grid;
use crate::matching;
use crate::shape::{self, LayoutPlan};
use crate::tile::TileStore;
use crate::transition::Transitions;
use crate::types::{
    CoreEvent, Ease, PartId, TileId, TransitionRequest, TransitionTarget, Vec2, MAX_PARTS,
};

/// Sub-step of the resolving phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStep {
    /// Matches are known; waiting before the shrink starts
    Settle,
    /// Matched parts are shrinking; they are destroyed when it ends
    Shrink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Scanning { delay_ms: u32 },
    Resolving { step: ResolveStep, remaining_ms: u32 },
    Rearranging { remaining_ms: u32 },
    Settling { remaining_ms: u32 },
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Scanning { .. } => "scanning",
            Phase::Resolving { .. } => "resolving",
            Phase::Rearranging { .. } => "rearranging",
            Phase::Settling { .. } => "settling",
        }
    }
}

/// The parts of the simulation a cascade mutates
pub struct CascadeContext<'a> {
    pub grid: &'a mut Grid,
    pub store: &'a mut TileStore,
    pub gravity: &'a mut GravityEngine,
    pub transitions: &'a mut Transitions,
    pub events: &'a mut Vec<CoreEvent>,
}

impl CascadeContext<'_> {
    fn request(&mut self, request: TransitionRequest) {
        if let Some(started) = self.transitions.start(self.store, request) {
            self.events.push(CoreEvent::Transition(started));
        }
    }
}

#[derive(Debug, Clone)]
pub struct CascadeController {
    phase: Phase,
    timings: Timings,
    rounds: u32,
    matched: Vec<(TileId, ArrayVec<PartId, MAX_PARTS>)>,
    rearranging: Vec<TileId>,
}

/// Remaining time after `elapsed_ms`, or `None` once the countdown has run out
fn countdown(remaining_ms: u32, elapsed_ms: u32) -> Option<u32> {
    match remaining_ms.saturating_sub(elapsed_ms) {
        0 => None,
        left => Some(left),
    }
}

impl CascadeController {
    pub fn new(timings: Timings) -> Self {
        Self {
            phase: Phase::Idle,
            timings,
            rounds: 0,
            matched: Vec::new(),
            rearranging: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Resolution rounds of the current (or last) cascade
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    /// Start a cascade with a scan after `delay_ms`.
    ///
    /// Ignored while a cascade is already running.
    pub fn arm(&mut self, delay_ms: u32) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.rounds = 0;
        self.enter(Phase::Scanning { delay_ms });
        true
    }

    /// Abandon any running cascade (level reset)
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.rounds = 0;
        self.matched.clear();
        self.rearranging.clear();
    }

    fn enter(&mut self, phase: Phase) {
        if std::mem::discriminant(&phase) != std::mem::discriminant(&self.phase) {
            trace!(from = self.phase.as_str(), to = phase.as_str(), "cascade phase");
        }
        self.phase = phase;
    }

    pub fn tick(&mut self, ctx: &mut CascadeContext<'_>, elapsed_ms: u32) {
        match self.phase {
            Phase::Idle => {}
            Phase::Scanning { delay_ms } => match countdown(delay_ms, elapsed_ms) {
                Some(delay_ms) => self.phase = Phase::Scanning { delay_ms },
                None => self.scan(ctx),
            },
            Phase::Resolving { step, remaining_ms } => match countdown(remaining_ms, elapsed_ms) {
                Some(remaining_ms) => self.phase = Phase::Resolving { step, remaining_ms },
                None => match step {
                    ResolveStep::Settle => self.start_shrink(ctx),
                    ResolveStep::Shrink => self.remove_matched(ctx),
                },
            },
            Phase::Rearranging { remaining_ms } => match countdown(remaining_ms, elapsed_ms) {
                Some(remaining_ms) => self.phase = Phase::Rearranging { remaining_ms },
                None => {
                    self.snap(ctx);
                    self.gravity_pass(ctx);
                }
            },
            Phase::Settling { remaining_ms } => match countdown(remaining_ms, elapsed_ms) {
                Some(remaining_ms) => self.phase = Phase::Settling { remaining_ms },
                // Falls still in flight hold the next pass back.
                None if ctx.gravity.is_moving() => self.phase = Phase::Settling { remaining_ms: 0 },
                None => self.gravity_pass(ctx),
            },
        }
    }

    fn scan(&mut self, ctx: &mut CascadeContext<'_>) {
        clear_degenerate(ctx);

        if !matching::has_any_match(ctx.grid, ctx.store) {
            self.finish(ctx);
            return;
        }

        let matches = matching::scan_grid(ctx.grid, ctx.store);
        if matches.is_empty() {
            self.finish(ctx);
            return;
        }

        self.rounds += 1;
        debug!(round = self.rounds, parts = matches.len(), "matches found");
        ctx.events.push(CoreEvent::MatchesFound {
            parts: matches.len() as u32,
        });
        self.matched = matches.by_tile();
        self.enter(Phase::Resolving {
            step: ResolveStep::Settle,
            remaining_ms: self.timings.match_settle_delay_ms,
        });
    }

    fn start_shrink(&mut self, ctx: &mut CascadeContext<'_>) {
        for (tile, parts) in &self.matched {
            for &part in parts {
                ctx.request(TransitionRequest {
                    target: TransitionTarget::PartScale { tile: *tile, part },
                    to: Vec2::ZERO,
                    duration_ms: self.timings.part_shrink_ms,
                    ease: Ease::InBack,
                });
            }
        }
        self.enter(Phase::Resolving {
            step: ResolveStep::Shrink,
            remaining_ms: self.timings.part_shrink_ms,
        });
    }

    fn remove_matched(&mut self, ctx: &mut CascadeContext<'_>) {
        self.rearranging.clear();

        for (tile, parts) in std::mem::take(&mut self.matched) {
            for part in parts {
                if ctx.store.detach_part(tile, part).is_some() {
                    ctx.events.push(CoreEvent::PartDestroyed { tile, part });
                }
            }

            let Some(survivor) = ctx.store.get(tile) else {
                continue;
            };
            if survivor.is_empty() {
                destroy_tile(ctx, tile);
            } else {
                self.rearranging.push(tile);
            }
        }

        for &tile in &self.rearranging {
            let Some(survivor) = ctx.store.get(tile) else {
                continue;
            };
            let plan = shape::plan_rearrangement(survivor.parts());
            trace!(?tile, parts = survivor.part_count(), targets = plan.len(), "rearranging");
            for target in plan {
                ctx.request(TransitionRequest {
                    target: TransitionTarget::PartPosition {
                        tile,
                        part: target.part,
                    },
                    to: target.position,
                    duration_ms: self.timings.rearrange_ms,
                    ease: Ease::OutBounce,
                });
                ctx.request(TransitionRequest {
                    target: TransitionTarget::PartScale {
                        tile,
                        part: target.part,
                    },
                    to: target.scale,
                    duration_ms: self.timings.rearrange_ms,
                    ease: Ease::OutBounce,
                });
            }
        }

        self.enter(Phase::Rearranging {
            remaining_ms: self.timings.final_snap_delay_ms,
        });
    }

    /// Corrective snap once the re-layout transitions have had time to run
    fn snap(&mut self, ctx: &mut CascadeContext<'_>) {
        for tile in std::mem::take(&mut self.rearranging) {
            let Some(survivor) = ctx.store.get(tile) else {
                continue;
            };
            let plan: LayoutPlan = shape::final_snap(survivor.parts());
            if plan.is_empty() {
                continue;
            }

            ctx.transitions.cancel_tile(tile);
            let Some(survivor) = ctx.store.get_mut(tile) else {
                continue;
            };
            for target in &plan {
                if let Some(part) = survivor.part_mut(target.part) {
                    part.position = target.position.clamp_offset();
                    part.scale = target.scale;
                }
            }
            for target in plan {
                for (target_kind, to) in [
                    (
                        TransitionTarget::PartPosition {
                            tile,
                            part: target.part,
                        },
                        target.position,
                    ),
                    (
                        TransitionTarget::PartScale {
                            tile,
                            part: target.part,
                        },
                        target.scale,
                    ),
                ] {
                    ctx.events.push(CoreEvent::Transition(TransitionRequest {
                        target: target_kind,
                        to,
                        duration_ms: 0,
                        ease: Ease::Linear,
                    }));
                }
            }
        }
    }

    fn gravity_pass(&mut self, ctx: &mut CascadeContext<'_>) {
        let started = ctx.gravity.begin_pass(ctx.grid);
        if started.is_empty() {
            debug!("grid settled");
            self.enter(Phase::Scanning {
                delay_ms: self.timings.match_check_delay_ms,
            });
            return;
        }

        trace!(moves = started.len(), "gravity pass");
        for fall in started {
            let to = ctx.grid.world_position(fall.to);
            ctx.request(TransitionRequest {
                target: TransitionTarget::TilePosition { tile: fall.tile },
                to,
                duration_ms: self.timings.gravity_move_ms,
                ease: Ease::OutBounce,
            });
        }
        self.enter(Phase::Settling {
            remaining_ms: self.timings.gravity_pass_delay_ms,
        });
    }

    fn finish(&mut self, ctx: &mut CascadeContext<'_>) {
        debug!(rounds = self.rounds, "cascade finished");
        ctx.events.push(CoreEvent::CascadeFinished {
            rounds: self.rounds,
        });
        self.enter(Phase::Idle);
    }
}

/// Destroy a tile, free its cell if it holds one and cancel its transitions
pub(crate) fn destroy_tile(ctx: &mut CascadeContext<'_>, tile: TileId) {
    let cell = ctx.grid.position_of(tile);
    if let Some(pos) = cell {
        ctx.grid.remove_tile(pos.row, pos.col);
    }
    ctx.transitions.cancel_tile(tile);
    if ctx.store.destroy(tile).is_some() {
        ctx.events.push(CoreEvent::TileDestroyed { tile, cell });
    }
}

/// Drop cells whose tile is gone or has no parts
fn clear_degenerate(ctx: &mut CascadeContext<'_>) {
    let degenerate: Vec<_> = ctx
        .grid
        .occupied()
        .filter(|(_, id)| ctx.store.get(*id).map_or(true, |t| t.is_empty()))
        .collect();

    for (pos, tile) in degenerate {
        if ctx.store.contains(tile) {
            debug!(?tile, row = pos.row, col = pos.col, "destroying empty tile");
            destroy_tile(ctx, tile);
        } else {
            ctx.grid.remove_tile(pos.row, pos.col);
        }
    }
}
