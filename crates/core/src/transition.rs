//! Transition module - timed interpolation of part and tile transforms
//!
//! Stands in for the animation collaborator: each started transition is also
//! reported as a [`TransitionRequest`] so a renderer can mirror it, while the model
//! values are interpolated here. Part offsets are clamped to the legal range on every
//! update, not only at the end. Transitions whose tile or part no longer exists are
//! dropped without effect.

use crate::tile::TileStore;
use crate::types::{Ease, TileId, TransitionRequest, TransitionTarget, Vec2};

const BACK_OVERSHOOT: f32 = 1.70158;
const BOUNCE_N: f32 = 7.5625;
const BOUNCE_D: f32 = 2.75;

/// Eased progress for `t` in `[0, 1]`.
///
/// `InBack` dips below zero before reaching one.
pub fn ease(kind: Ease, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match kind {
        Ease::Linear => t,
        Ease::OutQuad => t * (2.0 - t),
        Ease::InBack => {
            let c3 = BACK_OVERSHOOT + 1.0;
            c3 * t * t * t - BACK_OVERSHOOT * t * t
        }
        Ease::OutBounce => {
            if t < 1.0 / BOUNCE_D {
                BOUNCE_N * t * t
            } else if t < 2.0 / BOUNCE_D {
                let t = t - 1.5 / BOUNCE_D;
                BOUNCE_N * t * t + 0.75
            } else if t < 2.5 / BOUNCE_D {
                let t = t - 2.25 / BOUNCE_D;
                BOUNCE_N * t * t + 0.9375
            } else {
                let t = t - 2.625 / BOUNCE_D;
                BOUNCE_N * t * t + 0.984375
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    request: TransitionRequest,
    from: Vec2,
    elapsed_ms: u32,
}

impl Transition {
    fn value(&self) -> Vec2 {
        if self.is_done() {
            return self.request.to;
        }
        let t = self.elapsed_ms as f32 / self.request.duration_ms as f32;
        self.from.lerp(self.request.to, ease(self.request.ease, t))
    }

    fn is_done(&self) -> bool {
        self.elapsed_ms >= self.request.duration_ms
    }
}

/// The set of running transitions
#[derive(Debug, Clone, Default)]
pub struct Transitions {
    active: Vec<Transition>,
}

fn current_value(store: &TileStore, target: TransitionTarget) -> Option<Vec2> {
    match target {
        TransitionTarget::PartPosition { tile, part } => store.part(tile, part).map(|p| p.position),
        TransitionTarget::PartScale { tile, part } => store.part(tile, part).map(|p| p.scale),
        TransitionTarget::TilePosition { tile } => store.get(tile).map(|t| t.world_position),
    }
}

/// Write an interpolated value. Returns false if the target is gone.
fn apply(store: &mut TileStore, target: TransitionTarget, value: Vec2) -> bool {
    match target {
        TransitionTarget::PartPosition { tile, part } => match store.part_mut(tile, part) {
            Some(p) => {
                p.position = value.clamp_offset();
                true
            }
            None => false,
        },
        TransitionTarget::PartScale { tile, part } => match store.part_mut(tile, part) {
            Some(p) => {
                p.scale = value;
                p.position = p.position.clamp_offset();
                true
            }
            None => false,
        },
        TransitionTarget::TilePosition { tile } => match store.get_mut(tile) {
            Some(t) => {
                t.world_position = value;
                true
            }
            None => false,
        },
    }
}

impl Transitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transition from the target's current value.
    ///
    /// A running transition on the same target is replaced. Returns `None` (and starts
    /// nothing) if the target does not exist.
    pub fn start(
        &mut self,
        store: &TileStore,
        request: TransitionRequest,
    ) -> Option<TransitionRequest> {
        let from = current_value(store, request.target)?;
        self.active.retain(|t| t.request.target != request.target);
        self.active.push(Transition {
            request,
            from,
            elapsed_ms: 0,
        });
        Some(request)
    }

    /// Advance every transition. Returns how many completed.
    pub fn advance(&mut self, store: &mut TileStore, elapsed_ms: u32) -> usize {
        let mut completed = 0;
        self.active.retain_mut(|t| {
            t.elapsed_ms = t.elapsed_ms.saturating_add(elapsed_ms);
            if !apply(store, t.request.target, t.value()) {
                return false;
            }
            if t.is_done() {
                completed += 1;
                return false;
            }
            true
        });
        completed
    }

    /// Run everything to completion immediately
    pub fn finish_all(&mut self, store: &mut TileStore) {
        for t in self.active.drain(..) {
            apply(store, t.request.target, t.request.to);
        }
    }

    /// Drop every running transition that targets `tile` or one of its parts
    pub fn cancel_tile(&mut self, tile: TileId) {
        self.active.retain(|t| t.request.target.tile() != tile);
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileDescriptor;
    use crate::types::Color;

    fn store_with_half() -> (TileStore, TileId, crate::types::PartId) {
        let mut store = TileStore::new();
        let id = store.spawn(
            &TileDescriptor::new(&[Color::Red, Color::Blue]).unwrap(),
            Vec2::ZERO,
        );
        let part = store.get(id).unwrap().parts()[0].id;
        (store, id, part)
    }

    #[test]
    fn easing_endpoints() {
        for kind in [Ease::Linear, Ease::OutQuad, Ease::InBack, Ease::OutBounce] {
            assert!(ease(kind, 0.0).abs() < 1e-5, "{kind:?} at 0");
            assert!((ease(kind, 1.0) - 1.0).abs() < 1e-5, "{kind:?} at 1");
        }
        assert!(ease(Ease::InBack, 0.2) < 0.0);
    }

    #[test]
    fn position_is_clamped_mid_transition() {
        let (mut store, tile, part) = store_with_half();
        let mut tr = Transitions::new();
        // A target outside the legal range is approached but never exceeded.
        tr.start(
            &store,
            TransitionRequest {
                target: TransitionTarget::PartPosition { tile, part },
                to: Vec2::new(-0.9, 0.9),
                duration_ms: 300,
                ease: Ease::OutBounce,
            },
        )
        .unwrap();

        for _ in 0..30 {
            tr.advance(&mut store, 16);
            let p = store.part(tile, part).unwrap().position;
            assert!(p.x >= -0.25 && p.x <= 0.25);
            assert!(p.y >= -0.25 && p.y <= 0.25);
        }
        assert!(tr.is_idle());
    }

    #[test]
    fn completion_writes_exact_target() {
        let (mut store, tile, part) = store_with_half();
        let mut tr = Transitions::new();
        tr.start(
            &store,
            TransitionRequest {
                target: TransitionTarget::PartScale { tile, part },
                to: Vec2::ONE,
                duration_ms: 100,
                ease: Ease::OutBounce,
            },
        );
        assert_eq!(tr.advance(&mut store, 50), 0);
        assert_eq!(tr.advance(&mut store, 50), 1);
        assert_eq!(store.part(tile, part).unwrap().scale, Vec2::ONE);
    }

    #[test]
    fn destroyed_target_is_dropped_silently() {
        let (mut store, tile, part) = store_with_half();
        let mut tr = Transitions::new();
        tr.start(
            &store,
            TransitionRequest {
                target: TransitionTarget::PartPosition { tile, part },
                to: Vec2::ZERO,
                duration_ms: 300,
                ease: Ease::Linear,
            },
        );
        store.destroy(tile);
        assert_eq!(tr.advance(&mut store, 16), 0);
        assert!(tr.is_idle());

        // Starting on a missing target does nothing.
        let none = tr.start(
            &store,
            TransitionRequest {
                target: TransitionTarget::TilePosition { tile },
                to: Vec2::ZERO,
                duration_ms: 10,
                ease: Ease::Linear,
            },
        );
        assert!(none.is_none());
    }

    #[test]
    fn zero_duration_completes_on_first_advance() {
        let (mut store, tile, _) = store_with_half();
        let mut tr = Transitions::new();
        tr.start(
            &store,
            TransitionRequest {
                target: TransitionTarget::TilePosition { tile },
                to: Vec2::new(3.0, -2.0),
                duration_ms: 0,
                ease: Ease::OutQuad,
            },
        );
        assert_eq!(tr.advance(&mut store, 0), 1);
        assert_eq!(store.get(tile).unwrap().world_position, Vec2::new(3.0, -2.0));
    }
}
