//! Shape module - canonical part layouts and survivor re-layout rules
//!
//! Layout rules are pure: they read a tile's surviving parts and return the
//! target offset/scale per part. The cascade turns targets into transitions.
//!
//! Canonical layouts, as (offset, scale):
//!
//! | Parts | Layout |
//! |-------|--------|
//! | 1 | whole cell |
//! | 2 | left half, right half |
//! | 3 | left half, top-right quarter, bottom-right quarter |
//! | 4 | the four quadrants, top-left first |

use arrayvec::ArrayVec;

use crate::tile::Part;
use crate::types::{
    Footprint, PartId, TileKind, Vec2, CANONICAL_QUADRANTS, LAYOUT_TOLERANCE, MAX_PARTS,
    QUADRANT_STEP,
};

/// Scale of a quarter footprint
pub const QUARTER_SCALE: Vec2 = Vec2::new(0.5, 0.5);

/// Scale of a half footprint (half width, full height)
pub const HALF_SCALE: Vec2 = Vec2::new(0.5, 1.0);

const SINGLE_LAYOUT: [(Vec2, Vec2); 1] = [(Vec2::ZERO, Vec2::ONE)];

const SPLIT2_LAYOUT: [(Vec2, Vec2); 2] = [
    (Vec2::new(-0.25, 0.0), HALF_SCALE),
    (Vec2::new(0.25, 0.0), HALF_SCALE),
];

const SPLIT3_LAYOUT: [(Vec2, Vec2); 3] = [
    (Vec2::new(-0.25, 0.0), HALF_SCALE),
    (Vec2::new(0.25, 0.25), QUARTER_SCALE),
    (Vec2::new(0.25, -0.25), QUARTER_SCALE),
];

const SPLIT4_LAYOUT: [(Vec2, Vec2); 4] = [
    (CANONICAL_QUADRANTS[0], QUARTER_SCALE),
    (CANONICAL_QUADRANTS[1], QUARTER_SCALE),
    (CANONICAL_QUADRANTS[2], QUARTER_SCALE),
    (CANONICAL_QUADRANTS[3], QUARTER_SCALE),
];

/// Canonical (offset, scale) of each slot for a tile kind
pub fn canonical_layout(kind: TileKind) -> &'static [(Vec2, Vec2)] {
    match kind {
        TileKind::Single => &SINGLE_LAYOUT,
        TileKind::Split2 => &SPLIT2_LAYOUT,
        TileKind::Split3 => &SPLIT3_LAYOUT,
        TileKind::Split4 => &SPLIT4_LAYOUT,
    }
}

/// Target offset and scale for one part
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutTarget {
    pub part: PartId,
    pub position: Vec2,
    pub scale: Vec2,
}

impl LayoutTarget {
    fn moved(part: &Part, position: Vec2, scale: Vec2) -> Self {
        Self {
            part: part.id,
            position: position.clamp_offset(),
            scale,
        }
    }
}

pub type LayoutPlan = ArrayVec<LayoutTarget, MAX_PARTS>;

/// First canonical quadrant with no part within `LAYOUT_TOLERANCE` of it
pub fn missing_quadrant(parts: &[Part]) -> Option<Vec2> {
    CANONICAL_QUADRANTS.iter().copied().find(|q| {
        !parts
            .iter()
            .any(|p| p.position.distance(*q) < LAYOUT_TOLERANCE)
    })
}

/// Re-layout targets for the survivors of a removal, keyed by survivor count.
///
/// Parts without a target keep their current offset and scale.
pub fn plan_rearrangement(parts: &[Part]) -> LayoutPlan {
    let mut plan = LayoutPlan::new();
    match parts {
        [single] => {
            let x = single.position.x;
            let dx = if x < 0.0 {
                QUADRANT_STEP
            } else if x > 0.0 {
                -QUADRANT_STEP
            } else {
                0.0
            };
            plan.push(LayoutTarget::moved(
                single,
                Vec2::new(x + dx, single.position.y),
                Vec2::ONE,
            ));
        }
        [p0, p1] => plan_pair(p0, p1, &mut plan),
        [_, _, _] => {
            if let Some(target) = plan_triple(parts) {
                plan.push(target);
            }
        }
        _ => {}
    }
    plan
}

/// Slide a quarter towards the horizontal midline and grow it to full height
fn grow_to_midline(part: &Part) -> LayoutTarget {
    let dy = if part.position.y > 0.0 {
        -QUADRANT_STEP
    } else {
        QUADRANT_STEP
    };
    LayoutTarget::moved(
        part,
        Vec2::new(part.position.x, part.position.y + dy),
        Vec2::new(part.scale.x, part.scale.y + 0.5),
    )
}

fn plan_pair(p0: &Part, p1: &Part, plan: &mut LayoutPlan) {
    match (p0.footprint(), p1.footprint()) {
        (Footprint::Quarter, Footprint::Quarter) => {
            let same_side = (p0.position.y > 0.0 && p1.position.y > 0.0)
                || (p0.position.y < 0.0 && p1.position.y < 0.0);
            // Quarters on opposite sides of the midline are left as they are.
            if same_side {
                plan.push(grow_to_midline(p0));
                plan.push(grow_to_midline(p1));
            }
        }
        (Footprint::Quarter, Footprint::Half) => plan.push(grow_to_midline(p0)),
        (Footprint::Half, Footprint::Quarter) => plan.push(grow_to_midline(p1)),
        _ => {}
    }
}

fn plan_triple(parts: &[Part]) -> Option<LayoutTarget> {
    let missing = missing_quadrant(parts)?;
    let same_column = parts
        .iter()
        .filter(|p| (p.position.x - missing.x).abs() < LAYOUT_TOLERANCE);

    let (chunk, dy) = if missing.y > 0.0 {
        let chunk = same_column.min_by(|a, b| a.position.y.total_cmp(&b.position.y))?;
        (chunk, QUADRANT_STEP)
    } else {
        let chunk = same_column.max_by(|a, b| a.position.y.total_cmp(&b.position.y))?;
        (chunk, -QUADRANT_STEP)
    };

    Some(LayoutTarget::moved(
        chunk,
        Vec2::new(missing.x, chunk.position.y + dy),
        Vec2::new(chunk.scale.x, (chunk.scale.y * 2.0).min(1.0)),
    ))
}

/// Deterministic corrective snap once transitions have run.
///
/// One survivor becomes the whole cell; two half-width full-height survivors become
/// the exact left/right halves, keeping their left-to-right order.
pub fn final_snap(parts: &[Part]) -> LayoutPlan {
    let mut plan = LayoutPlan::new();
    match parts {
        [single] => plan.push(LayoutTarget {
            part: single.id,
            position: Vec2::ZERO,
            scale: Vec2::ONE,
        }),
        [p0, p1]
            if p0.scale.approx_eq(HALF_SCALE, LAYOUT_TOLERANCE)
                && p1.scale.approx_eq(HALF_SCALE, LAYOUT_TOLERANCE) =>
        {
            let (left, right) = if p1.position.x < p0.position.x {
                (p1, p0)
            } else {
                (p0, p1)
            };
            plan.push(LayoutTarget {
                part: left.id,
                position: Vec2::new(-0.25, 0.0),
                scale: HALF_SCALE,
            });
            plan.push(LayoutTarget {
                part: right.id,
                position: Vec2::new(0.25, 0.0),
                scale: HALF_SCALE,
            });
        }
        _ => {}
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, TileId};

    fn part(id: u32, x: f32, y: f32, sx: f32, sy: f32) -> Part {
        Part {
            id: PartId(id),
            tile: TileId(1),
            color: Color::Red,
            position: Vec2::new(x, y),
            scale: Vec2::new(sx, sy),
        }
    }

    #[test]
    fn canonical_layouts_have_matching_counts() {
        for kind in TileKind::ALL {
            assert_eq!(canonical_layout(kind).len(), kind.part_count());
        }
    }

    #[test]
    fn canonical_layouts_tile_the_unit_cell() {
        for kind in TileKind::ALL {
            let area: f32 = canonical_layout(kind)
                .iter()
                .map(|(_, s)| s.x * s.y)
                .sum();
            assert!((area - 1.0).abs() < 1e-6, "{kind:?} covers {area}");
        }
    }

    #[test]
    fn missing_quadrant_respects_tolerance() {
        let parts = [
            part(1, 0.25, 0.25, 0.5, 0.5),
            part(2, -0.25, -0.25, 0.5, 0.5),
            part(3, 0.25, -0.25, 0.5, 0.5),
        ];
        assert_eq!(missing_quadrant(&parts), Some(Vec2::new(-0.25, 0.25)));

        // 0.009 away still counts as present, 0.011 does not.
        let near = [part(1, -0.25 + 0.009, 0.25, 0.5, 0.5)];
        assert_eq!(missing_quadrant(&near), Some(Vec2::new(0.25, 0.25)));
        let far = [part(1, -0.25 + 0.011, 0.25, 0.5, 0.5)];
        assert_eq!(missing_quadrant(&far), Some(Vec2::new(-0.25, 0.25)));
    }

    #[test]
    fn three_parts_extend_same_column_neighbour_upwards() {
        // Top-left quadrant removed.
        let parts = [
            part(2, 0.25, 0.25, 0.5, 0.5),
            part(3, -0.25, -0.25, 0.5, 0.5),
            part(4, 0.25, -0.25, 0.5, 0.5),
        ];
        let plan = plan_rearrangement(&parts);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].part, PartId(3));
        assert_eq!(plan[0].position, Vec2::new(-0.25, 0.0));
        assert_eq!(plan[0].scale, HALF_SCALE);
    }

    #[test]
    fn three_parts_extend_same_column_neighbour_downwards() {
        // Bottom-right quadrant removed.
        let parts = [
            part(1, -0.25, 0.25, 0.5, 0.5),
            part(2, 0.25, 0.25, 0.5, 0.5),
            part(3, -0.25, -0.25, 0.5, 0.5),
        ];
        let plan = plan_rearrangement(&parts);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].part, PartId(2));
        assert_eq!(plan[0].position, Vec2::new(0.25, 0.0));
    }

    #[test]
    fn three_parts_without_same_column_neighbour_leave_gap() {
        // Top-right is missing and nothing sits in the right column.
        let parts = [
            part(1, -0.25, 0.25, 0.5, 0.5),
            part(3, -0.25, -0.25, 0.5, 0.5),
            part(5, -0.25, 0.0, 0.5, 1.0),
        ];
        assert_eq!(missing_quadrant(&parts), Some(Vec2::new(0.25, 0.25)));
        assert!(plan_rearrangement(&parts).is_empty());
    }

    #[test]
    fn two_top_quarters_become_halves() {
        let parts = [part(1, -0.25, 0.25, 0.5, 0.5), part(2, 0.25, 0.25, 0.5, 0.5)];
        let plan = plan_rearrangement(&parts);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].position, Vec2::new(-0.25, 0.0));
        assert_eq!(plan[1].position, Vec2::new(0.25, 0.0));
        assert!(plan.iter().all(|t| t.scale == HALF_SCALE));
    }

    #[test]
    fn two_bottom_quarters_move_up() {
        let parts = [part(1, -0.25, -0.25, 0.5, 0.5), part(2, 0.25, -0.25, 0.5, 0.5)];
        let plan = plan_rearrangement(&parts);
        assert_eq!(plan[0].position, Vec2::new(-0.25, 0.0));
        assert_eq!(plan[1].position, Vec2::new(0.25, 0.0));
    }

    #[test]
    fn quarters_on_opposite_sides_are_left_alone() {
        let parts = [part(1, -0.25, 0.25, 0.5, 0.5), part(2, 0.25, -0.25, 0.5, 0.5)];
        assert!(plan_rearrangement(&parts).is_empty());
    }

    #[test]
    fn quarter_and_half_become_two_halves() {
        let parts = [part(1, -0.25, 0.0, 0.5, 1.0), part(2, 0.25, -0.25, 0.5, 0.5)];
        let plan = plan_rearrangement(&parts);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].part, PartId(2));
        assert_eq!(plan[0].position, Vec2::new(0.25, 0.0));
        assert_eq!(plan[0].scale, HALF_SCALE);
    }

    #[test]
    fn single_survivor_moves_towards_centre() {
        let left = plan_rearrangement(&[part(1, -0.25, 0.0, 0.5, 1.0)]);
        assert_eq!(left[0].position, Vec2::ZERO);
        assert_eq!(left[0].scale, Vec2::ONE);

        let corner = plan_rearrangement(&[part(1, 0.25, 0.25, 0.5, 0.5)]);
        assert_eq!(corner[0].position, Vec2::new(0.0, 0.25));
    }

    #[test]
    fn four_parts_have_no_rule() {
        let parts: Vec<Part> = CANONICAL_QUADRANTS
            .iter()
            .enumerate()
            .map(|(i, q)| part(i as u32, q.x, q.y, 0.5, 0.5))
            .collect();
        assert!(plan_rearrangement(&parts).is_empty());
    }

    #[test]
    fn final_snap_single_and_halves() {
        let single = final_snap(&[part(1, 0.0, 0.25, 1.0, 1.0)]);
        assert_eq!(single[0].position, Vec2::ZERO);
        assert_eq!(single[0].scale, Vec2::ONE);

        // Slight drift, stored right-to-left.
        let halves = final_snap(&[part(1, 0.2499, 0.001, 0.5, 1.0), part(2, -0.2501, 0.0, 0.5, 1.0)]);
        assert_eq!(halves[0].part, PartId(2));
        assert_eq!(halves[0].position, Vec2::new(-0.25, 0.0));
        assert_eq!(halves[1].part, PartId(1));
        assert_eq!(halves[1].position, Vec2::new(0.25, 0.0));

        let quarters = final_snap(&[part(1, -0.25, 0.25, 0.5, 0.5), part(2, 0.25, -0.25, 0.5, 0.5)]);
        assert!(quarters.is_empty());
    }
}
