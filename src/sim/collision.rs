//! Movement validation with bounded sliding collision resolution
//!
//! `resolve_move` answers one question: given where an entity wants to go
//! this tick, where does it actually end up? Obstructions are the static
//! wall-face set plus the collision circles of the player and every sprite.
//! When a slide is allowed, a blocked move gets exactly one shortened or
//! axis-restricted retry; an entity that still cannot move stays put.

use std::cmp::Ordering;

use glam::Vec2;

use super::geom::{Circle, Line, segment_circle_intersection, segment_intersection};
use super::state::{Entity, EntityId, GameState};
use crate::consts::{AXIS_EPSILON, MOVE_EPSILON};

/// One entity struck along a motion line, with the surface contact point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityCollision {
    pub entity: EntityId,
    pub point: Vec2,
}

/// Outcome of a movement request
#[derive(Debug, Clone, PartialEq)]
pub struct MoveResult {
    /// Position the mover ends the tick at
    pub pos: Vec2,
    pub collided: bool,
    /// Entities struck, nearest first
    pub hits: Vec<EntityCollision>,
    /// Nearest obstruction point of the attempt that failed, if any.
    /// Impact effects spawn here so they sit on the struck surface.
    pub blocked_at: Option<Vec2>,
}

enum Attempt {
    Clear(MoveResult),
    Blocked {
        hits: Vec<EntityCollision>,
        nearest: Vec2,
    },
}

/// Validate a move for `mover` toward `target`.
///
/// With `allow_slide`, a blocked move is retried once: shortened to just
/// before the nearest obstruction, or restricted to the axis that still has
/// room when the other axis is already exhausted. The retry itself never
/// slides again, so resolution is bounded at two attempts per call.
pub fn resolve_move(
    state: &GameState,
    mover: &Entity,
    target: Vec2,
    allow_slide: bool,
) -> MoveResult {
    debug_assert!(mover.collision_radius >= 0.0);
    let pos = mover.pos;

    if target == pos {
        return MoveResult {
            pos,
            collided: false,
            hits: Vec::new(),
            blocked_at: None,
        };
    }

    let (hits, nearest) = match attempt_move(state, mover, target) {
        Attempt::Clear(result) => return result,
        Attempt::Blocked { hits, nearest } => (hits, nearest),
    };

    if !allow_slide {
        return blocked(pos, hits, nearest);
    }

    let Some(retry) = slide_target(pos, target, nearest) else {
        return blocked(pos, hits, nearest);
    };

    match attempt_move(state, mover, retry) {
        Attempt::Clear(result) => result,
        Attempt::Blocked {
            hits: retry_hits,
            nearest: retry_nearest,
        } => blocked(pos, retry_hits, retry_nearest),
    }
}

fn blocked(pos: Vec2, hits: Vec<EntityCollision>, nearest: Vec2) -> MoveResult {
    MoveResult {
        pos,
        collided: true,
        hits,
        blocked_at: Some(nearest),
    }
}

/// Target for the single slide retry: shortened toward the nearest
/// obstruction, or the full move restricted to whichever axis still has
/// room. `None` when the shortened move is too small on both axes.
fn slide_target(pos: Vec2, target: Vec2, nearest: Vec2) -> Option<Vec2> {
    let toward = Line::new(pos, nearest);
    let shortened = Line::from_angle(pos, toward.angle(), toward.length() - MOVE_EPSILON).b;

    let x_diff = (shortened.x - pos.x).abs();
    let y_diff = (shortened.y - pos.y).abs();
    if x_diff <= AXIS_EPSILON && y_diff <= AXIS_EPSILON {
        return None;
    }

    if x_diff <= AXIS_EPSILON {
        // no more room in X, try the full move in Y only
        Some(Vec2::new(pos.x, target.y))
    } else if y_diff <= AXIS_EPSILON {
        // no more room in Y, try the full move in X only
        Some(Vec2::new(target.x, pos.y))
    } else {
        Some(shortened)
    }
}

/// Single unguarded movement attempt: scan walls and entity circles, then
/// either report the obstruction set or commit the (bounds-clamped) target.
fn attempt_move(state: &GameState, mover: &Entity, target: Vec2) -> Attempt {
    let pos = mover.pos;
    let move_line = Line::new(pos, target);

    let mut intersects: Vec<Vec2> = Vec::new();
    let mut hits: Vec<EntityCollision> = Vec::new();

    for wall in &state.collision_set {
        if let Some(p) = segment_intersection(&move_line, wall) {
            intersects.push(p);
        }
    }

    check_entity(
        &move_line,
        mover,
        &state.player.entity,
        &mut intersects,
        &mut hits,
    );
    for sprite in &state.sprites {
        check_entity(&move_line, mover, &sprite.entity, &mut intersects, &mut hits);
    }

    hits.sort_by(|a, b| {
        pos.distance_squared(a.point)
            .partial_cmp(&pos.distance_squared(b.point))
            .unwrap_or(Ordering::Equal)
    });

    let nearest = intersects.iter().copied().min_by(|a, b| {
        pos.distance_squared(*a)
            .partial_cmp(&pos.distance_squared(*b))
            .unwrap_or(Ordering::Equal)
    });
    if let Some(nearest) = nearest {
        return Attempt::Blocked { hits, nearest };
    }

    // Nothing crossed. Clamp into the grid with the clip margin, then make
    // sure the destination cell itself is not solid.
    let mut new_pos = target;
    let clip = state.clip_distance;
    let width = state.map.width() as f32;
    let height = state.map.height() as f32;

    if new_pos.x < 0.0 {
        new_pos.x = clip;
    } else if new_pos.x >= width {
        new_pos.x = width - clip;
    }
    if new_pos.y < 0.0 {
        new_pos.y = clip;
    } else if new_pos.y >= height {
        new_pos.y = height - clip;
    }

    if state
        .map
        .is_solid(new_pos.x.floor() as i64, new_pos.y.floor() as i64)
    {
        Attempt::Clear(MoveResult {
            pos,
            collided: true,
            hits,
            blocked_at: None,
        })
    } else {
        Attempt::Clear(MoveResult {
            pos: new_pos,
            collided: false,
            hits,
            blocked_at: None,
        })
    }
}

/// Test the motion line against one entity's collision circle.
///
/// Crossings of the combined-radius circle mark where the mover's center
/// first overlaps the other entity; a ray from each crossing toward the
/// other's center, cut against its own circle, yields the surface contact
/// points. Those feed both the clamping set and the hit report.
fn check_entity(
    move_line: &Line,
    mover: &Entity,
    other: &Entity,
    intersects: &mut Vec<Vec2>,
    hits: &mut Vec<EntityCollision>,
) {
    if other.id == mover.id
        || mover.parent == Some(other.id)
        || mover.collision_radius <= 0.0
        || other.collision_radius <= 0.0
    {
        return;
    }

    let combined = Circle {
        center: other.pos,
        radius: other.collision_radius + mover.collision_radius,
    };
    let crossings = segment_circle_intersection(move_line, &combined, true);
    if crossings.is_empty() {
        return;
    }

    let surface = Circle {
        center: other.pos,
        radius: other.collision_radius,
    };
    for crossing in crossings {
        let toward = Line::new(crossing, other.pos);
        for contact in segment_circle_intersection(&toward, &surface, true) {
            intersects.push(contact);
            hits.push(EntityCollision {
                entity: other.id,
                point: contact,
            });
        }
    }
}
