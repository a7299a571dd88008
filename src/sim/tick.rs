//! Fixed-tick simulation step
//!
//! One call to `tick` advances the whole world by a single 60 Hz step, in a
//! fixed order: projectiles, effects, sprites, player. Later movers see the
//! committed positions of earlier ones. Removals are collected during each
//! pass and applied after it, so nothing is mutated once marked removed.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;
use log::debug;
use rand::Rng;

use super::collision::resolve_move;
use super::geom::{Line, adjacent_leg};
use super::state::{Effect, GameEvent, GameState, Posture};
use crate::consts::{PITCH_LIMIT, TICK_RATE};
use crate::normalize_angle;

/// Player intent for one tick. Distances are map units, angles radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickInput {
    /// Forward (positive) or backward (negative) along the heading
    pub move_dist: f32,
    /// Sideways step; positive strafes right of the heading
    pub strafe_dist: f32,
    /// Heading delta
    pub rotate: f32,
    /// Pitch delta
    pub pitch: f32,
    pub fire: bool,
    pub posture: Option<Posture>,
    /// `Some(slot)` switches weapons, `Some(None)` holsters
    pub select_weapon: Option<Option<usize>>,
}

impl GameState {
    /// Advance the simulation by one tick
    pub fn simulate(&mut self, input: &TickInput) {
        tick(self, input);
    }
}

pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();
    state.time_ticks += 1;
    for weapon in &mut state.player.weapons {
        weapon.cool();
    }

    update_projectiles(state);
    update_effects(state);
    update_sprites(state);
    update_player(state, input);
}

fn update_projectiles(state: &mut GameState) {
    let mut keep = vec![true; state.projectiles.len()];
    let mut spawned: Vec<Effect> = Vec::new();

    for i in 0..state.projectiles.len() {
        let mut projectile = state.projectiles[i];
        let entity = projectile.sprite.entity;

        if entity.velocity != 0.0 {
            // Decompose the pitched velocity into a horizontal leg and a z
            // step. The z step reuses the shortened leg as its hypotenuse,
            // matching the flight arc entities have always had.
            let mut ground = entity.velocity;
            let mut z_step = 0.0;
            if entity.pitch != 0.0 {
                ground = adjacent_leg(entity.pitch, entity.velocity);
                z_step = Line::from_angle(Vec2::ZERO, entity.pitch, ground).b.y;
            }
            let target = Line::from_angle(entity.pos, entity.angle, ground).b;

            let result = resolve_move(state, &entity, target, false);
            if result.collided || entity.pos_z <= 0.0 {
                keep[i] = false;

                // place the impact at the first entity contact, else the
                // struck wall point, else wherever the move ended
                let impact_pos = result
                    .hits
                    .first()
                    .map(|hit| hit.point)
                    .or(result.blocked_at)
                    .unwrap_or(result.pos);

                if projectile.impact_effect.is_some() {
                    let id = state.next_entity_id();
                    if let Some(effect) = projectile.spawn_effect(id, impact_pos, entity.pos_z) {
                        spawned.push(effect);
                    }
                }

                for hit in &result.hits {
                    if hit.entity == state.player.entity.id {
                        state.events.push(GameEvent::PlayerDamaged { by: entity.id });
                    } else {
                        state.events.push(GameEvent::SpriteHit {
                            target: hit.entity,
                            point: hit.point,
                        });
                    }
                }
                state
                    .events
                    .push(GameEvent::ProjectileImpact { pos: impact_pos });
                debug!(
                    "projectile {} impacted at ({:.3}, {:.3})",
                    entity.id.0, impact_pos.x, impact_pos.y
                );
            } else {
                projectile.sprite.entity.pos = result.pos;
                if z_step != 0.0 {
                    projectile.sprite.entity.pos_z += z_step;
                }
            }
        }

        // lifespan and animation run whether or not the projectile moved
        projectile.lifespan -= 1.0 / TICK_RATE as f32;
        if projectile.lifespan <= 0.0 {
            keep[i] = false;
        }
        projectile.sprite.update();
        state.projectiles[i] = projectile;
    }

    let mut idx = 0;
    state.projectiles.retain(|_| {
        idx += 1;
        keep[idx - 1]
    });
    state.effects.extend(spawned);
}

fn update_effects(state: &mut GameState) {
    for effect in &mut state.effects {
        effect.update();
    }
    state.effects.retain(|effect| !effect.finished());
}

fn update_sprites(state: &mut GameState) {
    for i in 0..state.sprites.len() {
        let mut sprite = state.sprites[i];
        let entity = sprite.entity;

        if entity.velocity != 0.0 {
            let target = Line::from_angle(entity.pos, entity.angle, entity.velocity).b;

            let result = resolve_move(state, &entity, target, false);
            if result.collided {
                // ping-pong off the obstruction in a fresh random direction
                let mut rng = state.rng.stream(state.time_ticks, entity.id.0);
                sprite.entity.angle = rng.random_range(-PI..PI);
                sprite.entity.velocity = rng.random_range(0.01..0.03);
            } else {
                sprite.entity.pos = result.pos;
            }
        }

        sprite.update();
        state.sprites[i] = sprite;
    }
}

fn update_player(state: &mut GameState, input: &TickInput) {
    if let Some(slot) = input.select_weapon {
        state.player.select_weapon(slot);
    }
    if let Some(posture) = input.posture {
        state.player.set_posture(posture);
    }

    if input.rotate != 0.0 {
        state.player.entity.angle = normalize_angle(state.player.entity.angle + input.rotate);
    }
    if input.pitch != 0.0 {
        // raycasting renderers top out at 45 degrees either way
        state.player.entity.pitch =
            (state.player.entity.pitch + input.pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    if input.move_dist != 0.0 {
        let entity = state.player.entity;
        let target = Line::from_angle(entity.pos, entity.angle, input.move_dist).b;
        let result = resolve_move(state, &entity, target, true);
        state.player.entity.pos = result.pos;
    }

    if input.strafe_dist != 0.0 {
        let entity = state.player.entity;
        let strafe_angle = if input.strafe_dist < 0.0 {
            -FRAC_PI_2
        } else {
            FRAC_PI_2
        };
        let target = Line::from_angle(
            entity.pos,
            entity.angle - strafe_angle,
            input.strafe_dist.abs(),
        )
        .b;
        let result = resolve_move(state, &entity, target, true);
        state.player.entity.pos = result.pos;
    }

    if input.fire {
        fire_weapon(state);
    }
}

fn fire_weapon(state: &mut GameState) {
    let Some(weapon) = state.player.weapon_mut() else {
        // nothing in hand: draw the first weapon instead of firing
        state.player.select_weapon(Some(0));
        return;
    };
    if !weapon.fire() {
        return;
    }
    let spec = weapon.projectile;
    let velocity = weapon.velocity / TICK_RATE as f32;

    // muzzle sits just below the eye line
    let player = state.player.entity;
    let pos_z = (player.pos_z - 0.15).clamp(0.05, player.pos_z + 0.5);
    let id = state.spawn_projectile(
        &spec,
        player.pos,
        pos_z,
        player.angle,
        player.pitch,
        velocity,
        Some(player.id),
    );
    debug!("fired projectile {} at {:.3} units/tick", id.0, velocity);
}
