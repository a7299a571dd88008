//! Headless demo run
//!
//! Builds the demo level, drops in a few wandering sprites and props, arms
//! the player, and drives a short scripted session while logging the events
//! each tick emits.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;
use log::info;

use gridfire::SimConfig;
use gridfire::consts::*;
use gridfire::sim::{
    Animation, EffectSpec, GameEvent, GameState, MapGrid, ProjectileSpec, TickInput, Weapon,
};

const DEMO_TICKS: u64 = 240;

fn main() {
    env_logger::init();

    let config = SimConfig::load("gridfire-config.json");
    let seed = config.effective_seed();
    info!("demo run, seed {seed}");

    let mut state = GameState::with_map(
        MapGrid::demo(),
        config.clip_distance,
        seed,
        Vec2::new(9.5, 8.5),
        FRAC_PI_2,
    );
    populate(&mut state);

    for step in 0..DEMO_TICKS {
        let input = script(step);
        state.simulate(&input);

        for event in &state.events {
            match event {
                GameEvent::PlayerDamaged { by } => info!("ouch! hit by projectile {}", by.0),
                GameEvent::SpriteHit { target, point } => {
                    info!(
                        "sprite {} hit at ({:.2}, {:.2})",
                        target.0, point.x, point.y
                    );
                }
                GameEvent::ProjectileImpact { pos } => {
                    info!("impact at ({:.2}, {:.2})", pos.x, pos.y);
                }
            }
        }
        if config.debug {
            let p = state.player.entity.pos;
            info!(
                "tick {:3} player ({:.3}, {:.3}) angle {:.3}",
                state.time_ticks, p.x, p.y, state.player.entity.angle
            );
        }
    }

    let p = state.player.entity.pos;
    info!(
        "done after {} ticks: player at ({:.2}, {:.2}), {} sprites, {} projectiles, {} effects live",
        state.time_ticks,
        p.x,
        p.y,
        state.sprites.len(),
        state.projectiles.len(),
        state.effects.len()
    );
}

/// Sprites, props, and weapons for the demo level
fn populate(state: &mut GameState) {
    // wandering walkers, spread around the open floor
    let walkers = [
        (Vec2::new(4.5, 2.5), 0.0),
        (Vec2::new(15.5, 2.5), PI),
        (Vec2::new(7.5, 7.5), FRAC_PI_2),
        (Vec2::new(12.5, 7.5), -FRAC_PI_2),
    ];
    for (pos, angle) in walkers {
        state.spawn_sprite(pos, 0.25, angle, 0.02, Animation::new(10, 4));
    }

    // decorative props, non-blocking
    for pos in [
        Vec2::new(2.5, 5.5),
        Vec2::new(17.5, 5.5),
        Vec2::new(10.5, 1.5),
    ] {
        state.spawn_prop(pos);
    }

    // slow heavy bolt with a big blue explosion
    let charged_bolt = ProjectileSpec {
        collision_radius: 20.0 / 256.0,
        anim_rate: 7,
        anim_frames: 6,
        impact_effect: Some(EffectSpec {
            anim_rate: 3,
            anim_frames: 5,
            loop_count: 1,
        }),
        ..Default::default()
    };
    state.player.add_weapon(Weapon::new(charged_bolt, 6.0, 2.5));

    // fast thin bolt with a short red flash
    let red_bolt = ProjectileSpec {
        collision_radius: 5.0 / 256.0,
        anim_rate: 1,
        anim_frames: 1,
        impact_effect: Some(EffectSpec {
            anim_rate: 2,
            anim_frames: 4,
            loop_count: 1,
        }),
        ..Default::default()
    };
    state.player.add_weapon(Weapon::new(red_bolt, 24.0, 6.0));

    state.player.select_weapon(Some(0));
}

/// Scripted player intent: walk north into the wall, wheel around while
/// strafing, then hold the trigger on both weapons in turn.
fn script(step: u64) -> TickInput {
    match step {
        0..=59 => TickInput {
            move_dist: PLAYER_MOVE_SPEED,
            ..Default::default()
        },
        60..=119 => TickInput {
            rotate: -PLAYER_ROTATE_SPEED,
            strafe_dist: PLAYER_STRAFE_SPEED,
            ..Default::default()
        },
        120..=179 => TickInput {
            fire: true,
            ..Default::default()
        },
        180 => TickInput {
            fire: true,
            select_weapon: Some(Some(1)),
            ..Default::default()
        },
        _ => TickInput {
            fire: true,
            ..Default::default()
        },
    }
}
