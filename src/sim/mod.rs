//! Deterministic simulation module
//!
//! All world logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geom;
pub mod map;
pub mod state;
pub mod tick;

pub use collision::{EntityCollision, MoveResult, resolve_move};
pub use geom::{Circle, Line, adjacent_leg, segment_circle_intersection, segment_intersection};
pub use map::MapGrid;
pub use state::{
    Animation, Effect, EffectSpec, Entity, EntityId, GameEvent, GameState, Player, Posture,
    Projectile, ProjectileSpec, RngState, Sprite, Weapon,
};
pub use tick::{TickInput, tick};
