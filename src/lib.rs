//! Gridfire - headless 2.5D grid-world simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collision resolution, entities)
//! - `config`: Run configuration loaded from JSON

pub mod config;
pub mod sim;

pub use config::SimConfig;
pub use sim::{GameEvent, GameState, TickInput, tick};

/// Simulation constants
pub mod consts {
    use std::f32::consts::FRAC_PI_4;

    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;

    /// Margin kept between entity centers and wall faces (map units)
    pub const CLIP_DISTANCE: f32 = 0.1;
    /// Shortening applied when sliding up to an obstruction
    pub const MOVE_EPSILON: f32 = 0.01;
    /// Below this per-axis distance an axis counts as having no room left
    pub const AXIS_EPSILON: f32 = 0.001;

    /// Player speeds, per tick
    pub const PLAYER_MOVE_SPEED: f32 = 0.06;
    pub const PLAYER_STRAFE_SPEED: f32 = 0.05;
    pub const PLAYER_ROTATE_SPEED: f32 = 0.03;

    /// Raycasting view pitch limit (45 degrees either way)
    pub const PITCH_LIMIT: f32 = FRAC_PI_4;

    /// Eye heights per posture
    pub const STAND_Z: f32 = 0.5;
    pub const JUMP_Z: f32 = 0.9;
    pub const CROUCH_Z: f32 = 0.3;
    pub const PRONE_Z: f32 = 0.1;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!((normalize_angle(3.0 * PI) + PI).abs() < 1e-5);
        assert!((normalize_angle(-3.0 * PI) + PI).abs() < 1e-5);
        assert!((normalize_angle(PI) + PI).abs() < 1e-5);
        assert_eq!(normalize_angle(-PI), -PI);
    }
}
