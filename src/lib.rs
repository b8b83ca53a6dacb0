//! Neon Striker - a wave-based arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, physics, collisions, game state)
//! - `platform`: Input boundary and clock abstraction
//! - `game`: Frame driver tying input, simulation and presentation together
//! - `settings`: Runtime preferences (seed, particle quality)

pub mod game;
pub mod platform;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::{QualityPreset, Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
///
/// Every speed is in units per tick and every lifetime in ticks, so the
/// simulation is independent of frame timing.
pub mod consts {
    /// Default viewport when the host cannot report one
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;

    /// Player movement per tick while a direction is held
    pub const PLAYER_STEP: f32 = 4.0;
    /// Minimum distance between the player and any canvas edge
    pub const PLAYER_EDGE_MARGIN: f32 = 20.0;
    /// Player spawn height above the bottom edge
    pub const PLAYER_SPAWN_OFFSET_Y: f32 = 80.0;

    /// Bullet speed (units per tick)
    pub const BULLET_SPEED: f32 = 14.0;
    /// Bullets are culled once they leave the viewport by this margin
    pub const BULLET_CULL_MARGIN: f32 = 10.0;
    /// Added to the enemy radius for the bullet hit test
    pub const BULLET_HIT_PADDING: f32 = 5.0;
    /// Minimum time between shots (milliseconds, wall clock)
    pub const FIRE_COOLDOWN_MS: f64 = 200.0;

    /// Enemies below `height + ENEMY_ESCAPE_MARGIN` have escaped
    pub const ENEMY_ESCAPE_MARGIN: f32 = 60.0;
    /// Spawn x is kept this far from the side walls
    pub const ENEMY_SPAWN_MARGIN_X: f32 = 30.0;
    /// Spawn y range above the visible area
    pub const ENEMY_SPAWN_Y_MIN: f32 = -240.0;
    pub const ENEMY_SPAWN_Y_MAX: f32 = -40.0;

    /// Lives at the start of a run
    pub const START_LIVES: u32 = 3;
    /// Consecutive empty ticks before the next wave spawns
    pub const WAVE_SETTLE_TICKS: u32 = 60;
    /// Enemies per wave: base + per_wave * wave
    pub const WAVE_BASE_ENEMIES: usize = 4;
    pub const WAVE_ENEMIES_PER_WAVE: usize = 2;

    /// Particle velocity multiplier applied every tick
    pub const PARTICLE_DRAG: f32 = 0.95;
    pub const PARTICLE_MAX_LIFE: f32 = 50.0;
    /// Escape bursts are emitted this far above the bottom edge
    pub const ESCAPE_BURST_OFFSET_Y: f32 = 20.0;

    /// Player color (bullets, muzzle flash)
    pub const PLAYER_COLOR: u32 = 0x00ffff;
}

/// Unit direction from `from` toward `to`.
///
/// A zero-length aim (cursor on top of the player) fires straight up
/// instead of producing a non-finite direction.
#[inline]
pub fn aim_direction(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    let dist = delta.length();
    if dist > 0.0 && dist.is_finite() {
        delta / dist
    } else {
        Vec2::NEG_Y
    }
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aim_direction_normalizes() {
        let dir = aim_direction(Vec2::new(10.0, 10.0), Vec2::new(13.0, 14.0));
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!((dir.x - 0.6).abs() < 1e-6);
        assert!((dir.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_aim_direction_zero_length_is_finite() {
        let p = Vec2::new(400.0, 520.0);
        let dir = aim_direction(p, p);
        assert!(dir.is_finite());
        assert_eq!(dir, Vec2::NEG_Y);
    }
}
