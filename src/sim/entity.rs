//! Entity definitions
//!
//! Plain data for everything that lives inside a run. The only behavior here
//! is the per-kind stats table and a few accessors.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Hands out entity ids for one simulation instance.
///
/// Ids are never reused within a run, so a stale id from an earlier tick can
/// never alias a live entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity ID
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Id the next call to `next_id` will return
    pub fn peek(&self) -> u32 {
        self.next
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Drone,
    Tank,
    Speeder,
}

/// Fixed per-kind attributes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub hp: u32,
    pub radius: f32,
    pub speed: f32,
    pub score: u64,
    pub color: u32,
}

impl EnemyKind {
    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Drone => EnemyStats {
                hp: 1,
                radius: 18.0,
                speed: 1.2,
                score: 10,
                color: 0x00ffff,
            },
            EnemyKind::Tank => EnemyStats {
                hp: 4,
                radius: 28.0,
                speed: 0.6,
                score: 30,
                color: 0xbf00ff,
            },
            EnemyKind::Speeder => EnemyStats {
                hp: 1,
                radius: 14.0,
                speed: 2.2,
                score: 20,
                color: 0xff00aa,
            },
        }
    }

    /// Points for a kill during `wave`
    pub fn kill_score(self, wave: u32) -> u64 {
        self.stats().score * u64::from(wave)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Drone => "drone",
            EnemyKind::Tank => "tank",
            EnemyKind::Speeder => "speeder",
        }
    }
}

/// The player ship. Never destroyed, only moved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self { pos }
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub hp: u32,
    pub max_hp: u32,
    pub radius: f32,
    /// Took a bullet this tick (render flash)
    pub hit: bool,
    /// Killed, waiting for removal
    pub dying: bool,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, vel: Vec2) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            pos,
            vel,
            hp: stats.hp,
            max_hp: stats.hp,
            radius: stats.radius,
            hit: false,
            dying: false,
        }
    }

    pub fn color(&self) -> u32 {
        self.kind.stats().color
    }

    /// Remaining health in [0, 1] for health bars
    pub fn health_fraction(&self) -> f32 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f32 / self.max_hp as f32
        }
    }

    /// Apply one point of damage. Returns true if this killed the enemy.
    pub fn take_hit(&mut self) -> bool {
        self.hp = self.hp.saturating_sub(1);
        self.hit = true;
        if self.hp == 0 {
            self.dying = true;
        }
        self.dying
    }
}

/// A bullet fired by the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// A particle for visual effects. Never read by gameplay code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in ticks
    pub life: f32,
    pub max_life: f32,
    pub color: u32,
    pub size: f32,
}

impl Particle {
    /// Opacity for rendering: remaining life over max life
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_table() {
        let drone = EnemyKind::Drone.stats();
        assert_eq!((drone.hp, drone.radius, drone.speed, drone.score), (1, 18.0, 1.2, 10));
        let tank = EnemyKind::Tank.stats();
        assert_eq!((tank.hp, tank.radius, tank.speed, tank.score), (4, 28.0, 0.6, 30));
        let speeder = EnemyKind::Speeder.stats();
        assert_eq!(
            (speeder.hp, speeder.radius, speeder.speed, speeder.score),
            (1, 14.0, 2.2, 20)
        );
    }

    #[test]
    fn test_kill_score_scales_with_wave() {
        assert_eq!(EnemyKind::Drone.kill_score(2), 20);
        assert_eq!(EnemyKind::Tank.kill_score(3), 90);
        assert_eq!(EnemyKind::Speeder.kill_score(1), 20);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut ids = IdAllocator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(b > a);
        assert_eq!(ids.peek(), b + 1);
    }

    #[test]
    fn test_tank_takes_four_hits() {
        let mut tank = Enemy::new(1, EnemyKind::Tank, Vec2::ZERO, Vec2::ZERO);
        for _ in 0..3 {
            assert!(!tank.take_hit());
            assert!(tank.hit);
        }
        assert!((tank.health_fraction() - 0.25).abs() < 1e-6);
        assert!(tank.take_hit());
        assert!(tank.dying);
        assert_eq!(tank.hp, 0);
    }

    #[test]
    fn test_particle_alpha() {
        let p = Particle {
            id: 1,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            life: 25.0,
            max_life: 50.0,
            color: 0,
            size: 3.0,
        };
        assert!((p.alpha() - 0.5).abs() < 1e-6);
    }
}
