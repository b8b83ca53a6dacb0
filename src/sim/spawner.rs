//! Enemy waves and particle bursts

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::entity::{Enemy, EnemyKind, IdAllocator, Particle};
use super::state::Viewport;
use crate::consts::*;
use crate::direction_from_angle;

/// Particle burst sizes, one per gameplay event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Burst {
    /// Muzzle flash at the player
    Fire,
    /// Bullet struck an enemy
    Hit,
    /// Enemy left through the bottom edge
    Escape,
    /// Enemy destroyed
    Kill,
}

impl Burst {
    pub fn count(self) -> usize {
        match self {
            Burst::Fire => 3,
            Burst::Hit => 5,
            Burst::Escape => 12,
            Burst::Kill => 15,
        }
    }
}

/// Number of enemies in wave `wave`
pub fn wave_size(wave: u32) -> usize {
    WAVE_BASE_ENEMIES + WAVE_ENEMIES_PER_WAVE * wave as usize
}

/// Kinds a wave draws from. Drones are listed twice to double their weight;
/// tanks only appear after the first wave.
fn kind_pool(wave: u32) -> &'static [EnemyKind] {
    const FIRST_WAVE: [EnemyKind; 3] = [EnemyKind::Drone, EnemyKind::Drone, EnemyKind::Speeder];
    const LATER_WAVES: [EnemyKind; 4] = [
        EnemyKind::Drone,
        EnemyKind::Drone,
        EnemyKind::Speeder,
        EnemyKind::Tank,
    ];
    if wave > 1 { &LATER_WAVES } else { &FIRST_WAVE }
}

/// Generate the enemies for `wave`. The caller appends them to the live set.
///
/// Positions are derived from the viewport passed in, never cached.
pub fn spawn_wave<R: Rng + ?Sized>(
    rng: &mut R,
    ids: &mut IdAllocator,
    wave: u32,
    viewport: Viewport,
) -> Vec<Enemy> {
    let pool = kind_pool(wave);
    let count = wave_size(wave);
    let spawn_span = viewport.width - 2.0 * ENEMY_SPAWN_MARGIN_X;
    let y_span = ENEMY_SPAWN_Y_MAX - ENEMY_SPAWN_Y_MIN;

    (0..count)
        .map(|_| {
            let kind = pool[rng.random_range(0..pool.len())];
            let speed = kind.stats().speed;

            let x = rng.random::<f32>() * spawn_span + ENEMY_SPAWN_MARGIN_X;
            let y = ENEMY_SPAWN_Y_MAX - rng.random::<f32>() * y_span;
            let vx = (rng.random::<f32>() - 0.5) * speed * 0.5;
            let vy = speed + rng.random::<f32>() * 0.5;

            Enemy::new(ids.next_id(), kind, Vec2::new(x, y), Vec2::new(vx, vy))
        })
        .collect()
}

/// Append `count` particles spread evenly around a circle at `at`.
///
/// The RNG is drawn for every particle even when `cap` drops some, so the
/// gameplay RNG stream does not depend on particle quality settings.
pub fn spawn_particles<R: Rng + ?Sized>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    ids: &mut IdAllocator,
    at: Vec2,
    color: u32,
    count: usize,
    cap: usize,
) {
    for i in 0..count {
        let angle = TAU * i as f32 / count as f32 + rng.random::<f32>() * 0.5;
        let speed = 1.5 + rng.random::<f32>() * 3.0;
        let life = 30.0 + rng.random::<f32>() * 20.0;
        let size = 2.0 + rng.random::<f32>() * 3.0;

        if particles.len() >= cap {
            continue;
        }
        particles.push(Particle {
            id: ids.next_id(),
            pos: at,
            vel: direction_from_angle(angle) * speed,
            life,
            max_life: PARTICLE_MAX_LIFE,
            color,
            size,
        });
    }
}
