//! Bullet/enemy collision detection and resolution
//!
//! Brute force: every live bullet against every live enemy, which is fine at
//! the entity counts a wave produces. Removals are collected into pending id
//! sets during the scan and applied afterwards, so the scan never changes the
//! shape of the collections it walks.

use std::collections::HashSet;

use glam::Vec2;

use super::entity::{Bullet, Enemy, EnemyKind};
use crate::consts::BULLET_HIT_PADDING;

/// True when a bullet at `bullet_pos` strikes an enemy.
///
/// Strict comparison: a distance exactly equal to the threshold is a miss.
#[inline]
pub fn bullet_hits_enemy(bullet_pos: Vec2, enemy_pos: Vec2, enemy_radius: f32) -> bool {
    bullet_pos.distance(enemy_pos) < enemy_radius + BULLET_HIT_PADDING
}

/// Something that happened during the scan, in scan order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Impact {
    /// A bullet struck an enemy at the bullet position
    Hit { at: Vec2, color: u32 },
    /// The struck enemy ran out of hp
    Kill {
        enemy_id: u32,
        at: Vec2,
        color: u32,
        kind: EnemyKind,
    },
}

/// Result of one collision pass
#[derive(Debug, Clone, Default)]
pub struct CollisionOutcome {
    pub bullets_to_remove: HashSet<u32>,
    pub enemies_to_remove: HashSet<u32>,
    pub impacts: Vec<Impact>,
}

impl CollisionOutcome {
    pub fn is_empty(&self) -> bool {
        self.impacts.is_empty()
    }

    /// Kills in scan order
    pub fn kills(&self) -> impl Iterator<Item = (u32, EnemyKind)> + '_ {
        self.impacts.iter().filter_map(|impact| match *impact {
            Impact::Kill { enemy_id, kind, .. } => Some((enemy_id, kind)),
            Impact::Hit { .. } => None,
        })
    }
}

/// Scan all bullet/enemy pairs.
///
/// Enemy hp, `hit` and `dying` are updated in place; nothing is added to or
/// removed from either collection. A bullet is spent on its first hit and an
/// enemy that died earlier in the scan is not matched again.
pub fn resolve_bullet_hits(bullets: &[Bullet], enemies: &mut [Enemy]) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();

    for bullet in bullets {
        for enemy in enemies.iter_mut() {
            if enemy.dying {
                continue;
            }
            if !bullet_hits_enemy(bullet.pos, enemy.pos, enemy.radius) {
                continue;
            }

            outcome.bullets_to_remove.insert(bullet.id);
            let killed = enemy.take_hit();
            outcome.impacts.push(Impact::Hit {
                at: bullet.pos,
                color: enemy.color(),
            });

            if killed {
                outcome.enemies_to_remove.insert(enemy.id);
                outcome.impacts.push(Impact::Kill {
                    enemy_id: enemy.id,
                    at: enemy.pos,
                    color: enemy.color(),
                    kind: enemy.kind,
                });
            }
            break;
        }
    }

    outcome
}

/// Drop everything the scan queued for removal
pub fn apply_removals(bullets: &mut Vec<Bullet>, enemies: &mut Vec<Enemy>, outcome: &CollisionOutcome) {
    if !outcome.bullets_to_remove.is_empty() {
        bullets.retain(|b| !outcome.bullets_to_remove.contains(&b.id));
    }
    if !outcome.enemies_to_remove.is_empty() {
        enemies.retain(|e| !outcome.enemies_to_remove.contains(&e.id));
    }
}
