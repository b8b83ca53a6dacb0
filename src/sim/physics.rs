//! Per-tick integration and boundary handling
//!
//! Plain velocity integration: no forces, no momentum on the player.
//! Removals happen through `retain`, never by index while iterating.

use glam::Vec2;

use super::entity::{Bullet, Enemy, Particle, Player};
use super::state::Viewport;
use crate::consts::*;

/// Held movement directions for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Movement {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Movement {
    pub fn is_idle(&self) -> bool {
        !(self.left || self.right || self.up || self.down)
    }
}

/// An enemy that left through the bottom edge this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Escape {
    pub enemy_id: u32,
    /// Last x position (burst location)
    pub x: f32,
    pub color: u32,
}

/// Step the player one fixed increment per held axis, clamped to the edge margin.
///
/// Opposite keys both apply, so holding left and right together cancels out.
pub fn move_player(player: &mut Player, movement: Movement, viewport: Viewport) {
    let max_x = viewport.width - PLAYER_EDGE_MARGIN;
    let max_y = viewport.height - PLAYER_EDGE_MARGIN;
    let pos = &mut player.pos;

    if movement.left {
        pos.x = (pos.x - PLAYER_STEP).max(PLAYER_EDGE_MARGIN);
    }
    if movement.right {
        pos.x = (pos.x + PLAYER_STEP).min(max_x);
    }
    if movement.up {
        pos.y = (pos.y - PLAYER_STEP).max(PLAYER_EDGE_MARGIN);
    }
    if movement.down {
        pos.y = (pos.y + PLAYER_STEP).min(max_y);
    }
}

/// True while `pos` is inside the viewport padded by `margin` on every side
#[inline]
fn inside_padded(pos: Vec2, viewport: Viewport, margin: f32) -> bool {
    pos.x > -margin
        && pos.x < viewport.width + margin
        && pos.y > -margin
        && pos.y < viewport.height + margin
}

/// Move bullets and cull the ones that left the padded viewport
pub fn integrate_bullets(bullets: &mut Vec<Bullet>, viewport: Viewport) {
    bullets.retain_mut(|b| {
        b.pos += b.vel;
        inside_padded(b.pos, viewport, BULLET_CULL_MARGIN)
    });
}

/// Reflect off the side walls: clamp to the wall and flip horizontal velocity.
fn bounce_horizontal(enemy: &mut Enemy, width: f32) {
    if enemy.pos.x < enemy.radius {
        enemy.pos.x = enemy.radius;
        enemy.vel.x = -enemy.vel.x;
    }
    if enemy.pos.x > width - enemy.radius {
        enemy.pos.x = width - enemy.radius;
        enemy.vel.x = -enemy.vel.x;
    }
}

/// Move enemies, bounce them off the side walls and pull out escapees.
///
/// Dying enemies are dropped first. Survivors get their `hit` flash cleared;
/// escaped enemies are returned so the caller can charge a life.
pub fn integrate_enemies(enemies: &mut Vec<Enemy>, viewport: Viewport) -> Vec<Escape> {
    let escape_y = viewport.height + ENEMY_ESCAPE_MARGIN;
    let mut escapes = Vec::new();

    enemies.retain_mut(|e| {
        if e.dying {
            return false;
        }
        e.pos += e.vel;
        bounce_horizontal(e, viewport.width);

        if e.pos.y > escape_y {
            escapes.push(Escape {
                enemy_id: e.id,
                x: e.pos.x,
                color: e.color(),
            });
            return false;
        }
        e.hit = false;
        true
    });

    escapes
}

/// Move particles with drag and age them by one tick
pub fn integrate_particles(particles: &mut Vec<Particle>) {
    particles.retain_mut(|p| {
        p.pos += p.vel;
        p.vel *= PARTICLE_DRAG;
        p.life -= 1.0;
        p.is_alive()
    });
}
