//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod phase;
pub mod physics;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{CollisionOutcome, Impact, bullet_hits_enemy, resolve_bullet_hits};
pub use entity::{Bullet, Enemy, EnemyKind, EnemyStats, IdAllocator, Particle, Player};
pub use phase::GamePhase;
pub use physics::{Escape, Movement};
pub use snapshot::{Frame, NullPresenter, Presenter, StatusSnapshot};
pub use spawner::{Burst, spawn_particles, spawn_wave, wave_size};
pub use state::{GameState, MAX_PARTICLES, Viewport};
pub use tick::{GameEvent, TickInput, tick};
