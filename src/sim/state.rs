//! Game state and run lifecycle
//!
//! `GameState` exclusively owns every per-run collection. Nothing outside the
//! simulation keeps a long-lived reference into it; readers get a `Frame`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Bullet, Enemy, EnemyKind, IdAllocator, Particle, Player};
use super::phase::GamePhase;
use super::snapshot::StatusSnapshot;
use super::spawner::{Burst, spawn_particles, spawn_wave};
use crate::aim_direction;
use crate::consts::*;

/// Current canvas size in simulation units. Set by the host on resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Where the player (re)appears: centered, near the bottom
    pub fn player_spawn(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height - PLAYER_SPAWN_OFFSET_Y)
    }
}

/// Default cosmetic particle cap
pub const MAX_PARTICLES: usize = 2000;

/// Complete simulation state for one game instance
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Score
    pub score: u64,
    /// Current wave (1-based)
    pub wave: u32,
    /// Player lives
    pub lives: u32,
    /// Consecutive active ticks with no live enemies
    pub wave_timer: u32,
    /// Active simulation ticks this run
    pub time_ticks: u64,
    /// Canvas size, re-read on every spawn and boundary check
    pub viewport: Viewport,
    /// Player ship
    pub player: Player,
    /// Live enemies (spawn order)
    pub enemies: Vec<Enemy>,
    /// Live bullets (fire order)
    pub bullets: Vec<Bullet>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Upper bound on live particles
    pub particle_cap: usize,
    rng: Pcg32,
    ids: IdAllocator,
}

impl GameState {
    /// Create an unstarted game with the given seed
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        Self {
            seed,
            phase: GamePhase::NotStarted,
            score: 0,
            wave: 1,
            lives: START_LIVES,
            wave_timer: 0,
            time_ticks: 0,
            viewport,
            player: Player::new(viewport.player_spawn()),
            enemies: Vec::new(),
            bullets: Vec::new(),
            particles: Vec::new(),
            particle_cap: MAX_PARTICLES,
            rng: Pcg32::seed_from_u64(seed),
            ids: IdAllocator::new(),
        }
    }

    pub fn with_particle_cap(mut self, cap: usize) -> Self {
        self.particle_cap = cap;
        self
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.next_id()
    }

    /// Start (or restart) a run: full reset, then spawn wave 1.
    ///
    /// The RNG and id allocator carry over, so ids stay unique across runs
    /// and a restart does not replay the previous run.
    pub fn start(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.wave = 1;
        self.lives = START_LIVES;
        self.wave_timer = 0;
        self.time_ticks = 0;
        self.enemies.clear();
        self.bullets.clear();
        self.particles.clear();
        self.player = Player::new(self.viewport.player_spawn());
        self.spawn_wave();
    }

    /// Toggle Playing/Paused. No-op before start and after game over.
    pub fn toggle_pause(&mut self) -> GamePhase {
        self.phase = self.phase.toggled_pause();
        self.phase
    }

    /// Resize the play area. The player is re-centered like a fresh spawn.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        self.player.pos = self.viewport.player_spawn();
    }

    /// Fire a bullet from the player toward `target`.
    ///
    /// Dropped unless the game is playing. Rate limiting happens in the input
    /// layer before this is called.
    pub fn fire(&mut self, target: Vec2) -> Option<u32> {
        if !self.phase.is_simulating() {
            return None;
        }
        let origin = self.player.pos;
        let id = self.next_entity_id();
        self.bullets.push(Bullet {
            id,
            pos: origin,
            vel: aim_direction(origin, target) * BULLET_SPEED,
        });
        self.emit(Burst::Fire, origin, PLAYER_COLOR);
        Some(id)
    }

    /// Append the next wave to the live set
    pub(crate) fn spawn_wave(&mut self) -> usize {
        let enemies = spawn_wave(&mut self.rng, &mut self.ids, self.wave, self.viewport);
        let count = enemies.len();
        self.enemies.extend(enemies);
        count
    }

    /// Emit a particle burst
    pub(crate) fn emit(&mut self, burst: Burst, at: Vec2, color: u32) {
        spawn_particles(
            &mut self.particles,
            &mut self.rng,
            &mut self.ids,
            at,
            color,
            burst.count(),
            self.particle_cap,
        );
    }

    /// Charge one life. Returns true if this ended the run.
    pub(crate) fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 && self.phase.is_simulating() {
            self.phase = self.phase.after_last_life();
            return true;
        }
        false
    }

    /// Credit a kill. Returns the points awarded.
    pub(crate) fn award_kill(&mut self, kind: EnemyKind) -> u64 {
        let points = kind.kill_score(self.wave);
        self.score += points;
        points
    }

    /// HUD values
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            score: self.score,
            wave: self.wave,
            lives: self.lives,
            started: self.phase.started(),
            paused: self.phase.paused(),
            game_over: self.phase.game_over(),
        }
    }

    /// Id the allocator hands out next (every existing id is below it)
    pub fn id_watermark(&self) -> u32 {
        self.ids.peek()
    }
}
