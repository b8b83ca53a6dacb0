//! Game driver
//!
//! Owns the simulation and the input state and exposes one explicit
//! "advance one frame" step. Any periodic caller can drive it: the browser's
//! animation frame, the headless runner or a test.

use glam::Vec2;

use crate::platform::{Clock, InputState, Key};
use crate::settings::Settings;
use crate::sim::{Frame, GameEvent, GamePhase, GameState, Presenter, Viewport, tick};

/// Game instance holding all state
#[derive(Debug)]
pub struct Game<C: Clock> {
    state: GameState,
    input: InputState,
    clock: C,
    frames: u64,
    running: bool,
}

impl<C: Clock> Game<C> {
    pub fn new(state: GameState, clock: C) -> Self {
        Self {
            state,
            input: InputState::new(),
            clock,
            frames: 0,
            running: true,
        }
    }

    /// Build an unstarted game from user settings
    pub fn from_settings(settings: &Settings, viewport: Viewport, clock: C) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        let state = GameState::new(seed, viewport).with_particle_cap(settings.max_particles());
        log::info!(
            "Game initialized with seed: {} ({}x{}, particle cap {})",
            seed,
            viewport.width,
            viewport.height,
            state.particle_cap
        );
        Self::new(state, clock)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Start or restart a run
    pub fn start(&mut self) {
        let restart = self.state.phase.started();
        self.state.start();
        log::info!(
            "{} run: wave 1 with {} enemies",
            if restart { "Restarted" } else { "Started" },
            self.state.enemies.len()
        );
    }

    pub fn toggle_pause(&mut self) -> GamePhase {
        let before = self.state.phase;
        let after = self.state.toggle_pause();
        if before != after {
            log::info!("{} -> {}", before.as_str(), after.as_str());
        }
        after
    }

    /// Key pressed. Pause is edge-triggered; movement keys are held.
    pub fn key_down(&mut self, name: &str) {
        if self.input.key_down(name) == Some(Key::Pause) {
            self.toggle_pause();
        }
    }

    pub fn key_up(&mut self, name: &str) {
        self.input.key_up(name);
    }

    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.input.set_pointer(pos);
    }

    /// Fire toward `target`.
    ///
    /// Clicks outside active play are ignored without touching the cooldown.
    /// Returns the new bullet id, or `None` if the click was dropped.
    pub fn click(&mut self, target: Vec2) -> Option<u32> {
        self.input.set_pointer(target);
        if !self.state.phase.is_simulating() {
            return None;
        }
        let now = self.clock.now_ms();
        if !self.input.fire_gate().try_fire(now) {
            return None;
        }
        self.state.fire(target)
    }

    /// Window lost focus: drop held keys and pause an active run
    pub fn focus_lost(&mut self) {
        self.input.release_all();
        if self.state.phase == GamePhase::Playing {
            self.toggle_pause();
            log::info!("Auto-paused (focus lost)");
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    /// Read-only view of the current state
    pub fn frame(&self) -> Frame<'_> {
        Frame::capture(&self.state, self.frames, self.input.pointer())
    }

    /// Run one frame: at most one simulation tick, then hand the result to
    /// `presenter`. Returns false once the game has been shut down.
    pub fn advance<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> bool {
        if !self.running {
            return false;
        }
        self.frames += 1;

        let events = tick(&mut self.state, &self.input.sample());
        for event in &events {
            log_event(event);
        }

        presenter.present(&self.frame());
        true
    }

    /// Stop ticking. Later `advance` calls do nothing.
    pub fn shutdown(&mut self) {
        if self.running {
            self.running = false;
            log::info!("Game shut down after {} frames", self.frames);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

fn log_event(event: &GameEvent) {
    match *event {
        GameEvent::EnemyKilled {
            enemy_id,
            kind,
            points,
        } => log::debug!("Enemy {} ({}) destroyed: +{}", enemy_id, kind.as_str(), points),
        GameEvent::LifeLost {
            enemy_id,
            remaining,
        } => log::debug!("Enemy {} escaped, {} lives left", enemy_id, remaining),
        GameEvent::GameOver { score, wave } => {
            log::info!("Game over at wave {} with score {}", wave, score)
        }
        GameEvent::WaveStarted { wave, enemies } => {
            log::info!("Wave {} started with {} enemies", wave, enemies)
        }
    }
}
