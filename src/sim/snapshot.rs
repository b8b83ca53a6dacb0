//! Read-only view handed to the presentation layer
//!
//! The simulation never depends on what a presenter does with a frame and
//! ignores any failure on that side.

use glam::Vec2;
use serde::Serialize;

use super::entity::{Bullet, Enemy, Particle, Player};
use super::phase::GamePhase;
use super::state::{GameState, Viewport};

/// HUD values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub score: u64,
    pub wave: u32,
    pub lives: u32,
    pub started: bool,
    pub paused: bool,
    pub game_over: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Frame<'a> {
    /// Frames presented so far (drives background animation even while paused)
    pub frame: u64,
    pub phase: GamePhase,
    pub status: StatusSnapshot,
    pub viewport: Viewport,
    pub player: Player,
    /// Last pointer position (crosshair)
    pub pointer: Vec2,
    pub enemies: &'a [Enemy],
    pub bullets: &'a [Bullet],
    pub particles: &'a [Particle],
}

impl<'a> Frame<'a> {
    pub fn capture(state: &'a GameState, frame: u64, pointer: Vec2) -> Self {
        Self {
            frame,
            phase: state.phase,
            status: state.status(),
            viewport: state.viewport,
            player: state.player,
            pointer,
            enemies: &state.enemies,
            bullets: &state.bullets,
            particles: &state.particles,
        }
    }

    /// Ship heading in radians, pointing at the crosshair
    pub fn player_heading(&self) -> f32 {
        let d = self.pointer - self.player.pos;
        d.y.atan2(d.x)
    }
}

/// Consumer of simulation frames
pub trait Presenter {
    fn present(&mut self, frame: &Frame<'_>);
}

/// Presenter that draws nothing (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _frame: &Frame<'_>) {}
}

impl<F> Presenter for F
where
    F: FnMut(&Frame<'_>),
{
    fn present(&mut self, frame: &Frame<'_>) {
        self(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_mirrors_state() {
        let mut state = GameState::new(1, Viewport::default());
        state.start();
        let frame = Frame::capture(&state, 42, Vec2::new(1.0, 2.0));
        assert_eq!(frame.frame, 42);
        assert_eq!(frame.phase, GamePhase::Playing);
        assert_eq!(frame.enemies.len(), state.enemies.len());
        assert_eq!(frame.status, state.status());
        assert_eq!(frame.pointer, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_frame_serializes() {
        let mut state = GameState::new(1, Viewport::default());
        state.start();
        let frame = Frame::capture(&state, 1, Vec2::ZERO);
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["status"]["wave"], 1);
        assert_eq!(json["enemies"].as_array().unwrap().len(), 6);
        assert_eq!(json["phase"], "Playing");
    }

    #[test]
    fn test_heading_points_at_pointer() {
        let state = GameState::new(1, Viewport::default());
        let above = state.player.pos - Vec2::new(0.0, 100.0);
        let frame = Frame::capture(&state, 0, above);
        assert!((frame.player_heading() + std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }
}
