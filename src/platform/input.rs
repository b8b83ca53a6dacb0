//! Input state shared between event handlers and the tick
//!
//! Event callbacks only do last-value-wins writes here: a key set, a pointer
//! position and a fire timestamp. The tick samples the current values.

use std::collections::HashSet;

use glam::Vec2;

use crate::consts::FIRE_COOLDOWN_MS;
use crate::sim::{Movement, TickInput};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Pause,
}

impl Key {
    /// Map a DOM-style key name (`KeyboardEvent.key`), case-insensitive
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "a" | "arrowleft" => Some(Key::Left),
            "d" | "arrowright" => Some(Key::Right),
            "w" | "arrowup" => Some(Key::Up),
            "s" | "arrowdown" => Some(Key::Down),
            "p" | "escape" => Some(Key::Pause),
            _ => None,
        }
    }

    pub fn is_movement(self) -> bool {
        !matches!(self, Key::Pause)
    }
}

/// Minimum spacing between shots, checked when the click arrives
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireGate {
    cooldown_ms: f64,
    last_shot_ms: Option<f64>,
}

impl Default for FireGate {
    fn default() -> Self {
        Self::new(FIRE_COOLDOWN_MS)
    }
}

impl FireGate {
    pub fn new(cooldown_ms: f64) -> Self {
        Self {
            cooldown_ms,
            last_shot_ms: None,
        }
    }

    /// Whether a shot at `now_ms` would pass, without consuming it
    pub fn ready(&self, now_ms: f64) -> bool {
        self.last_shot_ms
            .is_none_or(|last| now_ms - last >= self.cooldown_ms)
    }

    /// Consume a shot if the cooldown has elapsed
    pub fn try_fire(&mut self, now_ms: f64) -> bool {
        if !self.ready(now_ms) {
            return false;
        }
        self.last_shot_ms = Some(now_ms);
        true
    }
}

/// Latest input values
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    pointer: Vec2,
    fire_gate: FireGate,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns the mapped key so the caller can react to
    /// one-shot keys such as pause.
    pub fn key_down(&mut self, name: &str) -> Option<Key> {
        let key = Key::from_key_name(name)?;
        if key.is_movement() {
            self.held.insert(key);
        }
        Some(key)
    }

    pub fn key_up(&mut self, name: &str) -> Option<Key> {
        let key = Key::from_key_name(name)?;
        self.held.remove(&key);
        Some(key)
    }

    /// Forget every held key (focus lost)
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn set_pointer(&mut self, pos: Vec2) {
        self.pointer = pos;
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn fire_gate(&mut self) -> &mut FireGate {
        &mut self.fire_gate
    }

    pub fn movement(&self) -> Movement {
        Movement {
            left: self.is_held(Key::Left),
            right: self.is_held(Key::Right),
            up: self.is_held(Key::Up),
            down: self.is_held(Key::Down),
        }
    }

    /// Sample for the next tick
    pub fn sample(&self) -> TickInput {
        TickInput {
            movement: self.movement(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_key_name("W"), Some(Key::Up));
        assert_eq!(Key::from_key_name("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_key_name("s"), Some(Key::Down));
        assert_eq!(Key::from_key_name("ArrowRight"), Some(Key::Right));
        assert_eq!(Key::from_key_name("Escape"), Some(Key::Pause));
        assert_eq!(Key::from_key_name("p"), Some(Key::Pause));
        assert_eq!(Key::from_key_name("x"), None);
    }

    #[test]
    fn test_held_keys_become_movement() {
        let mut input = InputState::new();
        input.key_down("a");
        input.key_down("ArrowUp");
        let m = input.sample().movement;
        assert!(m.left && m.up && !m.right && !m.down);

        input.key_up("A");
        assert!(!input.movement().left);
        input.release_all();
        assert!(input.movement().is_idle());
    }

    #[test]
    fn test_pause_key_not_held() {
        let mut input = InputState::new();
        assert_eq!(input.key_down("p"), Some(Key::Pause));
        assert!(!input.is_held(Key::Pause));
    }

    #[test]
    fn test_fire_gate_cooldown() {
        let mut gate = FireGate::default();
        assert!(gate.try_fire(0.0));
        assert!(!gate.try_fire(150.0));
        assert!(!gate.try_fire(199.9));
        assert!(gate.try_fire(200.0));
        assert!(!gate.try_fire(399.0));
        assert!(gate.try_fire(1000.0));
    }

    #[test]
    fn test_rejected_shot_does_not_reset_cooldown() {
        let mut gate = FireGate::default();
        assert!(gate.try_fire(1000.0));
        assert!(!gate.try_fire(1100.0));
        assert!(gate.try_fire(1200.0));
    }
}
