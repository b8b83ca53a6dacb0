//! Game phase state machine
//!
//! ```text
//! NotStarted --start--> Playing <--toggle_pause--> Paused
//!                          |
//!                     lives hit 0
//!                          v
//!                      GameOver --start--> Playing
//! ```
//!
//! `start` is a full reset and is accepted from every phase.

use serde::{Deserialize, Serialize};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start
    #[default]
    NotStarted,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended, waiting for restart
    GameOver,
}

impl GamePhase {
    /// Whether physics, collision and spawning run this tick
    pub fn is_simulating(self) -> bool {
        self == GamePhase::Playing
    }

    pub fn started(self) -> bool {
        self != GamePhase::NotStarted
    }

    pub fn paused(self) -> bool {
        self == GamePhase::Paused
    }

    pub fn game_over(self) -> bool {
        self == GamePhase::GameOver
    }

    /// Phase after a pause toggle. No-op before the first start and after game over.
    pub fn toggled_pause(self) -> GamePhase {
        match self {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        }
    }

    /// Phase after the last life is lost. Only an active run can end.
    pub fn after_last_life(self) -> GamePhase {
        match self {
            GamePhase::Playing => GamePhase::GameOver,
            other => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::NotStarted => "NotStarted",
            GamePhase::Playing => "Playing",
            GamePhase::Paused => "Paused",
            GamePhase::GameOver => "GameOver",
        }
    }
}
