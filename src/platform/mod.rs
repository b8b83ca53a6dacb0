//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key set, pointer, fire rate limit)
//! - Time (monotonic clock)

pub mod input;
pub mod time;

pub use input::{FireGate, InputState, Key};
#[cfg(target_arch = "wasm32")]
pub use time::PerformanceClock;
pub use time::{Clock, ManualClock};
