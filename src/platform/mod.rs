//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (monotonic millisecond clock)
//! - Keyboard input mapped to per-tick commands

pub mod input;
pub mod time;

pub use input::KeyboardInput;
pub use time::{Clock, ManualClock};

#[cfg(target_arch = "wasm32")]
pub use time::PerformanceClock;
