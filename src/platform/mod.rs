//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard and on-screen controls)
//! - Frame timing

pub mod input;
pub mod time;

pub use input::{InputAction, action_for_control, action_for_key};
pub use time::FrameClock;
