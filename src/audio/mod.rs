//! Audio cue module
//!
//! Tone playback lives behind the `Chime` capability so the timer core
//! never owns or constructs an audio device.

pub mod chime;

// Re-export main types
pub use chime::{check_player_available, Chime, PlayerChime, SilentChime, Tone};
