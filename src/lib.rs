//! Stay Focused - A state-managed HTTP server driving a focus/break interval timer
//!
//! The core is a synchronous timer state machine: a focus/break cycle
//! with pause and reset, live settings edits that keep elapsed time
//! fixed, and auto-advance or acknowledgment at completion. Around it
//! sit an HTTP control surface, tone playback, and background tasks that
//! own every timed resource.

pub mod api;
pub mod audio;
pub mod config;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use audio::{Chime, PlayerChime, SilentChime, Tone};
pub use config::Config;
pub use state::{AppState, TimerEngine, TimerMode, TimerPhase, TimerSettings};
pub use utils::shutdown_signal;
