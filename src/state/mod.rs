//! State management module
//!
//! This module contains the timer state machine and its shared wrapper.

pub mod app_state;
pub mod engine;
pub mod settings;

// Re-export main types
pub use app_state::{AppState, EngineSnapshot};
pub use engine::{NextUp, TimerEngine, TimerMode, TimerPhase, ToneRequests};
pub use settings::TimerSettings;
