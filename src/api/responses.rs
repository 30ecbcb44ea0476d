//! API response structures

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::{EngineSnapshot, NextUp, TimerMode, TimerPhase, TimerSettings};

/// Timer view embedded in action and status responses.
#[derive(Debug, Clone, Serialize)]
pub struct TimerView {
    pub phase: TimerPhase,
    pub mode: TimerMode,
    pub remaining_seconds: i64,
    pub display_seconds: i64,
    pub mode_duration_seconds: i64,
    pub next_up: NextUp,
}

impl From<&EngineSnapshot> for TimerView {
    fn from(snapshot: &EngineSnapshot) -> Self {
        Self {
            phase: snapshot.phase,
            mode: snapshot.mode,
            remaining_seconds: snapshot.remaining_seconds,
            display_seconds: snapshot.display_seconds,
            mode_duration_seconds: snapshot.mode_duration_seconds,
            next_up: snapshot.next_up,
        }
    }
}

/// API response structure for state change endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl ApiResponse {
    /// Create a response whose status reflects the resulting phase.
    pub fn for_snapshot(message: String, snapshot: &EngineSnapshot) -> Self {
        Self {
            status: snapshot.phase.as_str().to_string(),
            message,
            timestamp: Utc::now(),
            timer: TimerView::from(snapshot),
        }
    }
}

/// Enhanced status response for the display collaborator
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub settings: TimerSettings,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: "1.0.0".to_string(),
        }
    }
}
