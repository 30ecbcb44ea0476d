//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{error, info};

use crate::state::{AppState, TimerSettings};

use super::responses::{ApiResponse, HealthResponse, StatusResponse, TimerView};

/// Handle POST /toggle - start, pause, or acknowledge the timer
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.toggle() {
        Ok(snapshot) => {
            info!(
                "Toggle endpoint called - timer is now {} in {} mode",
                snapshot.phase.as_str(),
                snapshot.mode.as_str()
            );
            Ok(Json(ApiResponse::for_snapshot(
                "Timer toggled".to_string(),
                &snapshot,
            )))
        }
        Err(e) => {
            error!("Failed to toggle timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - back to an idle focus session
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.reset() {
        Ok(snapshot) => {
            info!("Reset endpoint called - timer back to idle focus");
            Ok(Json(ApiResponse::for_snapshot(
                "Timer reset".to_string(),
                &snapshot,
            )))
        }
        Err(e) => {
            error!("Failed to reset timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /settings - current timer settings
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> Json<TimerSettings> {
    Json(state.snapshot().settings)
}

/// Handle PUT /settings - replace the timer settings
///
/// Durations are clamped here, before the engine sees them; the engine
/// itself accepts any pre-validated settings as total input.
pub async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TimerSettings>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let settings = payload.clamped();

    match state.update_settings(settings) {
        Ok(snapshot) => {
            info!(
                "Settings endpoint called - focus={}min, break={}min",
                snapshot.settings.focus_minutes, snapshot.settings.break_minutes
            );
            Ok(Json(ApiResponse::for_snapshot(
                "Settings updated".to_string(),
                &snapshot,
            )))
        }
        Err(e) => {
            error!("Failed to update settings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - full view for the display collaborator
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let snapshot = state.snapshot();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: TimerView::from(&snapshot),
        settings: snapshot.settings,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
