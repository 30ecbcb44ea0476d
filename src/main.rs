//! Stay Focused - A state-managed HTTP server driving a focus/break interval timer
//!
//! This is the main entry point for the stay-focused application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use stay_focused::{
    api::create_router,
    audio::{check_player_available, Chime, PlayerChime, SilentChime},
    config::Config,
    state::AppState,
    tasks::{finish_alert_task, keep_awake_task, tick_driver_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "stay_focused={},tower_http=info",
            config.log_level()
        ))
        .init();

    let settings = config.initial_settings();

    info!("Starting stay-focused server v1.0.0");
    info!(
        "Configuration: host={}, port={}, focus={}min, break={}min",
        config.host, config.port, settings.focus_minutes, settings.break_minutes
    );

    // Tone playback is optional; the timer itself is not. Fall back to
    // silence if the configured player cannot be spawned.
    let chime: Arc<dyn Chime> = match check_player_available(&config.player).await {
        Ok(()) => Arc::new(PlayerChime::new(config.player.clone())),
        Err(e) => {
            warn!("{}", e);
            warn!("Continuing without tones");
            Arc::new(SilentChime)
        }
    };

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        settings,
        chime,
    ));

    // Background tasks own every timed resource: the one-second tick
    // cadence, the repeating completion alert, the sleep inhibitor.
    tokio::spawn(tick_driver_task(Arc::clone(&state)));
    tokio::spawn(finish_alert_task(Arc::clone(&state)));
    if config.keep_awake {
        tokio::spawn(keep_awake_task(Arc::clone(&state)));
    }

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /toggle   - Start, pause, or acknowledge the timer");
    info!("  POST /reset    - Back to an idle focus session");
    info!("  GET  /settings - Current timer settings");
    info!("  PUT  /settings - Replace timer settings");
    info!("  GET  /status   - Timer phase, mode, and display values");
    info!("  GET  /health   - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
