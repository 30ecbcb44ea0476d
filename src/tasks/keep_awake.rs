//! System keep-awake task
//!
//! The daemon equivalent of a screen wake lock: while a session is
//! counting down or an unacknowledged completion is alerting, a
//! systemd-inhibit child is held open so the machine does not idle into
//! suspension. The child is killed the moment the timer goes idle or
//! pauses.

use std::process::Stdio;
use std::sync::Arc;

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::state::{AppState, TimerPhase};

fn wants_inhibit(phase: TimerPhase) -> bool {
    matches!(phase, TimerPhase::Running | TimerPhase::Finished)
}

pub async fn keep_awake_task(state: Arc<AppState>) {
    info!("Starting keep-awake task");

    let mut snapshots = state.subscribe();
    let mut inhibitor: Option<Child> = None;

    loop {
        let phase = snapshots.borrow_and_update().phase;

        if wants_inhibit(phase) {
            if inhibitor.is_none() {
                match spawn_inhibitor() {
                    Ok(child) => {
                        debug!("Acquired sleep inhibitor");
                        inhibitor = Some(child);
                    }
                    Err(e) => warn!("Failed to acquire sleep inhibitor: {}", e),
                }
            }
        } else if let Some(mut child) = inhibitor.take() {
            if let Err(e) = child.kill().await {
                warn!("Failed to release sleep inhibitor: {}", e);
            } else {
                debug!("Released sleep inhibitor");
            }
        }

        if snapshots.changed().await.is_err() {
            // Server shutting down; release on the way out.
            if let Some(mut child) = inhibitor.take() {
                let _ = child.kill().await;
            }
            return;
        }
    }
}

fn spawn_inhibitor() -> std::io::Result<Child> {
    Command::new("systemd-inhibit")
        .args([
            "--what=idle:sleep",
            "--who=stay-focused",
            "--why=Focus session in progress",
            "--mode=block",
            "sleep",
            "infinity",
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
}
