//! Completion alert task
//!
//! While the timer sits in the finished phase waiting to be
//! acknowledged, the completion tone repeats. The loop lives outside the
//! engine: it only observes published snapshots, and the watch channel
//! cancels it the instant toggle() moves the phase on.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::audio::Tone;
use crate::state::{AppState, TimerPhase};

/// Repeat cadence for the unacknowledged-completion tone.
const ALERT_PERIOD: Duration = Duration::from_millis(2500);

pub async fn finish_alert_task(state: Arc<AppState>) {
    info!("Starting finish alert task");

    let mut snapshots = state.subscribe();

    loop {
        // Park until a completion goes unacknowledged.
        while snapshots.borrow_and_update().phase != TimerPhase::Finished {
            if snapshots.changed().await.is_err() {
                debug!("Snapshot channel closed, stopping finish alert task");
                return;
            }
        }

        // The first interval tick fires immediately, so the tone plays
        // right as the finished phase is entered, then every period.
        let mut cadence = interval(ALERT_PERIOD);
        cadence.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cadence.tick() => {
                    // Re-read each repeat so muting mid-alert takes effect.
                    if snapshots.borrow().settings.sound_enabled {
                        state.request_tone(Tone::Complete);
                    }
                }
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        debug!("Snapshot channel closed, stopping finish alert task");
                        return;
                    }
                    if snapshots.borrow_and_update().phase != TimerPhase::Finished {
                        debug!("Completion acknowledged, stopping alert tone");
                        break;
                    }
                }
            }
        }
    }
}
