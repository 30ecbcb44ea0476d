//! Countdown tick driver task

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::{AppState, TimerPhase};

/// Drives the engine's one-second countdown while the timer is running.
///
/// The interval only exists while the phase is Running: leaving Running
/// drops it, and a fresh one is created on the next start. At most one
/// tick cadence is ever live and no tick fires outside Running.
pub async fn tick_driver_task(state: Arc<AppState>) {
    info!("Starting tick driver task");

    let mut snapshots = state.subscribe();

    loop {
        // Park until the timer starts running.
        while snapshots.borrow_and_update().phase != TimerPhase::Running {
            if snapshots.changed().await.is_err() {
                debug!("Snapshot channel closed, stopping tick driver");
                return;
            }
        }

        let mut cadence = interval(Duration::from_secs(1));
        cadence.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // An interval yields its first tick immediately; consume it so the
        // first countdown step lands a full second after starting.
        cadence.tick().await;

        loop {
            tokio::select! {
                _ = cadence.tick() => {
                    if let Err(e) = state.tick() {
                        error!("Failed to apply tick: {}", e);
                    }
                }
                changed = snapshots.changed() => {
                    if changed.is_err() {
                        debug!("Snapshot channel closed, stopping tick driver");
                        return;
                    }
                    if snapshots.borrow_and_update().phase != TimerPhase::Running {
                        debug!("Timer left the running phase, dropping tick cadence");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentChime;
    use crate::state::{TimerMode, TimerSettings};

    fn test_state(settings: TimerSettings) -> Arc<AppState> {
        Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            settings,
            Arc::new(SilentChime),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_arrive_once_per_second_only_while_running() {
        let state = test_state(TimerSettings {
            sound_enabled: false,
            ..TimerSettings::default()
        });
        tokio::spawn(tick_driver_task(Arc::clone(&state)));
        tokio::task::yield_now().await;

        // Idle: no ticks at all.
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(state.snapshot().remaining_seconds, 1500);

        // Running: one decrement per second.
        state.toggle().unwrap();
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(state.snapshot().remaining_seconds, 1497);

        // Paused: the cadence is gone, not merely ignored.
        state.toggle().unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(state.snapshot().remaining_seconds, 1497);

        // Resuming rebuilds the cadence; the next step lands a full
        // second later.
        state.toggle().unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(state.snapshot().remaining_seconds, 1496);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_rolls_through_completion_into_the_break() {
        let state = test_state(TimerSettings {
            focus_minutes: 1,
            break_minutes: 5,
            auto_start_break: true,
            auto_start_focus: true,
            sound_enabled: false,
            count_up: false,
        });
        tokio::spawn(tick_driver_task(Arc::clone(&state)));
        tokio::task::yield_now().await;

        state.toggle().unwrap();
        tokio::time::sleep(Duration::from_millis(61_500)).await;

        // The 60th tick completed the focus session and auto-started the
        // break; the 61st already counted the break down by one.
        let snapshot = state.snapshot();
        assert_eq!(snapshot.mode, TimerMode::Break);
        assert_eq!(snapshot.phase, TimerPhase::Running);
        assert_eq!(snapshot.remaining_seconds, 299);
    }

    #[tokio::test(start_paused = true)]
    async fn no_ticks_while_waiting_for_acknowledgment() {
        let state = test_state(TimerSettings {
            focus_minutes: 1,
            break_minutes: 5,
            auto_start_break: false,
            auto_start_focus: true,
            sound_enabled: false,
            count_up: false,
        });
        tokio::spawn(tick_driver_task(Arc::clone(&state)));
        tokio::task::yield_now().await;

        state.toggle().unwrap();
        tokio::time::sleep(Duration::from_millis(60_500)).await;

        let snapshot = state.snapshot();
        assert_eq!(snapshot.phase, TimerPhase::Finished);
        assert_eq!(snapshot.remaining_seconds, 300);

        // The staged break must not count down while unacknowledged.
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(state.snapshot().remaining_seconds, 300);

        state.toggle().unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(state.snapshot().remaining_seconds, 298);
    }
}
