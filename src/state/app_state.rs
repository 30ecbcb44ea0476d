//! Main application state management

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::audio::{Chime, Tone};

use super::engine::{NextUp, TimerEngine, TimerMode, TimerPhase, ToneRequests};
use super::settings::TimerSettings;

/// Action name used for tick applications; ticks are the one mutation
/// that neither shows up in last-action tracking nor supersedes
/// scheduled tones.
const TICK_ACTION: &str = "tick";

/// Immutable view of the engine, published after every mutation. The
/// display reads it, the background tasks select on it.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSnapshot {
    pub phase: TimerPhase,
    pub mode: TimerMode,
    pub remaining_seconds: i64,
    pub display_seconds: i64,
    pub mode_duration_seconds: i64,
    pub next_up: NextUp,
    pub settings: TimerSettings,
}

impl EngineSnapshot {
    fn of(engine: &TimerEngine) -> Self {
        Self {
            phase: engine.phase(),
            mode: engine.mode(),
            remaining_seconds: engine.remaining_seconds(),
            display_seconds: engine.display_seconds(),
            mode_duration_seconds: engine.mode_duration_seconds(),
            next_up: engine.next_up(),
            settings: engine.settings().clone(),
        }
    }
}

/// Main application state: the timer engine plus everything the HTTP
/// shell and background tasks need to observe it.
#[derive(Debug)]
pub struct AppState {
    /// Core state machine; every mutation goes through `apply`
    engine: Mutex<TimerEngine>,
    /// Bumped on every user action and every phase or mode transition.
    /// Deferred tones stamped with an older generation never fire.
    generation: AtomicU64,
    /// Tone playback capability, injected at construction
    chime: Arc<dyn Chime>,
    /// Snapshot channel driving the background tasks and display reads
    snapshot_tx: watch::Sender<EngineSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _snapshot_rx: watch::Receiver<EngineSnapshot>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    pub fn new(port: u16, host: String, settings: TimerSettings, chime: Arc<dyn Chime>) -> Self {
        let engine = TimerEngine::new(settings);
        let (snapshot_tx, snapshot_rx) = watch::channel(EngineSnapshot::of(&engine));

        Self {
            engine: Mutex::new(engine),
            generation: AtomicU64::new(0),
            chime,
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Run one engine operation and fan out its consequences: generation
    /// bump, last-action tracking, snapshot publication, tone dispatch.
    pub fn apply<F>(self: &Arc<Self>, action: &str, f: F) -> Result<EngineSnapshot, String>
    where
        F: FnOnce(&mut TimerEngine) -> ToneRequests,
    {
        let (requests, before, snapshot) = {
            let mut engine = self
                .engine
                .lock()
                .map_err(|e| format!("Failed to lock timer engine: {}", e))?;
            let before = (engine.phase(), engine.mode());
            let requests = f(&mut engine);
            (requests, before, EngineSnapshot::of(&engine))
        };

        let transitioned = before != (snapshot.phase, snapshot.mode);
        let user_action = action != TICK_ACTION;

        // Plain countdown ticks keep scheduled tones alive; any user
        // action or transition supersedes them.
        if user_action || transitioned {
            self.generation.fetch_add(1, Ordering::SeqCst);
        }

        if user_action {
            if let Ok(mut last_action) = self.last_action.lock() {
                *last_action = Some(action.to_string());
            }
            if let Ok(mut last_time) = self.last_action_time.lock() {
                *last_time = Some(Utc::now());
            }
        }

        if let Err(e) = self.snapshot_tx.send(snapshot.clone()) {
            warn!("Failed to publish engine snapshot: {}", e);
        }

        for tone in &requests.immediate {
            self.chime.request(*tone);
        }
        if let Some((delay_seconds, tone)) = requests.delayed {
            self.schedule_tone(Duration::from_secs(delay_seconds), tone);
        }

        Ok(snapshot)
    }

    /// Start, pause, or acknowledge the timer.
    pub fn toggle(self: &Arc<Self>) -> Result<EngineSnapshot, String> {
        self.apply("toggle", |engine| engine.toggle())
    }

    /// Back to an idle focus session.
    pub fn reset(self: &Arc<Self>) -> Result<EngineSnapshot, String> {
        self.apply("reset", |engine| engine.reset())
    }

    /// One second of countdown, delivered by the tick driver.
    pub fn tick(self: &Arc<Self>) -> Result<EngineSnapshot, String> {
        self.apply(TICK_ACTION, |engine| engine.tick())
    }

    /// Replace the timer settings (already clamped by the caller).
    pub fn update_settings(
        self: &Arc<Self>,
        settings: TimerSettings,
    ) -> Result<EngineSnapshot, String> {
        self.apply("settings", |engine| engine.apply_settings(settings))
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> EngineSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Subscribe to snapshot publications; used by the background tasks.
    pub fn subscribe(&self) -> watch::Receiver<EngineSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Fire a tone directly, bypassing the engine. Used by the
    /// finish-alert task, which owns the repeating completion tone.
    pub fn request_tone(&self, tone: Tone) {
        self.chime.request(tone);
    }

    /// Play `tone` once `delay` passes, unless any user action or
    /// transition happens in between. Cancel-then-replace for one-shot
    /// callbacks: the stamped generation goes stale the moment the
    /// session it belongs to is superseded.
    fn schedule_tone(self: &Arc<Self>, delay: Duration, tone: Tone) {
        let state = Arc::clone(self);
        let stamped = self.generation.load(Ordering::SeqCst);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if state.generation.load(Ordering::SeqCst) == stamped {
                state.chime.request(tone);
            } else {
                debug!("Dropping stale {:?} tone from a superseded session", tone);
            }
        });
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::chime::RecordingChime;

    fn state_with(settings: TimerSettings) -> (Arc<AppState>, Arc<RecordingChime>) {
        let chime = Arc::new(RecordingChime::default());
        let state = Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            settings,
            chime.clone() as Arc<dyn Chime>,
        ));
        (state, chime)
    }

    fn one_minute_focus() -> TimerSettings {
        TimerSettings {
            focus_minutes: 1,
            break_minutes: 5,
            auto_start_break: true,
            auto_start_focus: true,
            sound_enabled: true,
            count_up: false,
        }
    }

    #[test]
    fn snapshots_follow_mutations() {
        let (state, _) = state_with(TimerSettings::default());
        assert_eq!(state.snapshot().phase, TimerPhase::Idle);

        state.toggle().unwrap();
        assert_eq!(state.snapshot().phase, TimerPhase::Running);

        state.reset().unwrap();
        let snapshot = state.snapshot();
        assert_eq!(snapshot.phase, TimerPhase::Idle);
        assert_eq!(snapshot.mode, TimerMode::Focus);
        assert_eq!(snapshot.remaining_seconds, 1500);
    }

    #[test]
    fn last_action_skips_ticks() {
        let (state, _) = state_with(TimerSettings::default());
        state.toggle().unwrap();
        state.tick().unwrap();

        let (action, time) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("toggle"));
        assert!(time.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_interval_tone_fires_after_completion() {
        let (state, chime) = state_with(one_minute_focus());

        state.toggle().unwrap();
        for _ in 0..60 {
            state.tick().unwrap();
        }
        assert_eq!(state.snapshot().mode, TimerMode::Break);
        assert_eq!(chime.count(Tone::Complete), 1);
        assert_eq!(chime.count(Tone::IntervalStart), 0);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(chime.count(Tone::IntervalStart), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_do_not_invalidate_the_delayed_tone() {
        let (state, chime) = state_with(one_minute_focus());

        state.toggle().unwrap();
        for _ in 0..60 {
            state.tick().unwrap();
        }
        // A plain decrement of the freshly staged break before the delay
        // elapses must not cancel the interval-start tone.
        state.tick().unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(chime.count(Tone::IntervalStart), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_invalidates_the_delayed_tone() {
        let (state, chime) = state_with(one_minute_focus());

        state.toggle().unwrap();
        for _ in 0..60 {
            state.tick().unwrap();
        }
        state.reset().unwrap();

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(chime.count(Tone::IntervalStart), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn settings_edit_invalidates_the_delayed_tone() {
        let (state, chime) = state_with(one_minute_focus());

        state.toggle().unwrap();
        for _ in 0..60 {
            state.tick().unwrap();
        }
        state
            .update_settings(TimerSettings {
                break_minutes: 10,
                ..one_minute_focus()
            })
            .unwrap();

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(chime.count(Tone::IntervalStart), 0);
    }
}
