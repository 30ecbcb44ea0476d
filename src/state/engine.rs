//! Core focus/break timer state machine
//!
//! The engine is synchronous and performs no I/O. Operations mutate the
//! (phase, mode, remaining) triple and return the tones the shell should
//! play; every timed resource (tick cadence, deferred tones, the alert
//! loop) lives in the `tasks` module.

use serde::{Deserialize, Serialize};

use crate::audio::Tone;

use super::settings::TimerSettings;

/// Delay before the interval-start tone of an auto-started break, so it
/// lands after the completion tone instead of on top of it.
const INTERVAL_TONE_DELAY_SECONDS: u64 = 1;

/// Which half of the focus/break cycle the countdown belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Focus,
    Break,
}

impl TimerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::Break => "break",
        }
    }
}

/// Lifecycle of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    /// Not started; the counter always holds the full mode duration
    Idle,
    /// Counting down, one second per tick
    Running,
    /// Suspended mid-session, counter frozen
    Paused,
    /// Completed and waiting for acknowledgment; the next session is
    /// already staged
    Finished,
}

impl TimerPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::Finished => "finished",
        }
    }
}

/// Tones requested by a single engine operation.
///
/// `delayed` carries at most one tone to play after the given number of
/// seconds; it is subject to generation-based invalidation in `AppState`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToneRequests {
    pub immediate: Vec<Tone>,
    pub delayed: Option<(u64, Tone)>,
}

impl ToneRequests {
    fn none() -> Self {
        Self::default()
    }

    fn one(tone: Tone) -> Self {
        Self {
            immediate: vec![tone],
            delayed: None,
        }
    }
}

/// Preview of the session that completion would stage next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NextUp {
    pub mode: TimerMode,
    pub duration_seconds: i64,
}

/// The timer state machine.
///
/// `remaining_seconds` may go transiently negative after a settings edit
/// shrinks the current duration mid-session; the next tick treats that as
/// reaching zero and runs completion.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    phase: TimerPhase,
    mode: TimerMode,
    remaining_seconds: i64,
    settings: TimerSettings,
}

impl TimerEngine {
    pub fn new(settings: TimerSettings) -> Self {
        let remaining_seconds = settings.duration_seconds(TimerMode::Focus);
        Self {
            phase: TimerPhase::Idle,
            mode: TimerMode::Focus,
            remaining_seconds,
            settings,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_seconds(&self) -> i64 {
        self.remaining_seconds
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    /// One second of wall-clock time. Only meaningful while running; the
    /// tick driver never delivers ticks outside that phase, but a stray
    /// tick is a no-op regardless.
    pub fn tick(&mut self) -> ToneRequests {
        if self.phase != TimerPhase::Running {
            return ToneRequests::none();
        }

        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
        }

        // A settings edit may have pushed the counter to zero or below
        // between ticks; that counts as reaching zero this tick.
        if self.remaining_seconds <= 0 {
            return self.complete();
        }

        ToneRequests::none()
    }

    /// The single start/pause/acknowledge action.
    pub fn toggle(&mut self) -> ToneRequests {
        let tone = match self.phase {
            TimerPhase::Running => {
                self.phase = TimerPhase::Paused;
                Tone::Pause
            }
            // Acknowledging a finished session starts the staged next one;
            // idle and paused sessions simply start.
            TimerPhase::Idle | TimerPhase::Paused | TimerPhase::Finished => {
                self.phase = TimerPhase::Running;
                Tone::Start
            }
        };
        self.tone_if_enabled(tone)
    }

    /// Back to an idle focus session, whatever came before. The only
    /// operation that forces the mode back to focus.
    pub fn reset(&mut self) -> ToneRequests {
        self.phase = TimerPhase::Idle;
        self.mode = TimerMode::Focus;
        self.remaining_seconds = self.settings.duration_seconds(TimerMode::Focus);
        // The pause tone doubles as soft-cancel feedback.
        self.tone_if_enabled(Tone::Pause)
    }

    /// Replace the settings, keeping elapsed progress fixed mid-session.
    pub fn apply_settings(&mut self, new: TimerSettings) -> ToneRequests {
        if self.phase == TimerPhase::Idle {
            self.remaining_seconds = new.duration_seconds(self.mode);
        } else {
            let elapsed = self.settings.duration_seconds(self.mode) - self.remaining_seconds;
            // Shifts only the remaining budget. May land at or below zero;
            // the next tick resolves that through the completion rule
            // rather than any eager correction here.
            self.remaining_seconds = new.duration_seconds(self.mode) - elapsed;
        }
        self.settings = new;
        ToneRequests::none()
    }

    fn complete(&mut self) -> ToneRequests {
        let next = self.next_up();
        let auto_start = match next.mode {
            TimerMode::Break => self.settings.auto_start_break,
            TimerMode::Focus => self.settings.auto_start_focus,
        };

        // The next session is always staged in full, started or not.
        self.mode = next.mode;
        self.remaining_seconds = next.duration_seconds;

        if auto_start {
            self.phase = TimerPhase::Running;
            if !self.settings.sound_enabled {
                return ToneRequests::none();
            }
            let delayed = (next.mode == TimerMode::Break)
                .then_some((INTERVAL_TONE_DELAY_SECONDS, Tone::IntervalStart));
            ToneRequests {
                immediate: vec![Tone::Complete],
                delayed,
            }
        } else {
            // The finish-alert task observes this phase and repeats the
            // completion tone until toggle() acknowledges it.
            self.phase = TimerPhase::Finished;
            ToneRequests::none()
        }
    }

    pub fn mode_duration_seconds(&self) -> i64 {
        self.settings.duration_seconds(self.mode)
    }

    /// Value shown on the display: remaining time, or elapsed time in
    /// count-up mode. Never feeds back into the countdown.
    pub fn display_seconds(&self) -> i64 {
        if self.settings.count_up {
            self.mode_duration_seconds() - self.remaining_seconds
        } else {
            self.remaining_seconds
        }
    }

    /// Mirrors the mode selection in `complete` without mutating state.
    pub fn next_up(&self) -> NextUp {
        let mut mode = match self.mode {
            TimerMode::Focus => TimerMode::Break,
            TimerMode::Break => TimerMode::Focus,
        };
        // Zero-length breaks are skipped entirely.
        if mode == TimerMode::Break && self.settings.break_minutes == 0 {
            mode = TimerMode::Focus;
        }
        NextUp {
            mode,
            duration_seconds: self.settings.duration_seconds(mode),
        }
    }

    fn tone_if_enabled(&self, tone: Tone) -> ToneRequests {
        if self.settings.sound_enabled {
            ToneRequests::one(tone)
        } else {
            ToneRequests::none()
        }
    }
}
