//! Timer settings structure and validation

use serde::{Deserialize, Serialize};

use super::engine::TimerMode;

/// Settings supplied by the configuration collaborators (CLI flags at
/// startup, the `/settings` endpoint afterwards). Replaced wholesale on
/// every edit; the engine never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    /// Focus session length in minutes
    pub focus_minutes: u32,
    /// Break length in minutes; 0 removes breaks from the rotation
    pub break_minutes: u32,
    /// Automatically start breaks when a focus session completes
    pub auto_start_break: bool,
    /// Automatically start focus sessions when a break completes
    pub auto_start_focus: bool,
    /// Whether tone requests are emitted at all
    pub sound_enabled: bool,
    /// Show elapsed time instead of remaining time (display only)
    pub count_up: bool,
}

impl TimerSettings {
    pub const MIN_MINUTES: u32 = 1;
    pub const MAX_MINUTES: u32 = 600;

    /// Clamp durations into the range the engine accepts. Focus must be at
    /// least a minute; a zero-length break is meaningful and stays zero.
    pub fn clamped(mut self) -> Self {
        self.focus_minutes = self
            .focus_minutes
            .clamp(Self::MIN_MINUTES, Self::MAX_MINUTES);
        self.break_minutes = self.break_minutes.min(Self::MAX_MINUTES);
        self
    }

    /// Full duration of the given mode, in seconds.
    pub fn duration_seconds(&self, mode: TimerMode) -> i64 {
        let minutes = match mode {
            TimerMode::Focus => self.focus_minutes,
            TimerMode::Break => self.break_minutes,
        };
        i64::from(minutes) * 60
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            break_minutes: 5,
            auto_start_break: true,
            auto_start_focus: true,
            sound_enabled: true,
            count_up: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamping_bounds_durations() {
        let settings = TimerSettings {
            focus_minutes: 0,
            break_minutes: 9999,
            ..TimerSettings::default()
        }
        .clamped();

        assert_eq!(settings.focus_minutes, TimerSettings::MIN_MINUTES);
        assert_eq!(settings.break_minutes, TimerSettings::MAX_MINUTES);
    }

    #[test]
    fn clamping_keeps_zero_breaks() {
        let settings = TimerSettings {
            break_minutes: 0,
            ..TimerSettings::default()
        }
        .clamped();

        assert_eq!(settings.break_minutes, 0);
    }

    #[test]
    fn durations_are_in_seconds() {
        let settings = TimerSettings::default();
        assert_eq!(settings.duration_seconds(TimerMode::Focus), 25 * 60);
        assert_eq!(settings.duration_seconds(TimerMode::Break), 5 * 60);
    }
}
