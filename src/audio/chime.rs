//! Tone playback through an external sound player

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

/// Named tones the timer requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// A session starts or resumes
    Start,
    /// A session pauses; also used as soft-cancel feedback on reset
    Pause,
    /// A session completed
    Complete,
    /// A break interval begins after an auto-advanced completion
    IntervalStart,
}

impl Tone {
    /// Freedesktop sound theme file played for this tone.
    fn sound_file(&self) -> &'static str {
        match self {
            Tone::Start => "/usr/share/sounds/freedesktop/stereo/service-login.oga",
            Tone::Pause => "/usr/share/sounds/freedesktop/stereo/service-logout.oga",
            Tone::Complete => "/usr/share/sounds/freedesktop/stereo/complete.oga",
            Tone::IntervalStart => "/usr/share/sounds/freedesktop/stereo/bell.oga",
        }
    }
}

/// Fire-and-forget tone playback capability. The timer never observes the
/// result of a request.
pub trait Chime: Send + Sync + std::fmt::Debug {
    fn request(&self, tone: Tone);
}

/// Plays tones by spawning an external player process per request.
#[derive(Debug, Clone)]
pub struct PlayerChime {
    player: String,
}

impl PlayerChime {
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
        }
    }
}

impl Chime for PlayerChime {
    fn request(&self, tone: Tone) {
        let player = self.player.clone();
        let file = tone.sound_file();

        tokio::spawn(async move {
            if !Path::new(file).exists() {
                debug!("Sound file {} not found, skipping {:?} tone", file, tone);
                return;
            }

            match Command::new(&player)
                .arg(file)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
            {
                Ok(_) => debug!("Playing {:?} tone via {}", tone, player),
                Err(e) => warn!("Failed to spawn sound player {}: {}", player, e),
            }
        });
    }
}

/// No-op playback, used when no player is available and in tests.
#[derive(Debug, Clone, Copy)]
pub struct SilentChime;

impl Chime for SilentChime {
    fn request(&self, _tone: Tone) {}
}

/// Check that the configured sound player can be spawned at all.
pub async fn check_player_available(player: &str) -> Result<(), String> {
    Command::new(player)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .await
        .map_err(|_| format!("Sound player '{}' is not available", player))?;

    debug!("Sound player '{}' is available", player);
    Ok(())
}

/// Records requested tones instead of playing them.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingChime {
    pub played: std::sync::Mutex<Vec<Tone>>,
}

#[cfg(test)]
impl RecordingChime {
    pub fn count(&self, tone: Tone) -> usize {
        self.played
            .lock()
            .unwrap()
            .iter()
            .filter(|t| **t == tone)
            .count()
    }
}

#[cfg(test)]
impl Chime for RecordingChime {
    fn request(&self, tone: Tone) {
        self.played.lock().unwrap().push(tone);
    }
}
