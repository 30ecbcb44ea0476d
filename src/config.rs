//! Configuration and CLI argument handling

use clap::Parser;

use crate::state::TimerSettings;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "stay-focused")]
#[command(about = "A state-managed HTTP server driving a focus/break interval timer")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20877")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Focus session length in minutes
    #[arg(short, long, default_value = "25")]
    pub focus: u32,

    /// Break length in minutes; 0 skips breaks entirely
    #[arg(short, long = "break", default_value = "5")]
    pub break_minutes: u32,

    /// Wait for a manual start instead of auto-starting breaks
    #[arg(long)]
    pub manual_break: bool,

    /// Wait for a manual start instead of auto-starting focus sessions
    #[arg(long)]
    pub manual_focus: bool,

    /// Disable all tones
    #[arg(long)]
    pub muted: bool,

    /// Show elapsed time instead of remaining time
    #[arg(long)]
    pub count_up: bool,

    /// Sound player command used to play tones
    #[arg(long, default_value = "paplay")]
    pub player: String,

    /// Hold a systemd sleep inhibitor while a session is active
    #[arg(long)]
    pub keep_awake: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Initial timer settings from the CLI flags, clamped the same way
    /// live edits are.
    pub fn initial_settings(&self) -> TimerSettings {
        TimerSettings {
            focus_minutes: self.focus,
            break_minutes: self.break_minutes,
            auto_start_break: !self.manual_break,
            auto_start_focus: !self.manual_focus,
            sound_enabled: !self.muted,
            count_up: self.count_up,
        }
        .clamped()
    }
}
