//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP
//! server. Between them they own every timed resource: the one-second
//! tick cadence, the repeating completion alert, and the optional sleep
//! inhibitor.

pub mod finish_alert;
pub mod keep_awake;
pub mod tick;

// Re-export main functions
pub use finish_alert::finish_alert_task;
pub use keep_awake::keep_awake_task;
pub use tick::tick_driver_task;
