//! Environment abstraction for deterministic testing.
//!
//! The widget stamps locally originated messages with a wall-clock label.
//! Reading the clock through a trait lets simulation pin the label.

use chrono::Local;

/// Time source for message labels.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Current local time, formatted the way the backend formats message
    /// timestamps (`"%I:%M %p"`, e.g. `"02:15 PM"`).
    fn time_label(&self) -> String;
}

/// Production environment backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a system environment.
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    fn time_label(&self) -> String {
        Local::now().format("%I:%M %p").to_string()
    }
}
