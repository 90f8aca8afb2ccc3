//! Simulated clock.

use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

use livechat_client::Environment;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Deterministic clock shared by every clone.
///
/// Starts at 09:00 AM and only moves when [`SimEnv::advance`] is called.
#[derive(Debug, Clone)]
pub struct SimEnv {
    minutes: Arc<AtomicU32>,
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::at(9, 0)
    }
}

impl SimEnv {
    /// Clock at 09:00 AM.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock at `hour:minute` (24-hour).
    pub fn at(hour: u32, minute: u32) -> Self {
        Self { minutes: Arc::new(AtomicU32::new((hour * 60 + minute) % MINUTES_PER_DAY)) }
    }

    /// Move the clock forward.
    pub fn advance(&self, minutes: u32) {
        let now = self.minutes.load(Ordering::SeqCst);
        self.minutes.store((now + minutes) % MINUTES_PER_DAY, Ordering::SeqCst);
    }
}

impl Environment for SimEnv {
    fn time_label(&self) -> String {
        let minutes = self.minutes.load(Ordering::SeqCst);
        let (hour, minute) = (minutes / 60, minutes % 60);
        let suffix = if hour < 12 { "AM" } else { "PM" };
        let hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{hour:02}:{minute:02} {suffix}")
    }
}
