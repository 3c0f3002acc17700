//! Configuration for a game in the terminal.

use std::time::Duration;

/// How the shell narrates and how long devices wait for a touch.
#[derive(Debug, Clone)]
pub struct PlayConfig {
    /// Pause between narrated characters.
    pub type_delay: Duration,
    /// Whether narration is shouted in upper case.
    pub uppercase: bool,
    /// How long a device waits for a touch before giving up.
    pub touch_timeout: Duration,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            type_delay: Duration::from_millis(10),
            uppercase: true,
            touch_timeout: Duration::from_secs(15),
        }
    }
}

impl PlayConfig {
    /// Set the pause between narrated characters.
    pub fn with_type_delay(mut self, delay: Duration) -> Self {
        self.type_delay = delay;
        self
    }

    /// Set whether narration is upper-cased.
    pub fn with_uppercase(mut self, uppercase: bool) -> Self {
        self.uppercase = uppercase;
        self
    }

    /// Set the touch timeout.
    pub fn with_touch_timeout(mut self, timeout: Duration) -> Self {
        self.touch_timeout = timeout;
        self
    }
}

/// Parse a non-negative number of seconds.
pub fn seconds(value: f64, what: &str) -> Result<Duration, String> {
    Duration::try_from_secs_f64(value).map_err(|_| format!("invalid {what}: {value}"))
}
