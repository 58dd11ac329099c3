//! Configuration types for workshop-sync

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Engine configuration
///
/// Every field has a sensible default; `Config::default()` works out of the
/// box and a JSON file only needs to name the fields it overrides.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Control loop cadence in milliseconds (default: 200)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Settle delay in milliseconds between retiring one download and
    /// dispatching the next (default: 1000)
    #[serde(default = "default_dispatch_delay_ms")]
    pub dispatch_delay_ms: u64,

    /// Request downloads at high priority from the provider (default: true)
    #[serde(default = "default_true")]
    pub high_priority_downloads: bool,

    /// Capacity of the broadcast event channel (default: 64)
    #[serde(default = "default_event_capacity")]
    pub event_channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            dispatch_delay_ms: default_dispatch_delay_ms(),
            high_priority_downloads: true,
            event_channel_capacity: default_event_capacity(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::Config {
                message: "poll interval must be nonzero".to_string(),
                key: Some("poll_interval_ms".to_string()),
            });
        }
        if self.event_channel_capacity == 0 {
            return Err(Error::Config {
                message: "event channel capacity must be nonzero".to_string(),
                key: Some("event_channel_capacity".to_string()),
            });
        }
        Ok(())
    }

    /// Control loop cadence as a [`Duration`]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Dispatch settle delay as a [`Duration`]
    pub fn dispatch_delay(&self) -> Duration {
        Duration::from_millis(self.dispatch_delay_ms)
    }
}

fn default_poll_interval_ms() -> u64 {
    200
}

fn default_dispatch_delay_ms() -> u64 {
    1000
}

fn default_event_capacity() -> usize {
    64
}

fn default_true() -> bool {
    true
}
