//! Sweep configuration from TOML (`[sweep]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw expiry sweep configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSweepConfig {
    /// Milliseconds between expiry checks
    pub tick_ms: u64,
}

impl Default for FileSweepConfig {
    fn default() -> Self {
        Self { tick_ms: 250 }
    }
}

impl FileSweepConfig {
    /// Tick interval, never shorter than 10ms
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(10))
    }
}
