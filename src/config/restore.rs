//! Startup session restore configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Session restore configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RestoreConfig {
    /// Per-team connection timeout during startup restore, in seconds.
    /// Bounds how long one unreachable team can hold up the rest.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl RestoreConfig {
    /// Connect timeout as a `Duration`
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Validate restore configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > 300 {
            return Err(ValidationError::InvalidRestoreTimeout);
        }
        Ok(())
    }
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_connect_timeout() -> u64 {
    10
}
