//! Installation storage configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Storage configuration
///
/// When a path is configured, team installations persist to a JSON file
/// and survive restarts; otherwise they live in memory only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON file holding team installations
    pub installations_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Check whether installations persist across restarts
    pub fn is_persistent(&self) -> bool {
        self.installations_path.is_some()
    }
}
