//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `NAMESMITH` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use namesmith::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Listening on port {}", config.server.port);
//! ```

mod dialog;
mod error;
mod restore;
mod server;
mod slack;
mod storage;

pub use dialog::DialogConfig;
pub use error::{ConfigError, ValidationError};
pub use restore::RestoreConfig;
pub use server::{Environment, ServerConfig};
pub use slack::SlackConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for the Namesmith bot.
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, required port, environment)
    pub server: ServerConfig,

    /// Slack application configuration (credentials, API base URL)
    pub slack: SlackConfig,

    /// Dialog validation policy
    #[serde(default)]
    pub dialog: DialogConfig,

    /// Installation storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Startup session restore configuration
    #[serde(default)]
    pub restore: RestoreConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `NAMESMITH` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `NAMESMITH__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `NAMESMITH__SLACK__CLIENT_ID=...` -> `slack.client_id = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing (port, client id,
    ///   client secret)
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("NAMESMITH")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration:
    /// - Port and timeout ranges
    /// - Non-empty Slack credentials
    /// - Production-specific requirements (signing secret)
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.slack.validate(&self.server.environment)?;
        self.restore.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
