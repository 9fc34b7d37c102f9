//! Slack application configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Slack application configuration
///
/// The client id and client secret identify the Slack app itself; both are
/// required. The signing secret enables request-signature verification on
/// the webhook endpoints and is optional in development.
#[derive(Debug, Clone, Deserialize)]
pub struct SlackConfig {
    /// Slack app client id (required)
    pub client_id: String,

    /// Slack app client secret (required); also authorizes the
    /// installation provisioning endpoint
    pub client_secret: SecretString,

    /// Signing secret for webhook request verification
    pub signing_secret: Option<SecretString>,

    /// Base URL for the Slack Web API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl SlackConfig {
    /// Validate Slack configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.client_id.is_empty() {
            return Err(ValidationError::MissingRequired("NAMESMITH__SLACK__CLIENT_ID"));
        }
        if self.client_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired(
                "NAMESMITH__SLACK__CLIENT_SECRET",
            ));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ValidationError::InvalidApiBaseUrl);
        }

        // Unsigned webhooks are acceptable only outside production
        if *environment == Environment::Production && self.signing_secret.is_none() {
            return Err(ValidationError::MissingRequired(
                "NAMESMITH__SLACK__SIGNING_SECRET",
            ));
        }

        Ok(())
    }
}

fn default_api_base_url() -> String {
    "https://slack.com/api".to_string()
}
