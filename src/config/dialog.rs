//! Dialog validation policy configuration

use serde::Deserialize;

/// Dialog configuration
///
/// Controls how strictly free-text answers are validated. The permissive
/// default mirrors the historical behavior of accepting whatever the
/// sanitizer produces, including the empty string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DialogConfig {
    /// Reject free-text file names that sanitize to the empty string and
    /// re-present the prompt instead
    #[serde(default)]
    pub reject_empty_filename: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_permissive() {
        let config = DialogConfig::default();
        assert!(!config.reject_empty_filename);
    }
}
