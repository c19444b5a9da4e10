//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `port` is 0
    /// - `sheets_dir` or `search_url` is empty
    /// - any timeout is outside its supported range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid { field: "port".into(), reason: "must be nonzero".into() });
        }

        if self.sheets_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid { field: "sheets_dir".into(), reason: "must not be empty".into() });
        }

        if !self.search_url.starts_with("http://") && !self.search_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                field: "search_url".into(),
                reason: "must be an http(s) URL".into(),
            });
        }

        if self.results_timeout_ms < 100 || self.results_timeout_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "results_timeout_ms".into(),
                reason: "must be between 100ms and 60s".into(),
            });
        }

        if self.row_timeout_ms < 50 || self.row_timeout_ms > 10_000 {
            return Err(ConfigError::Invalid {
                field: "row_timeout_ms".into(),
                reason: "must be between 50ms and 10s".into(),
            });
        }

        if self.nav_timeout_ms < 1_000 || self.nav_timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "nav_timeout_ms".into(),
                reason: "must be between 1s and 5 minutes".into(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_port() {
        let config = AppConfig { port: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "port"));
    }

    #[test]
    fn test_validate_empty_sheets_dir() {
        let config = AppConfig { sheets_dir: "".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "sheets_dir"));
    }

    #[test]
    fn test_validate_bad_search_url() {
        let config = AppConfig { search_url: "not a url".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "search_url"));
    }

    #[test]
    fn test_validate_results_timeout_too_small() {
        let config = AppConfig { results_timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "results_timeout_ms"));
    }

    #[test]
    fn test_validate_row_timeout_too_large() {
        let config = AppConfig { row_timeout_ms: 20_000, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "row_timeout_ms"));
    }

    #[test]
    fn test_validate_nav_timeout_bounds() {
        let config = AppConfig { nav_timeout_ms: 500, ..Default::default() };
        assert!(config.validate().is_err());

        let config = AppConfig { nav_timeout_ms: 300_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
