//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (WORKSAFE_*)
//! 2. TOML config file (if WORKSAFE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (WORKSAFE_*)
/// 2. TOML config file (if WORKSAFE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    ///
    /// Set via WORKSAFE_HOST environment variable.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on.
    ///
    /// Set via WORKSAFE_PORT environment variable.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Root directory for cached sheets and worksite records.
    ///
    /// Set via WORKSAFE_SHEETS_DIR environment variable.
    #[serde(default = "default_sheets_dir")]
    pub sheets_dir: PathBuf,

    /// URL of the external SDS search page.
    ///
    /// Set via WORKSAFE_SEARCH_URL environment variable.
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Firebase Web API key for the authentication provider.
    ///
    /// Set via WORKSAFE_FIREBASE_API_KEY environment variable.
    /// Required only when a /user endpoint is called.
    #[serde(default)]
    pub firebase_api_key: Option<String>,

    /// Base URL of the authentication provider's REST API.
    ///
    /// Set via WORKSAFE_AUTH_BASE_URL environment variable.
    #[serde(default = "default_auth_base_url")]
    pub auth_base_url: String,

    /// How long to wait for the search results table to appear, in ms.
    ///
    /// Set via WORKSAFE_RESULTS_TIMEOUT_MS environment variable.
    #[serde(default = "default_results_timeout_ms")]
    pub results_timeout_ms: u64,

    /// Per-row wait when walking the results table, in ms. Expiry here
    /// is read as end-of-table, not an error.
    ///
    /// Set via WORKSAFE_ROW_TIMEOUT_MS environment variable.
    #[serde(default = "default_row_timeout_ms")]
    pub row_timeout_ms: u64,

    /// Page navigation timeout for browser sessions, in ms.
    ///
    /// Set via WORKSAFE_NAV_TIMEOUT_MS environment variable.
    #[serde(default = "default_nav_timeout_ms")]
    pub nav_timeout_ms: u64,
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    3000
}

fn default_sheets_dir() -> PathBuf {
    PathBuf::from("./SavedSheets")
}

fn default_search_url() -> String {
    "https://chemicalsafety.com/sds-search/".into()
}

fn default_auth_base_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".into()
}

fn default_results_timeout_ms() -> u64 {
    3_000
}

fn default_row_timeout_ms() -> u64 {
    500
}

fn default_nav_timeout_ms() -> u64 {
    30_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            sheets_dir: default_sheets_dir(),
            search_url: default_search_url(),
            firebase_api_key: None,
            auth_base_url: default_auth_base_url(),
            results_timeout_ms: default_results_timeout_ms(),
            row_timeout_ms: default_row_timeout_ms(),
            nav_timeout_ms: default_nav_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Results-table wait as a Duration.
    pub fn results_timeout(&self) -> Duration {
        Duration::from_millis(self.results_timeout_ms)
    }

    /// Per-row wait as a Duration.
    pub fn row_timeout(&self) -> Duration {
        Duration::from_millis(self.row_timeout_ms)
    }

    /// Navigation wait as a Duration.
    pub fn nav_timeout(&self) -> Duration {
        Duration::from_millis(self.nav_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `WORKSAFE_`
    /// 2. TOML file from `WORKSAFE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("WORKSAFE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("WORKSAFE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the Firebase API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is not set.
    pub fn require_firebase_api_key(&self) -> Result<&str, ConfigError> {
        self.firebase_api_key.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "firebase_api_key".into(),
            hint: "Set WORKSAFE_FIREBASE_API_KEY environment variable".into(),
        })
    }
}
