//! Shared application state.

use std::sync::Arc;

use worksafe_client::{
    AuthClient, AuthConfig, CaptureConfig, ChemSafetySearcher, HeadlessCapturer, SearchConfig,
    SheetCapturer, SheetSearcher,
};
use worksafe_core::{AppConfig, SheetStore, WorksiteStore};

/// Everything the handlers need, built once at startup.
///
/// The searcher and capturer are trait objects so tests can swap in
/// stubs without a browser.
pub struct AppState {
    pub store: SheetStore,
    pub worksites: WorksiteStore,
    /// Present only when a Firebase API key is configured; /user routes
    /// report the missing key otherwise.
    pub auth: Option<AuthClient>,
    pub searcher: Arc<dyn SheetSearcher>,
    pub capturer: Arc<dyn SheetCapturer>,
}

impl AppState {
    /// Wire up stores and fetchers from the loaded configuration.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let store = SheetStore::new(config.sheets_dir.clone());
        let worksites = WorksiteStore::new(config.sheets_dir.clone());

        let auth = match &config.firebase_api_key {
            Some(key) if !key.is_empty() => Some(AuthClient::new(AuthConfig {
                api_key: key.clone(),
                base_url: config.auth_base_url.clone(),
                ..Default::default()
            })?),
            _ => None,
        };

        let searcher = Arc::new(ChemSafetySearcher::new(SearchConfig {
            search_url: config.search_url.clone(),
            results_timeout: config.results_timeout(),
            row_timeout: config.row_timeout(),
            nav_timeout: config.nav_timeout(),
        }));
        let capturer = Arc::new(HeadlessCapturer::new(CaptureConfig { nav_timeout: config.nav_timeout() }));

        Ok(Self { store, worksites, auth, searcher, capturer })
    }
}
