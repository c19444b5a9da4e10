//! SDS search against the external chemical-safety site.
//!
//! The site offers no API: results come from driving its search form in
//! a headless browser and walking the rendered results table. The table
//! markup is the external site's HTML and can change under us.

use crate::browser::{BrowserSession, wait_for_element};
use crate::error::ScrapeError;
use async_trait::async_trait;
use chromiumoxide::page::Page;
use std::time::Duration;
use worksafe_core::SdsProduct;

/// Default search page.
const DEFAULT_SEARCH_URL: &str = "https://chemicalsafety.com/sds-search/";

/// CSS selector prefix for the results table rows.
const RESULTS_ROW: &str = "#cs_divResults table tbody";

/// Search form field for substance names.
const SUBSTANCE_FIELD: &str = "input[name=cs_txtSubstance]";

/// Search form field for CAS numbers.
const CAS_FIELD: &str = "input[name=cs_txtCas]";

/// Search form submit control.
const SUBMIT_BUTTON: &str = "input[type=submit]";

/// Searcher trait so handlers and the pipeline can be tested with stubs.
#[async_trait]
pub trait SheetSearcher: Send + Sync {
    /// Run one search and return the result rows in site order.
    async fn search(&self, query: &str) -> Result<Vec<SdsProduct>, ScrapeError>;
}

/// Configuration for the search fetcher.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Search page URL (default: chemicalsafety.com SDS search).
    pub search_url: String,

    /// How long to wait for the results table to appear (default: 3s).
    pub results_timeout: Duration,

    /// Per-row wait while walking the table; expiry means end-of-table
    /// (default: 500ms).
    pub row_timeout: Duration,

    /// Navigation timeout for the search page itself (default: 30s).
    pub nav_timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            results_timeout: Duration::from_secs(3),
            row_timeout: Duration::from_millis(500),
            nav_timeout: Duration::from_secs(30),
        }
    }
}

/// Headless-browser search fetcher for the external SDS site.
pub struct ChemSafetySearcher {
    config: SearchConfig,
}

impl ChemSafetySearcher {
    /// Create a searcher with the given configuration.
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Submit the query and walk the results table.
    async fn run(&self, page: &Page, query: &str) -> Result<Vec<SdsProduct>, ScrapeError> {
        // CAS numbers are purely numeric; anything else is a substance name.
        let field = if query.trim().parse::<f64>().is_ok() { CAS_FIELD } else { SUBSTANCE_FIELD };
        tracing::debug!(query, field, "submitting SDS search");

        let input = page
            .find_element(field)
            .await
            .map_err(|_| ScrapeError::FormElement(field.to_string()))?;
        input
            .type_str(query)
            .await
            .map_err(|e| ScrapeError::Navigation(e.to_string()))?;

        let submit = page
            .find_element(SUBMIT_BUTTON)
            .await
            .map_err(|_| ScrapeError::FormElement(SUBMIT_BUTTON.to_string()))?;
        submit
            .click()
            .await
            .map_err(|e| ScrapeError::Navigation(e.to_string()))?;

        // No table within the window is "no results", not an error.
        let first_link = format!("{RESULTS_ROW} tr:nth-child(1) td:nth-child(1) a");
        if wait_for_element(page, &first_link, self.config.results_timeout).await.is_none() {
            tracing::debug!(query, "no results table appeared");
            return Ok(Vec::new());
        }

        let mut rows = Vec::new();
        for index in 1.. {
            match self.extract_row(page, index).await {
                Some(product) => rows.push(product),
                // The first row that fails to extract ends the walk. A
                // malformed mid-table row is indistinguishable from the
                // true end and truncates the list.
                None => break,
            }
        }

        tracing::debug!(query, rows = rows.len(), "search finished");
        Ok(rows)
    }

    /// Extract one result row by 1-based index, or None at end-of-table.
    async fn extract_row(&self, page: &Page, index: usize) -> Option<SdsProduct> {
        let name_cell = format!("{RESULTS_ROW} tr:nth-child({index}) td:nth-child(1)");
        let cell = wait_for_element(page, &name_cell, self.config.row_timeout).await?;
        let name = cell.inner_text().await.ok().flatten()?.trim().to_string();

        let manufacturer_cell = format!("{RESULTS_ROW} tr:nth-child({index}) td:nth-child(2)");
        let manufacturer = page
            .find_element(&manufacturer_cell)
            .await
            .ok()?
            .inner_text()
            .await
            .ok()
            .flatten()?
            .trim()
            .to_string();

        let link = format!("{RESULTS_ROW} tr:nth-child({index}) td:nth-child(1) a");
        let url = page.find_element(&link).await.ok()?.attribute("href").await.ok().flatten()?;

        Some(SdsProduct { name, manufacturer, url })
    }
}

#[async_trait]
impl SheetSearcher for ChemSafetySearcher {
    async fn search(&self, query: &str) -> Result<Vec<SdsProduct>, ScrapeError> {
        let session = BrowserSession::launch().await?;
        let result = match session.open(&self.config.search_url, self.config.nav_timeout).await {
            Ok(page) => self.run(&page, query).await,
            Err(e) => Err(e),
        };
        // Session is released on every exit path.
        session.close().await;
        result
    }
}
