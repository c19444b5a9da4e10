//! Headless browser session management.
//!
//! Each search or capture call runs inside its own isolated session:
//! launch, navigate, scrape, close. Sessions are not pooled, and the
//! caller is responsible for closing the session on every exit path.

use crate::ScrapeError;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Interval between element-lookup polls while waiting on the DOM.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Settle time after navigation for late-loading content.
const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// A single-use headless Chromium session.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch a fresh headless browser and its CDP event handler task.
    pub async fn launch() -> Result<Self, ScrapeError> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(ScrapeError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScrapeError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("browser handler event error: {e}");
                    break;
                }
            }
        });

        Ok(Self { browser, handler_task })
    }

    /// Open a page at `url` and wait for it to load.
    ///
    /// Waits for navigation up to `nav_timeout` (best-effort, matching
    /// the external site's slow redirects), then gives dynamic content a
    /// short settle window.
    pub async fn open(&self, url: &str, nav_timeout: Duration) -> Result<Page, ScrapeError> {
        let page = self
            .browser
            .new_page(url)
            .await
            .map_err(|e| ScrapeError::Navigation(e.to_string()))?;

        let _ = tokio::time::timeout(nav_timeout, page.wait_for_navigation()).await;
        tokio::time::sleep(SETTLE_DELAY).await;

        Ok(page)
    }

    /// Close the browser and stop its handler task.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("browser close error: {e}");
        }
        self.handler_task.abort();
    }
}

/// Poll for an element until it appears or `timeout` elapses.
///
/// `None` means the element never showed up within the window; lookup
/// errors count as "not there yet", not failures.
pub(crate) async fn wait_for_element(page: &Page, selector: &str, timeout: Duration) -> Option<Element> {
    let poll = async {
        loop {
            if let Ok(element) = page.find_element(selector).await {
                return element;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    };
    tokio::time::timeout(timeout, poll).await.ok()
}
