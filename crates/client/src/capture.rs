//! Full-page sheet capture.
//!
//! Renders a product's SDS detail page in an isolated browser session
//! and captures it as a full-page PNG. No retry is built in; the caller
//! decides whether to re-request.

use crate::browser::BrowserSession;
use crate::error::ScrapeError;
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::emulation::SetEmulatedMediaParams;
use chromiumoxide::page::{Page, ScreenshotParams};
use std::time::Duration;

/// Capturer trait so the pipeline can be tested with stubs.
#[async_trait]
pub trait SheetCapturer: Send + Sync {
    /// Rasterize the page at `url` and return its PNG bytes.
    async fn capture(&self, url: &str) -> Result<Vec<u8>, ScrapeError>;
}

/// Configuration for the document fetcher.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Navigation timeout for the detail page (default: 30s).
    pub nav_timeout: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { nav_timeout: Duration::from_secs(30) }
    }
}

/// Headless-browser document fetcher.
pub struct HeadlessCapturer {
    config: CaptureConfig,
}

impl HeadlessCapturer {
    /// Create a capturer with the given configuration.
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    async fn run(&self, page: &Page, url: &str) -> Result<Vec<u8>, ScrapeError> {
        // The detail pages style their print layout; force screen media
        // so the capture matches what a browser shows.
        page.execute(SetEmulatedMediaParams::builder().media("screen").build())
            .await
            .map_err(|e| ScrapeError::Capture(e.to_string()))?;

        let png = page
            .screenshot(ScreenshotParams::builder().full_page(true).build())
            .await
            .map_err(|e| ScrapeError::Capture(e.to_string()))?;

        tracing::debug!(url, bytes = png.len(), "sheet captured");
        Ok(png)
    }
}

#[async_trait]
impl SheetCapturer for HeadlessCapturer {
    async fn capture(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        let session = BrowserSession::launch().await?;
        let result = match session.open(url, self.config.nav_timeout).await {
            Ok(page) => self.run(&page, url).await,
            Err(e) => Err(e),
        };
        // Session is released on every exit path.
        session.close().await;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_config_default() {
        let config = CaptureConfig::default();
        assert_eq!(config.nav_timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    #[ignore = "requires network and Chrome/Chromium"]
    async fn test_live_capture_png() {
        let capturer = HeadlessCapturer::new(CaptureConfig::default());
        let bytes = capturer.capture("https://example.com").await.unwrap();
        // PNG magic bytes.
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
