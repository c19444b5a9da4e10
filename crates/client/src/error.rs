//! Scraping error types.

/// Errors from headless-browser search and capture.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// Failed to launch or connect to the browser.
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// Failed to navigate to a URL.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// Form field or submit control missing from the search page.
    #[error("search form element not found: {0}")]
    FormElement(String),

    /// Failed to capture the page as an image.
    #[error("capture failed: {0}")]
    Capture(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScrapeError::Navigation("dns failure".to_string());
        assert!(err.to_string().contains("navigation failed"));
        assert!(err.to_string().contains("dns failure"));
    }
}
