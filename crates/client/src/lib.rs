//! Outbound collaborators for the worksafe server.
//!
//! This crate drives the headless-browser scraping of the external SDS
//! search site, full-page sheet capture, and the authentication
//! provider's REST API.

pub mod auth;
pub mod browser;
pub mod capture;
pub mod error;
pub mod search;

pub use auth::{AuthClient, AuthConfig, AuthError, AuthUser};
pub use browser::BrowserSession;
pub use capture::{CaptureConfig, HeadlessCapturer, SheetCapturer};
pub use error::ScrapeError;
pub use search::{ChemSafetySearcher, SearchConfig, SheetSearcher};
