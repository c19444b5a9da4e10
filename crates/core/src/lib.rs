//! Core types and shared functionality for the worksafe server.
//!
//! This crate provides:
//! - Directory-backed SDS sheet cache with normalized filename keys
//! - Worksite records and their JSON store
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod product;
pub mod worksite;

pub use cache::{Scope, SheetStore, sheet_file_name};
pub use config::AppConfig;
pub use error::Error;
pub use product::SdsProduct;
pub use worksite::{Worksite, WorksiteStore};
