//! Directory-backed cache for rasterized SDS sheets.
//!
//! Cached sheets are plain PNG files in a flat directory, keyed by a
//! normalized filename derived from the product name and manufacturer.
//! The on-disk filename format is the cache contract: later lookups must
//! reproduce it bit-exactly to hit.

pub mod key;
pub mod store;

pub use crate::Error;

pub use key::sheet_file_name;
pub use store::{Scope, SheetStore};
