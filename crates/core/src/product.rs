//! Product references for SDS sheets.

use crate::Error;
use crate::cache::sheet_file_name;
use serde::{Deserialize, Serialize};

/// A reference to an SDS document on the external search site.
///
/// The same shape serves as a search result row and as the persisted
/// entry inside a worksite's SDS list. `name` and `manufacturer` are
/// free text; `url` points at the external detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdsProduct {
    pub name: String,
    pub manufacturer: String,
    pub url: String,
}

impl SdsProduct {
    /// Reject product references with any missing or empty field.
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("name".into()));
        }
        if self.manufacturer.trim().is_empty() {
            return Err(Error::Validation("manufacturer".into()));
        }
        if self.url.trim().is_empty() {
            return Err(Error::Validation("url".into()));
        }
        Ok(())
    }

    /// Cache filename this product's sheet is stored under.
    pub fn file_name(&self) -> String {
        sheet_file_name(&self.name, &self.manufacturer)
    }
}
