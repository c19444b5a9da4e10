//! Cache filename generation.

use regex::Regex;
use std::sync::LazyLock;

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new("[^A-Za-z0-9]+").unwrap());

/// Filesystem-safe form of a single name or manufacturer component.
///
/// Spaces become underscores first, then every run of non-alphanumeric
/// characters (including those underscores) collapses to a single `-`.
/// The two-step order is load-bearing: existing caches were written with
/// exactly this transform.
fn clean_component(raw: &str) -> String {
    let underscored = raw.replace(' ', "_");
    NON_ALNUM.replace_all(&underscored, "-").into_owned()
}

/// Compute the cache filename for a product's SDS sheet.
///
/// Deterministic and pure. Distinct inputs may normalize to the same
/// key; that collision is accepted.
pub fn sheet_file_name(name: &str, manufacturer: &str) -> String {
    format!("{}_{}.png", clean_component(name), clean_component(manufacturer))
}
