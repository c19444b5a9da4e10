//! HTTP route handlers.

pub mod sds;
pub mod user;
pub mod worksite;

use std::sync::Arc;
use std::sync::LazyLock;

use axum::Router;
use axum::routing::{delete, get, post};
use regex::Regex;

use crate::state::AppState;

/// Practical email shape check: one `@`, a dot in the domain, no whitespace.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap()
});

/// Whether a string looks like an email address.
pub(crate) fn valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Worksite names become directory names; reject anything that could
/// escape the worksites root.
pub(crate) fn safe_worksite_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}

async fn root() -> &'static str {
    "worksafe server is running"
}

/// Build the full route table.
pub fn app_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/sds/{identifier}", get(sds::search))
        .route("/sds", post(sds::fetch))
        .route("/user/login", post(user::login))
        .route("/user/logout", get(user::logout))
        .route("/user/register", post(user::register))
        .route("/user/deluser", delete(user::delete_user))
        .route("/user/resetPassword", post(user::reset_password))
        .route(
            "/worksite",
            post(worksite::create).put(worksite::update).delete(worksite::remove),
        )
        .route("/worksite/getData", post(worksite::get_data))
        .route("/worksite/addUser", post(worksite::add_user))
        .route("/worksite/removeUser", delete(worksite::remove_user))
        .route("/worksite/getWorksites", post(worksite::get_worksites))
        .route("/worksite/sds", post(worksite::get_sheet))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email_accepts_plain_addresses() {
        assert!(valid_email("worker@example.com"));
        assert!(valid_email("first.last@sub.example.co"));
    }

    #[test]
    fn test_valid_email_rejects_malformed() {
        assert!(!valid_email(""));
        assert!(!valid_email("no-at-sign"));
        assert!(!valid_email("two@@example.com"));
        assert!(!valid_email("spaces in@example.com"));
        assert!(!valid_email("nodot@example"));
    }

    #[test]
    fn test_safe_worksite_name_rejects_traversal() {
        assert!(safe_worksite_name("North Yard"));
        assert!(!safe_worksite_name(""));
        assert!(!safe_worksite_name(".."));
        assert!(!safe_worksite_name("a/b"));
        assert!(!safe_worksite_name("a\\b"));
    }
}
