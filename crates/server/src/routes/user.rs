//! Account endpoints backed by the Firebase Auth REST API.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use worksafe_client::{AuthClient, AuthError};

use crate::response::ApiResponse;
use crate::routes::valid_email;
use crate::state::AppState;

/// Body for login, register, and delete. Missing keys default to empty
/// strings and are caught by the field checks.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_pass: String,
}

/// Body for password reset requests.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailOnly {
    #[serde(default)]
    pub user_email: String,
}

/// Reject empty or malformed credentials before touching the provider.
fn check_credentials(creds: &Credentials) -> Option<ApiResponse> {
    if creds.user_email.is_empty() || creds.user_pass.is_empty() {
        return Some(ApiResponse::fail("Missing fields"));
    }
    if !valid_email(&creds.user_email) {
        return Some(ApiResponse::fail("Poorly formatted email"));
    }
    None
}

/// The auth client, or the failure response when no API key is configured.
fn auth_or_fail(state: &AppState) -> Result<&AuthClient, ApiResponse> {
    state.auth.as_ref().ok_or_else(|| ApiResponse::fail(AuthError::MissingApiKey.to_string()))
}

/// `POST /user/login`
pub async fn login(State(state): State<Arc<AppState>>, Json(creds): Json<Credentials>) -> ApiResponse {
    login_impl(&state, creds).await
}

pub(crate) async fn login_impl(state: &AppState, creds: Credentials) -> ApiResponse {
    if let Some(resp) = check_credentials(&creds) {
        return resp;
    }
    let auth = match auth_or_fail(state) {
        Ok(auth) => auth,
        Err(resp) => return resp,
    };

    match auth.sign_in(&creds.user_email, &creds.user_pass).await {
        Ok(user) => ApiResponse::ok_with("Signed in", user.email.into()),
        Err(e) => ApiResponse::fail_with("Error signing in", e.to_string().into()),
    }
}

/// `GET /user/logout`
///
/// Token-based auth holds no server-side session; this acknowledges the
/// client discarding its token.
pub async fn logout() -> ApiResponse {
    ApiResponse::ok("Signed out")
}

/// `POST /user/register`
pub async fn register(State(state): State<Arc<AppState>>, Json(creds): Json<Credentials>) -> ApiResponse {
    register_impl(&state, creds).await
}

pub(crate) async fn register_impl(state: &AppState, creds: Credentials) -> ApiResponse {
    if let Some(resp) = check_credentials(&creds) {
        return resp;
    }
    let auth = match auth_or_fail(state) {
        Ok(auth) => auth,
        Err(resp) => return resp,
    };

    match auth.sign_up(&creds.user_email, &creds.user_pass).await {
        Ok(user) => ApiResponse::ok_with("Created user", user.email.into()),
        Err(e) => ApiResponse::fail_with("Error creating user", e.to_string().into()),
    }
}

/// `DELETE /user/deluser` — re-authenticate, then delete the account.
pub async fn delete_user(State(state): State<Arc<AppState>>, Json(creds): Json<Credentials>) -> ApiResponse {
    delete_user_impl(&state, creds).await
}

pub(crate) async fn delete_user_impl(state: &AppState, creds: Credentials) -> ApiResponse {
    if let Some(resp) = check_credentials(&creds) {
        return resp;
    }
    let auth = match auth_or_fail(state) {
        Ok(auth) => auth,
        Err(resp) => return resp,
    };

    match auth.delete_account(&creds.user_email, &creds.user_pass).await {
        Ok(()) => ApiResponse::ok("User has been deleted"),
        Err(e) => ApiResponse::fail_with("Could not delete user", e.to_string().into()),
    }
}

/// `POST /user/resetPassword`
pub async fn reset_password(State(state): State<Arc<AppState>>, Json(body): Json<EmailOnly>) -> ApiResponse {
    reset_password_impl(&state, body).await
}

pub(crate) async fn reset_password_impl(state: &AppState, body: EmailOnly) -> ApiResponse {
    if body.user_email.is_empty() {
        return ApiResponse::fail("Missing user email");
    }
    if !valid_email(&body.user_email) {
        return ApiResponse::fail("Poorly formatted email");
    }
    let auth = match auth_or_fail(state) {
        Ok(auth) => auth,
        Err(resp) => return resp,
    };

    match auth.send_password_reset(&body.user_email).await {
        Ok(()) => ApiResponse::ok("Password reset email has been sent"),
        Err(e) => ApiResponse::fail_with(e.to_string(), e.to_string().into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use worksafe_client::{ScrapeError, SheetCapturer, SheetSearcher};
    use worksafe_core::{SdsProduct, SheetStore, WorksiteStore};

    struct NoSearcher;

    #[async_trait]
    impl SheetSearcher for NoSearcher {
        async fn search(&self, _query: &str) -> Result<Vec<SdsProduct>, ScrapeError> {
            Ok(vec![])
        }
    }

    struct NoCapturer;

    #[async_trait]
    impl SheetCapturer for NoCapturer {
        async fn capture(&self, _url: &str) -> Result<Vec<u8>, ScrapeError> {
            Ok(vec![])
        }
    }

    fn state_without_auth(dir: &std::path::Path) -> AppState {
        AppState {
            store: SheetStore::new(dir),
            worksites: WorksiteStore::new(dir),
            auth: None,
            searcher: Arc::new(NoSearcher),
            capturer: Arc::new(NoCapturer),
        }
    }

    fn creds(email: &str, pass: &str) -> Credentials {
        Credentials { user_email: email.into(), user_pass: pass.into() }
    }

    #[tokio::test]
    async fn test_login_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_without_auth(dir.path());

        let resp = login_impl(&state, creds("", "")).await;
        assert_eq!(resp.success, 0);
        assert_eq!(resp.message, "Missing fields");
    }

    #[tokio::test]
    async fn test_login_bad_email() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_without_auth(dir.path());

        let resp = login_impl(&state, creds("not-an-email", "hunter2")).await;
        assert_eq!(resp.success, 0);
        assert_eq!(resp.message, "Poorly formatted email");
    }

    #[tokio::test]
    async fn test_login_without_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_without_auth(dir.path());

        let resp = login_impl(&state, creds("worker@example.com", "hunter2")).await;
        assert_eq!(resp.success, 0);
        assert!(resp.message.contains("missing API key"));
    }

    #[tokio::test]
    async fn test_logout_is_stateless() {
        let resp = logout().await;
        assert_eq!(resp.success, 1);
        assert_eq!(resp.message, "Signed out");
    }

    #[tokio::test]
    async fn test_reset_password_requires_email() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_without_auth(dir.path());

        let resp = reset_password_impl(&state, EmailOnly { user_email: String::new() }).await;
        assert_eq!(resp.success, 0);
        assert_eq!(resp.message, "Missing user email");
    }

    #[tokio::test]
    async fn test_credentials_deserialize_camel_case() {
        let creds: Credentials =
            serde_json::from_str(r#"{"userEmail": "a@b.co", "userPass": "pw"}"#).unwrap();
        assert_eq!(creds.user_email, "a@b.co");
        assert_eq!(creds.user_pass, "pw");
    }
}
