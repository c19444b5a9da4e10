//! Firebase Auth REST client.
//!
//! Wraps the Identity Toolkit accounts API used for sign-in, account
//! creation, account deletion, and password-reset email dispatch.
//!
//! ### Specification
//!
//! - **Endpoint**: `https://identitytoolkit.googleapis.com/v1/accounts:*`
//! - **Authentication**: Web API key as a `key` query parameter.
//! - **Errors**: 4xx responses carry `{error: {message: CODE}}`; codes
//!   are mapped into `AuthError` variants.
//!
//! One client is constructed at process start and shared by every
//! handler; there is no ambient module-level connection.

pub mod error;
pub mod response;

pub use error::AuthError;
pub use response::AuthUser;

use response::{OobCodeResponse, ProviderErrorBody};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default base URL for the Identity Toolkit API.
const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Auth client configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Firebase Web API key.
    pub api_key: String,
    /// Base URL (default: https://identitytoolkit.googleapis.com/v1).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Firebase Auth REST client.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    config: AuthConfig,
}

impl AuthClient {
    /// Create a new auth client with the given configuration.
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        if config.api_key.is_empty() {
            return Err(AuthError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .use_rustls_tls()
            .build()
            .map_err(|e| AuthError::Network(std::sync::Arc::new(e)))?;

        Ok(Self { http, config })
    }

    /// POST to an `accounts:*` endpoint and decode the response.
    async fn post<R: DeserializeOwned>(
        &self, endpoint: &str, body: serde_json::Value,
    ) -> Result<R, AuthError> {
        let url = format!(
            "{}/accounts:{}?key={}",
            self.config.base_url, endpoint, self.config.api_key
        );

        let response = self.http.post(&url).json(&body).send().await?;
        let status = response.status();

        if status.is_client_error() {
            let bytes = response.bytes().await?;
            return match serde_json::from_slice::<ProviderErrorBody>(&bytes) {
                Ok(err) => Err(AuthError::from_provider_code(&err.error.message)),
                Err(_) => Err(AuthError::HttpError { status: status.as_u16() }),
            };
        }

        if status.is_server_error() {
            return Err(AuthError::HttpError { status: status.as_u16() });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| AuthError::Parse(e.to_string()))
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        tracing::debug!(email, "signing in");
        self.post(
            "signInWithPassword",
            serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    /// Create a new account.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        tracing::debug!(email, "creating account");
        self.post(
            "signUp",
            serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    /// Delete an account after re-authenticating its credentials.
    pub async fn delete_account(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let user = self.sign_in(email, password).await?;
        tracing::debug!(email, "deleting account");
        let _: serde_json::Value = self
            .post("delete", serde_json::json!({ "idToken": user.id_token }))
            .await?;
        Ok(())
    }

    /// Send a password-reset email.
    pub async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        tracing::debug!(email, "sending password reset email");
        let _: OobCodeResponse = self
            .post(
                "sendOobCode",
                serde_json::json!({
                    "requestType": "PASSWORD_RESET",
                    "email": email,
                }),
            )
            .await?;
        Ok(())
    }
}
