//! Authentication provider error types.

use std::sync::Arc;

/// Errors from the Firebase Auth REST client.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing Firebase Web API key.
    #[error("missing API key: WORKSAFE_FIREBASE_API_KEY not set")]
    MissingApiKey,

    /// Wrong email/password combination.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account already exists for this email.
    #[error("email already registered")]
    EmailExists,

    /// No account for this email.
    #[error("user not found")]
    UserNotFound,

    /// Password rejected by the provider's policy.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Unmapped provider error code.
    #[error("provider error: {0}")]
    Provider(String),

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { AuthError::Timeout } else { AuthError::Network(Arc::new(err)) }
    }
}

impl AuthError {
    /// Map a provider error code (e.g. `EMAIL_NOT_FOUND`) to a variant.
    ///
    /// Codes sometimes carry a trailing detail after ` : `; only the
    /// leading token is matched.
    pub(crate) fn from_provider_code(code: &str) -> Self {
        let token = code.split(':').next().unwrap_or(code).trim();
        match token {
            "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL" => AuthError::InvalidCredentials,
            "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" | "USER_DISABLED" => AuthError::UserNotFound,
            "EMAIL_EXISTS" => AuthError::EmailExists,
            "WEAK_PASSWORD" => AuthError::WeakPassword(code.to_string()),
            _ => AuthError::Provider(code.to_string()),
        }
    }
}
