//! Authentication provider response shapes.

use serde::Deserialize;

/// A signed-in (or newly created) account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    /// Provider-assigned account id.
    pub local_id: String,

    /// Account email.
    pub email: String,

    /// Short-lived session token for follow-up account operations.
    pub id_token: String,
}

/// Error envelope the provider returns on 4xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ProviderErrorBody {
    pub error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProviderErrorDetail {
    pub message: String,
}

/// Response to a password-reset request; only echoes the email.
#[derive(Debug, Deserialize)]
pub(crate) struct OobCodeResponse {
    #[allow(dead_code)]
    pub email: String,
}
