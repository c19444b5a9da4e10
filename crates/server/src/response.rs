//! Uniform JSON envelope for every endpoint.
//!
//! Every response is HTTP 200 with a `{success, message, payload?}` body;
//! failures are signalled by `success: 0`, never by an HTTP error status.
//! Mobile clients branch on the `success` flag alone.

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use worksafe_core::Error;

/// The response envelope shared by every route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// 1 on success, 0 on failure.
    pub success: u8,
    /// Human-readable outcome, mostly for client-side debugging.
    pub message: String,
    /// Endpoint-specific data; omitted from the JSON when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl ApiResponse {
    /// Success with no payload.
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: 1, message: message.into(), payload: None }
    }

    /// Success with a payload.
    pub fn ok_with(message: impl Into<String>, payload: Value) -> Self {
        Self { success: 1, message: message.into(), payload: Some(payload) }
    }

    /// Failure with no payload.
    pub fn fail(message: impl Into<String>) -> Self {
        Self { success: 0, message: message.into(), payload: None }
    }

    /// Failure with a payload.
    pub fn fail_with(message: impl Into<String>, payload: Value) -> Self {
        Self { success: 0, message: message.into(), payload: Some(payload) }
    }

    /// Failure carrying a domain error's display string.
    pub fn from_error(err: &Error) -> Self {
        Self::fail(err.to_string())
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
