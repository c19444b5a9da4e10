//! SDS search and sheet retrieval endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use worksafe_core::{Scope, SdsProduct};

use crate::pipeline::resolve_sheet;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Body for `POST /sds`. Fields default to empty so missing keys fall
/// through to validation instead of a 422 rejection.
#[derive(Debug, Deserialize)]
pub struct SheetRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub url: String,
}

impl From<SheetRequest> for SdsProduct {
    fn from(body: SheetRequest) -> Self {
        Self { name: body.name, manufacturer: body.manufacturer, url: body.url }
    }
}

/// `GET /sds/{identifier}` — search the external SDS database.
pub async fn search(State(state): State<Arc<AppState>>, Path(identifier): Path<String>) -> ApiResponse {
    search_impl(&state, &identifier).await
}

pub(crate) async fn search_impl(state: &AppState, identifier: &str) -> ApiResponse {
    if identifier.trim().is_empty() {
        return ApiResponse::fail("No search criteria given");
    }

    match state.searcher.search(identifier).await {
        Ok(rows) if rows.is_empty() => ApiResponse::fail("No results were found"),
        Ok(rows) => match serde_json::to_value(&rows) {
            Ok(payload) => ApiResponse::ok_with("Retrieved products", payload),
            Err(e) => ApiResponse::fail_with("Could not serialize results", e.to_string().into()),
        },
        Err(e) => {
            tracing::warn!(error = %e, identifier, "SDS search failed");
            ApiResponse::fail_with("Could not reach the SDS database", e.to_string().into())
        }
    }
}

/// `POST /sds` — return a product's sheet as base64 PNG, fetching on miss.
pub async fn fetch(State(state): State<Arc<AppState>>, Json(body): Json<SheetRequest>) -> ApiResponse {
    fetch_impl(&state, body.into()).await
}

pub(crate) async fn fetch_impl(state: &AppState, product: SdsProduct) -> ApiResponse {
    match resolve_sheet(&state.store, state.capturer.as_ref(), &product, &Scope::Global).await {
        Ok(bytes) => ApiResponse::ok_with("Image saved locally", STANDARD.encode(bytes).into()),
        Err(e) => {
            tracing::warn!(error = %e, "sheet retrieval failed");
            ApiResponse::from_error(&e)
        }
    }
}
