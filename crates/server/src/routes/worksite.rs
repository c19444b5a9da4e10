//! Worksite record and sheet-library endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use worksafe_core::{Error, Scope, SdsProduct, Worksite, sheet_file_name};

use crate::pipeline::resolve_sheet;
use crate::response::ApiResponse;
use crate::routes::sds::SheetRequest;
use crate::routes::{safe_worksite_name, valid_email};
use crate::state::AppState;

/// Body for create and update. Every field defaults so missing keys are
/// reported through the envelope rather than a 422 rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorksiteBody {
    #[serde(default)]
    pub worksite_name: String,
    #[serde(default)]
    pub worksite_addr: String,
    #[serde(default)]
    pub worksite_proc: String,
    #[serde(default)]
    pub worksite_users: Vec<String>,
    #[serde(default, rename = "worksiteSDS")]
    pub worksite_sds: Vec<SdsProduct>,
}

impl From<WorksiteBody> for Worksite {
    fn from(body: WorksiteBody) -> Self {
        Self {
            worksite_name: body.worksite_name,
            worksite_addr: body.worksite_addr,
            worksite_proc: body.worksite_proc,
            worksite_users: body.worksite_users,
            worksite_sds: body.worksite_sds,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameOnly {
    #[serde(default)]
    pub worksite_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    #[serde(default)]
    pub worksite_name: String,
    #[serde(default)]
    pub user_email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOnly {
    #[serde(default)]
    pub user_email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorksiteSheetRequest {
    #[serde(default)]
    pub worksite_name: String,
    #[serde(default)]
    pub sds: Option<SheetRequest>,
}

/// Pre-capture every sheet the worksite lists into its `sheets/` dir.
///
/// Failures are logged and skipped; the worksite record already
/// persisted and the sheet can be re-fetched on demand.
async fn prefetch_sheets(state: &AppState, worksite: &Worksite) {
    let scope = Scope::Worksite(worksite.worksite_name.clone());
    for sds in &worksite.worksite_sds {
        if let Err(e) = resolve_sheet(&state.store, state.capturer.as_ref(), sds, &scope).await {
            tracing::warn!(
                worksite = %worksite.worksite_name,
                sheet = %sds.name,
                error = %e,
                "could not prefetch sheet"
            );
        }
    }
}

/// `POST /worksite` — create a worksite and prefetch its sheets.
pub async fn create(State(state): State<Arc<AppState>>, Json(body): Json<WorksiteBody>) -> ApiResponse {
    create_impl(&state, body.into()).await
}

pub(crate) async fn create_impl(state: &AppState, worksite: Worksite) -> ApiResponse {
    if worksite.validate().is_err() {
        return ApiResponse::fail("Could not create worksite, missing values");
    }
    if !safe_worksite_name(&worksite.worksite_name) {
        return ApiResponse::fail("Invalid worksite name");
    }

    match state.worksites.create(&worksite).await {
        Ok(()) => {
            prefetch_sheets(state, &worksite).await;
            match serde_json::to_value(&worksite) {
                Ok(payload) => ApiResponse::ok_with("Worksite created!", payload),
                Err(e) => ApiResponse::fail_with("Could not create worksite", e.to_string().into()),
            }
        }
        Err(e) => ApiResponse::fail_with("Could not create worksite", e.to_string().into()),
    }
}

/// `PUT /worksite` — replace a worksite's record and prefetch its sheets.
pub async fn update(State(state): State<Arc<AppState>>, Json(body): Json<WorksiteBody>) -> ApiResponse {
    update_impl(&state, body.into()).await
}

pub(crate) async fn update_impl(state: &AppState, worksite: Worksite) -> ApiResponse {
    if worksite.validate().is_err() {
        return ApiResponse::fail("Could not create worksite, missing values");
    }
    if !safe_worksite_name(&worksite.worksite_name) {
        return ApiResponse::fail("Invalid worksite name");
    }
    let name = worksite.worksite_name.clone();

    match state.worksites.save(&worksite).await {
        Ok(()) => {
            prefetch_sheets(state, &worksite).await;
            match serde_json::to_value(&worksite) {
                Ok(payload) => ApiResponse::ok_with(format!("{name} updated"), payload),
                Err(e) => ApiResponse::fail_with(format!("Could not update {name}"), e.to_string().into()),
            }
        }
        Err(e) => ApiResponse::fail_with(format!("Could not update {name}"), e.to_string().into()),
    }
}

/// `DELETE /worksite`
pub async fn remove(State(state): State<Arc<AppState>>, Json(body): Json<NameOnly>) -> ApiResponse {
    remove_impl(&state, &body.worksite_name).await
}

pub(crate) async fn remove_impl(state: &AppState, name: &str) -> ApiResponse {
    if name.is_empty() {
        return ApiResponse::fail("missing worksite name");
    }
    if !safe_worksite_name(name) {
        return ApiResponse::fail("Invalid worksite name");
    }

    match state.worksites.delete(name).await {
        Ok(()) => ApiResponse::ok("Worksite removed"),
        Err(Error::NotFound(_)) => ApiResponse::fail("worksite does not exist"),
        Err(e) => ApiResponse::fail_with("Could not remove worksite", e.to_string().into()),
    }
}

/// `POST /worksite/getData`
pub async fn get_data(State(state): State<Arc<AppState>>, Json(body): Json<NameOnly>) -> ApiResponse {
    get_data_impl(&state, &body.worksite_name).await
}

pub(crate) async fn get_data_impl(state: &AppState, name: &str) -> ApiResponse {
    if !safe_worksite_name(name) {
        return ApiResponse::fail("Invalid worksite name");
    }
    match state.worksites.load(name).await {
        Ok(worksite) => match serde_json::to_value(&worksite) {
            Ok(payload) => ApiResponse::ok_with(format!("Retrieved information for {name}"), payload),
            Err(e) => {
                ApiResponse::fail_with(format!("Could not retrieve data for {name}"), e.to_string().into())
            }
        },
        Err(e) => {
            ApiResponse::fail_with(format!("Could not retrieve data for {name}"), e.to_string().into())
        }
    }
}

/// `POST /worksite/addUser`
pub async fn add_user(State(state): State<Arc<AppState>>, Json(body): Json<Membership>) -> ApiResponse {
    add_user_impl(&state, &body.worksite_name, &body.user_email).await
}

pub(crate) async fn add_user_impl(state: &AppState, name: &str, email: &str) -> ApiResponse {
    if name.is_empty() || email.is_empty() {
        return ApiResponse::fail("missing parameters");
    }
    if !valid_email(email) {
        return ApiResponse::fail("poorly formatted user email");
    }
    if !safe_worksite_name(name) {
        return ApiResponse::fail("Invalid worksite name");
    }

    match state.worksites.add_user(name, email).await {
        Ok(()) => ApiResponse::ok(format!("Added {email} to {name}")),
        Err(Error::Conflict(_)) => ApiResponse::fail(format!("{email} already in {name}")),
        Err(e) => {
            ApiResponse::fail_with(format!("Could not add {email} to {name}"), e.to_string().into())
        }
    }
}

/// `DELETE /worksite/removeUser`
pub async fn remove_user(State(state): State<Arc<AppState>>, Json(body): Json<Membership>) -> ApiResponse {
    remove_user_impl(&state, &body.worksite_name, &body.user_email).await
}

pub(crate) async fn remove_user_impl(state: &AppState, name: &str, email: &str) -> ApiResponse {
    if name.is_empty() || email.is_empty() {
        return ApiResponse::fail("missing parameters");
    }
    if !safe_worksite_name(name) {
        return ApiResponse::fail("Invalid worksite name");
    }

    match state.worksites.remove_user(name, email).await {
        Ok(()) => ApiResponse::ok(format!("Removed {email} from {name}")),
        Err(Error::NotFound(reason)) => ApiResponse::fail(reason),
        Err(e) => {
            ApiResponse::fail_with(format!("Could not remove {email} from {name}"), e.to_string().into())
        }
    }
}

/// `POST /worksite/getWorksites` — names of every worksite a user belongs to.
pub async fn get_worksites(State(state): State<Arc<AppState>>, Json(body): Json<UserOnly>) -> ApiResponse {
    get_worksites_impl(&state, &body.user_email).await
}

pub(crate) async fn get_worksites_impl(state: &AppState, email: &str) -> ApiResponse {
    if email.is_empty() {
        return ApiResponse::fail("missing user email");
    }

    match state.worksites.worksites_for_user(email).await {
        Ok(names) => {
            let message = if names.is_empty() {
                format!("{email} has no worksites")
            } else {
                format!("{email} has worksites")
            };
            match serde_json::to_value(&names) {
                Ok(payload) => ApiResponse::ok_with(message, payload),
                Err(e) => ApiResponse::fail_with("Could not list worksites", e.to_string().into()),
            }
        }
        Err(e) => ApiResponse::fail_with("Could not list worksites", e.to_string().into()),
    }
}

/// `POST /worksite/sds` — read a cached sheet from a worksite's library.
///
/// Read-only: a miss is a failure, never a fetch.
pub async fn get_sheet(
    State(state): State<Arc<AppState>>, Json(body): Json<WorksiteSheetRequest>,
) -> ApiResponse {
    get_sheet_impl(&state, body).await
}

pub(crate) async fn get_sheet_impl(state: &AppState, body: WorksiteSheetRequest) -> ApiResponse {
    let Some(sds) = body.sds else {
        return ApiResponse::fail("missing parameters");
    };
    if body.worksite_name.is_empty() || sds.name.is_empty() || sds.manufacturer.is_empty() {
        return ApiResponse::fail("missing parameters");
    }
    if !safe_worksite_name(&body.worksite_name) {
        return ApiResponse::fail("Invalid worksite name");
    }

    let key = sheet_file_name(&sds.name, &sds.manufacturer);
    let scope = Scope::Worksite(body.worksite_name.clone());
    match state.store.read(&key, &scope).await {
        Ok(bytes) => ApiResponse::ok_with(format!("Retrieved {key}"), STANDARD.encode(bytes).into()),
        Err(e) => ApiResponse::fail_with(format!("Could not get {key}"), e.to_string().into()),
    }
}
