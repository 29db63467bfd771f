use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use commons_store::EntityKind;
use commons_types::api::{CategoryQuery, CreateHelpRequestRequest};

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::state::AppState;
use crate::validation::{self, INVALID_HELP_REQUEST};

pub async fn list_help_requests(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let requests = match query.category.as_deref() {
        Some(category) => state.store.list_help_requests_in_category(category)?,
        None => state.store.list_help_requests()?,
    };
    Ok(Json(requests))
}

pub async fn get_help_request(
    State(state): State<AppState>,
    Path(request_id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let request = state
        .store
        .get_help_request(request_id)?
        .ok_or_else(|| ApiError::not_found(EntityKind::HelpRequest))?;
    Ok(Json(request))
}

pub async fn create_help_request(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<CreateHelpRequestRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = validation::json_body(payload, INVALID_HELP_REQUEST)?;
    let draft = validation::help_request_draft(req)?;
    let request = state.store.create_help_request(draft, user.id)?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn offer_help(
    State(state): State<AppState>,
    Path(request_id): Path<u64>,
    Extension(_user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.store.offer_help(request_id)?))
}
