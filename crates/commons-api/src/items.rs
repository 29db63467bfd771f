use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use commons_store::EntityKind;
use commons_types::api::{CategoryQuery, CreateItemRequest};

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::state::AppState;
use crate::validation::{self, INVALID_ITEM};

/// GET /api/items: available items only, optionally narrowed to one category.
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = match query.category.as_deref() {
        Some(category) => state.store.list_items_in_category(category)?,
        None => state.store.list_items()?,
    };
    Ok(Json(items))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .store
        .get_item(item_id)?
        .ok_or_else(|| ApiError::not_found(EntityKind::Item))?;
    Ok(Json(item))
}

pub async fn create_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = validation::json_body(payload, INVALID_ITEM)?;
    let draft = validation::item_draft(req)?;
    let item = state.store.create_item(draft, user.id)?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PATCH /api/items/{id}/request: claim the item.
pub async fn claim_item(
    State(state): State<AppState>,
    Path(item_id): Path<u64>,
    Extension(_user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.store.claim_item(item_id)?))
}
