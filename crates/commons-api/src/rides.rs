use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use commons_store::EntityKind;
use commons_types::api::CreateRideRequest;

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::state::AppState;
use crate::validation::{self, INVALID_RIDE};

pub async fn list_rides(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.store.list_rides()?))
}

pub async fn get_ride(
    State(state): State<AppState>,
    Path(ride_id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let ride = state
        .store
        .get_ride(ride_id)?
        .ok_or_else(|| ApiError::not_found(EntityKind::Ride))?;
    Ok(Json(ride))
}

pub async fn create_ride(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<CreateRideRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = validation::json_body(payload, INVALID_RIDE)?;
    let draft = validation::ride_draft(req)?;
    let ride = state.store.create_ride(draft, user.id)?;
    Ok((StatusCode::CREATED, Json(ride)))
}

/// PATCH /api/rides/{id}/request: take one seat.
pub async fn request_seat(
    State(state): State<AppState>,
    Path(ride_id): Path<u64>,
    Extension(_user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.store.request_seat(ride_id)?))
}
