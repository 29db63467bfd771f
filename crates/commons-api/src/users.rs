use axum::{Extension, Json, extract::State, response::IntoResponse};

use commons_store::EntityKind;
use commons_types::PublicUser;

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// GET /api/users/me: the acting user, without the password hash.
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .store
        .get_user(user.id)?
        .ok_or_else(|| ApiError::not_found(EntityKind::User))?;
    Ok(Json(PublicUser::from(user)))
}
