use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use commons_store::{EntityKind, StoreError};
use commons_types::api::{ErrorBody, FieldError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),

    /// A domain rule refused the transition (full ride, claimed item).
    #[error("{0}")]
    Rejected(&'static str),

    #[error("{message}")]
    Invalid {
        message: &'static str,
        errors: Vec<FieldError>,
    },

    #[error("{0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Rejected(_) | Self::Invalid { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn not_found(kind: EntityKind) -> Self {
        Self::NotFound(match kind {
            EntityKind::User => "User not found",
            EntityKind::Ride => "Ride not found",
            EntityKind::Item => "Item not found",
            EntityKind::HelpRequest => "Help request not found",
        })
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, .. } => Self::not_found(kind),
            StoreError::NoSeatsAvailable(_) => Self::Rejected("No seats available"),
            StoreError::AlreadyClaimed(_) => Self::Rejected("Item is no longer available"),
            StoreError::UsernameTaken(name) => Self::Conflict(format!("Username {} is taken", name)),
            // Wiring or runtime faults, not something the client did.
            StoreError::OwnerNotFound(_)
            | StoreError::LockPoisoned(_)
            | StoreError::PasswordHash(_) => Self::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Invalid { message, errors } => ErrorBody {
                message: message.to_string(),
                errors,
            },
            Self::Internal(detail) => {
                error!("Request failed: {}", detail);
                ErrorBody::new("Internal server error")
            }
            other => ErrorBody::new(other.to_string()),
        };

        (status, Json(body)).into_response()
    }
}
