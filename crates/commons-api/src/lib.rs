pub mod error;
pub mod help_requests;
pub mod items;
pub mod middleware;
pub mod rides;
pub mod state;
pub mod users;
pub mod validation;

use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, patch},
};

pub use error::ApiError;
pub use state::{AppState, AppStateInner};

/// Every route the service exposes. Cross-cutting layers (CORS, tracing) are
/// added by the binary.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/rides", get(rides::list_rides).post(rides::create_ride))
        .route("/api/rides/{id}", get(rides::get_ride))
        .route("/api/rides/{id}/request", patch(rides::request_seat))
        .route("/api/items", get(items::list_items).post(items::create_item))
        .route("/api/items/{id}", get(items::get_item))
        .route("/api/items/{id}/request", patch(items::claim_item))
        .route(
            "/api/help-requests",
            get(help_requests::list_help_requests).post(help_requests::create_help_request),
        )
        .route("/api/help-requests/{id}", get(help_requests::get_help_request))
        .route(
            "/api/help-requests/{id}/offer-help",
            patch(help_requests::offer_help),
        )
        .route("/api/users/me", get(users::me))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::demo_principal,
        ))
        .with_state(state);

    Router::new().route("/health", get(health)).merge(api)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
