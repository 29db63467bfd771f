use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// The principal a request acts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: u64,
}

/// Attach the fixed demo principal to every request. Stands where a token
/// check would go once sign-in exists.
pub async fn demo_principal(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    req.extensions_mut().insert(CurrentUser {
        id: state.demo_user_id,
    });
    next.run(req).await
}
