//! Status endpoints.

use axum::{extract::State, response::IntoResponse, response::Response};

use super::ApiResponse;
use crate::models::StatusSummary;
use crate::status::{self, NO_STORE_HEADERS};
use crate::AppState;

/// GET /down - 503 while a shutdown is ongoing, 200 otherwise. Empty body.
pub async fn get_down(State(state): State<AppState>) -> Response {
    let active = status::is_store_active(&state.store);
    tracing::debug!(active, "Evaluated shutdown status");
    status::respond(active)
}

/// GET /api/status - Current state with elapsed time for ongoing shutdowns.
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let summary = StatusSummary::evaluate(&state.store, state.clock.now());
    (NO_STORE_HEADERS, ApiResponse::new(summary))
}
