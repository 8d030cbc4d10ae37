//! Shutdown record endpoints.

use axum::extract::{Path, State};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::ShutdownRecord;
use crate::AppState;

/// GET /api/shutdowns - List all records in table order.
pub async fn list_shutdowns(State(state): State<AppState>) -> ApiResult<Vec<ShutdownRecord>> {
    success(state.store.records().to_vec())
}

/// GET /api/shutdowns/{id} - Get a single record.
pub async fn get_shutdown(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ShutdownRecord> {
    match state.store.get(&id) {
        Some(record) => success(record.clone()),
        None => Err(AppError::NotFound(format!("Shutdown {} not found", id))),
    }
}
