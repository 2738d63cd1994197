use axum::Json;
use axum::extract::{Query, State};
use chatrelay_core::Metrics;
use std::sync::Arc;

use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::AdminQuery;

/// Current counters, guarded by an exact match on the configured password.
/// Without a configured password every request is denied.
pub async fn get_metrics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AdminQuery>,
) -> Result<Json<Metrics>, ApiError> {
    let authorized = match (&state.admin_password, query.password.as_deref()) {
        (Some(expected), Some(given)) => expected.expose() == given,
        _ => false,
    };
    if !authorized {
        tracing::warn!("admin metrics request denied");
        return Err(ApiError::Forbidden);
    }
    Ok(Json(state.metrics.read_metrics().await))
}
