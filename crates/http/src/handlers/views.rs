use axum::extract::State;
use axum::http::StatusCode;
use std::sync::Arc;

use crate::AppState;

/// Count a page view. Always succeeds, even if the store is unreachable.
pub async fn record_view(State(state): State<Arc<AppState>>) -> StatusCode {
    state.metrics.increment_page_view().await;
    StatusCode::OK
}
