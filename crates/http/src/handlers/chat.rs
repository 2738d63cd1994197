use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::ChatRequest;
use crate::response_types::ChatResponse;

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    state.metrics.increment_message_count().await;
    let reply = state.conversation.respond(&req.messages).await?;
    Ok(Json(ChatResponse { reply }))
}
