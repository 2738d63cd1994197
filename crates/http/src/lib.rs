//! HTTP API server for chatrelay.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]

pub mod api_error;
mod handlers;
mod index;
mod query_types;
mod response_types;

use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use chatrelay_core::Secret;
use chatrelay_service::ConversationService;
use chatrelay_storage::MetricsRecorder;

pub use index::{DEFAULT_INDEX_HTML, load_index_html};
pub use query_types::{AdminQuery, ChatRequest};
pub use response_types::{ChatResponse, VersionResponse};

/// Shared application state for all HTTP handlers.
///
/// Holds no per-request state; concurrent requests only share the
/// orchestrator (immutable) and the recorder (store-side atomicity).
pub struct AppState {
    pub conversation: Arc<ConversationService>,
    pub metrics: MetricsRecorder,
    pub admin_password: Option<Secret>,
    pub index_html: String,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index::serve_index))
        .route("/view", get(handlers::views::record_view))
        .route("/chat", post(handlers::chat::chat))
        .route("/admin", get(handlers::admin::get_metrics))
        .route("/health", get(health))
        .route("/version", get(version))
        .with_state(state)
}

/// CORS for the browser client. `None` allows any origin.
///
/// # Errors
/// Returns an error if `origin` is not a valid header value.
pub fn cors_layer(origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    Ok(match origin {
        Some(origin) => layer.allow_origin(HeaderValue::from_str(origin)?),
        None => layer.allow_origin(Any),
    })
}

async fn health() -> &'static str {
    "ok"
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}
