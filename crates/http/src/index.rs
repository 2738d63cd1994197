//! Chat page served at `/`.

use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use chatrelay_core::ConfigError;

use crate::AppState;

/// Minimal chat client used when no page is configured.
pub const DEFAULT_INDEX_HTML: &str = include_str!("index.html");

/// Read the page once at startup; `None` selects the embedded page.
pub fn load_index_html(path: Option<&Path>) -> Result<String, ConfigError> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source }),
        None => Ok(DEFAULT_INDEX_HTML.to_owned()),
    }
}

pub async fn serve_index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.index_html.clone())
}
