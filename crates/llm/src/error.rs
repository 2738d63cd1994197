//! Typed error enum for the LLM crate.

use thiserror::Error;

/// Errors from completion API calls.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("empty response: no content returned")]
    EmptyResponse,
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}
