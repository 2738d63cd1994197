use thiserror::Error;

/// Errors from the search API.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("search API status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("failed to parse search response: {0}")]
    JsonParse(#[from] serde_json::Error),
}
