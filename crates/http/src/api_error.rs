//! Typed API error for HTTP handlers.
//!
//! Bodies are short plain-text strings; upstream error details are logged
//! server-side and never sent to the browser.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chatrelay_service::ServiceError;

#[derive(Debug)]
pub enum ApiError {
    /// 403 Forbidden: admin password missing or wrong.
    Forbidden,
    /// 500 Internal Server Error: reply generation failed. Details logged, not exposed.
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Forbidden => (StatusCode::FORBIDDEN, "access denied").into_response(),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "completion service error").into_response()
            },
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::Internal(err.into())
    }
}
