//! Typed error enum for the storage layer.
//!
//! Lets the recorder tell a missing metrics row (create it) apart from an
//! unreachable store (log and carry on).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Row not found for expected-present entity.
    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// SQL / connection / timeout failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Transport failure talking to the REST store.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// REST store answered with a non-success status.
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },

    /// Row data could not be deserialized into domain type.
    #[error("data corruption: {context}")]
    DataCorruption {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Schema setup failure.
    #[error("migration error: {0}")]
    Migration(String),
}

impl StorageError {
    pub(crate) fn metrics_row_missing() -> Self {
        Self::NotFound { entity: "metrics", id: chatrelay_core::METRICS_ROW_ID.to_string() }
    }

    /// Whether this error means the metrics row does not exist yet.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// `RowNotFound` maps to `NotFound`; everything else is a database error.
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::metrics_row_missing(),
            other => Self::Database(other),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::DataCorruption {
            context: "JSON serialization/deserialization".to_owned(),
            source: Box::new(err),
        }
    }
}
