use async_trait::async_trait;
use chatrelay_core::{Counter, Metrics};

use crate::error::StorageError;

/// Raw access to the singleton metrics record.
///
/// Implementations report every failure; the best-effort policy lives in
/// [`crate::MetricsRecorder`].
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Read the record. A missing row is `StorageError::NotFound`.
    async fn fetch(&self) -> Result<Metrics, StorageError>;

    /// Create the record with zeroed counters. Existing rows are left untouched.
    async fn insert_default(&self) -> Result<(), StorageError>;

    /// Atomically add one to `counter`.
    async fn increment(&self, counter: Counter) -> Result<(), StorageError>;
}
