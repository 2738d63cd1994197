//! Process-local metrics store.
//!
//! Counters live behind a single mutex, so concurrent increments never race.
//! Nothing survives a restart.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chatrelay_core::{Counter, Metrics};

use crate::error::StorageError;
use crate::traits::MetricsStore;

#[derive(Debug, Default)]
pub struct MemoryMetricsStore {
    row: Mutex<Option<Metrics>>,
}

impl MemoryMetricsStore {
    /// Empty store; the row is created by `insert_default`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose row already exists with the given counters.
    #[must_use]
    pub fn with_row(metrics: Metrics) -> Self {
        Self { row: Mutex::new(Some(metrics)) }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Metrics>> {
        // Counters stay consistent even if a holder panicked: every update is a single add.
        self.row.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl MetricsStore for MemoryMetricsStore {
    async fn fetch(&self) -> Result<Metrics, StorageError> {
        (*self.lock()).ok_or_else(StorageError::metrics_row_missing)
    }

    async fn insert_default(&self) -> Result<(), StorageError> {
        let mut row = self.lock();
        if row.is_none() {
            *row = Some(Metrics::default());
        }
        Ok(())
    }

    async fn increment(&self, counter: Counter) -> Result<(), StorageError> {
        let mut row = self.lock();
        let metrics = row.as_mut().ok_or_else(StorageError::metrics_row_missing)?;
        match counter {
            Counter::PageViews => metrics.page_views = metrics.page_views.saturating_add(1),
            Counter::MessageCount => {
                metrics.message_count = metrics.message_count.saturating_add(1);
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_before_insert_is_not_found() {
        let store = MemoryMetricsStore::new();
        let err = store.fetch().await.unwrap_err();
        assert!(err.is_not_found());
        assert!(store.increment(Counter::PageViews).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn insert_default_does_not_reset_existing_row() {
        let store = MemoryMetricsStore::with_row(Metrics { page_views: 4, message_count: 2 });
        store.insert_default().await.unwrap();
        assert_eq!(store.fetch().await.unwrap(), Metrics { page_views: 4, message_count: 2 });
    }

    #[tokio::test]
    async fn increments_touch_only_their_counter() {
        let store = MemoryMetricsStore::new();
        store.insert_default().await.unwrap();
        store.increment(Counter::PageViews).await.unwrap();
        store.increment(Counter::PageViews).await.unwrap();
        store.increment(Counter::MessageCount).await.unwrap();
        assert_eq!(store.fetch().await.unwrap(), Metrics { page_views: 2, message_count: 1 });
    }
}
