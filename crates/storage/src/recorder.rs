//! Best-effort usage counters.
//!
//! Counters are administrative: a failing store must never fail the request
//! that triggered the update. Every method here logs and swallows errors.

use chatrelay_core::{Counter, Metrics, MetricsStoreConfig};

use crate::backend::MetricsBackend;
use crate::traits::MetricsStore;

#[derive(Clone, Debug)]
pub struct MetricsRecorder {
    store: MetricsBackend,
}

impl MetricsRecorder {
    #[must_use]
    pub const fn new(store: MetricsBackend) -> Self {
        Self { store }
    }

    /// Recorder for the configured store. Settings the backend cannot use are
    /// logged and replaced by process-local counters so the server still starts.
    #[must_use]
    pub fn from_config(config: &MetricsStoreConfig) -> Self {
        let backend = MetricsBackend::from_config(config).unwrap_or_else(|e| {
            tracing::error!(error = %e, "metrics store unusable, falling back to in-process counters");
            MetricsBackend::memory()
        });
        Self::new(backend)
    }

    /// Make sure the singleton row exists, creating it with zeroed counters
    /// when the lookup reports it missing. Other lookup failures leave the
    /// store untouched.
    pub async fn ensure_metrics_row(&self) {
        match self.store.fetch().await {
            Ok(metrics) => {
                tracing::info!(
                    page_views = metrics.page_views,
                    message_count = metrics.message_count,
                    "metrics row loaded"
                );
            },
            Err(e) if e.is_not_found() => match self.store.insert_default().await {
                Ok(()) => tracing::info!("metrics row created"),
                Err(e) => tracing::error!(error = %e, "failed to create metrics row"),
            },
            Err(e) => tracing::error!(error = %e, "failed to initialize metrics"),
        }
    }

    pub async fn increment_page_view(&self) {
        self.increment(Counter::PageViews).await;
    }

    pub async fn increment_message_count(&self) {
        self.increment(Counter::MessageCount).await;
    }

    async fn increment(&self, counter: Counter) {
        match self.store.increment(counter).await {
            Ok(()) => tracing::debug!(counter = counter.column(), "metrics counter incremented"),
            Err(e) => {
                tracing::warn!(counter = counter.column(), error = %e, "metrics update failed");
            },
        }
    }

    /// Current counters, or zeros when the store cannot be read.
    pub async fn read_metrics(&self) -> Metrics {
        self.store.fetch().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "metrics read failed, returning zeros");
            Metrics::default()
        })
    }
}
