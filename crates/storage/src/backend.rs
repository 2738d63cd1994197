//! Unified metrics backend with enum dispatch.

use std::sync::Arc;

use async_trait::async_trait;
use chatrelay_core::{Counter, Metrics, MetricsStoreConfig};

use crate::error::StorageError;
use crate::memory::MemoryMetricsStore;
use crate::pg::PgMetricsStore;
use crate::rest::RestMetricsStore;
use crate::traits::MetricsStore;

macro_rules! dispatch {
    ($self:expr, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            MetricsBackend::Rest(s) => s.$method($($arg),*).await,
            MetricsBackend::Postgres(s) => s.$method($($arg),*).await,
            MetricsBackend::Memory(s) => s.$method($($arg),*).await,
        }
    };
}

#[derive(Clone, Debug)]
pub enum MetricsBackend {
    Rest(RestMetricsStore),
    Postgres(PgMetricsStore),
    /// Shared so clones observe the same counters.
    Memory(Arc<MemoryMetricsStore>),
}

impl MetricsBackend {
    pub fn rest(base_url: &str, service_key: &str, table: &str) -> Result<Self, StorageError> {
        Ok(Self::Rest(RestMetricsStore::new(base_url, service_key, table)?))
    }

    /// No connection is made until the first query.
    pub fn postgres(database_url: &str, table: &str) -> Result<Self, StorageError> {
        Ok(Self::Postgres(PgMetricsStore::new(database_url, table)?))
    }

    #[must_use]
    pub fn memory() -> Self {
        Self::Memory(Arc::new(MemoryMetricsStore::new()))
    }

    /// Build the backend selected by configuration. Only malformed settings
    /// fail here; an unreachable store is reported per call.
    pub fn from_config(config: &MetricsStoreConfig) -> Result<Self, StorageError> {
        match config {
            MetricsStoreConfig::Rest { url, service_key, table } => {
                tracing::info!(url = %url, table = %table, "using REST metrics store");
                Self::rest(url, service_key.expose(), table)
            },
            MetricsStoreConfig::Postgres { database_url, table } => {
                tracing::info!(table = %table, "using Postgres metrics store");
                Self::postgres(database_url.expose(), table)
            },
            MetricsStoreConfig::Memory => {
                tracing::warn!("no metrics store configured, counters are in-process and not persisted");
                Ok(Self::memory())
            },
        }
    }
}

#[async_trait]
impl MetricsStore for MetricsBackend {
    async fn fetch(&self) -> Result<Metrics, StorageError> {
        dispatch!(self, fetch())
    }

    async fn insert_default(&self) -> Result<(), StorageError> {
        dispatch!(self, insert_default())
    }

    async fn increment(&self, counter: Counter) -> Result<(), StorageError> {
        dispatch!(self, increment(counter))
    }
}
