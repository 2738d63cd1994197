//! Storage layer for chatrelay
//!
//! Persists the singleton usage-counter record in Postgres, a PostgREST
//! managed store, or process memory.

mod backend;
pub mod error;
mod memory;
mod pg;
mod recorder;
mod rest;
pub mod traits;

pub use backend::MetricsBackend;
pub use error::StorageError;
pub use memory::MemoryMetricsStore;
pub use pg::PgMetricsStore;
pub use recorder::MetricsRecorder;
pub use rest::{INCREMENT_PROCEDURE, RestMetricsStore};
pub use traits::MetricsStore;
