//! Typed error enum for the service layer.
//!
//! Only failures of the mandatory reply generation surface here; every
//! optional step degrades inside the orchestrator.

use chatrelay_llm::LlmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Primary completion call failed; there is no reply to return.
    #[error("completion: {0}")]
    Completion(#[from] LlmError),
}
