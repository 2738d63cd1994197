//! Chat completion client for chatrelay.

mod ai_types;
mod client;
mod client_tests;
pub mod error;

pub use client::{Completion, LlmClient, truncate};
pub use error::LlmError;
