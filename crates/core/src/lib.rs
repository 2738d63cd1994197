//! Core types and configuration for chatrelay
//!
//! This crate contains domain types shared across all other crates.

mod chat;
mod config;
pub mod constants;
mod env_config;
mod error;
mod metrics;

pub use chat::*;
pub use config::*;
pub use constants::*;
pub use env_config::env_parse_with_default;
pub use error::*;
pub use metrics::*;
