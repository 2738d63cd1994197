//! Service layer for chatrelay
//!
//! Sequences the completion and search adapters into one chat reply.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]

mod citations;
mod conversation_service;
mod error;

pub use citations::{append_citations, is_affirmative, sanitize_search_query};
pub use conversation_service::{ConversationService, ConversationSettings};
pub use error::ServiceError;
