//! Web search for citation links.
//!
//! Talks to the Google Programmable Search JSON API and returns only the
//! result links, ranked as the API returns them.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]

mod client;
pub mod error;

pub use client::{SearchClient, WebSearch};
pub use error::SearchError;
