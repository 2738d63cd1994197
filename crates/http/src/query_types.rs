//! Request/query types (Deserialize)

use chatrelay_core::ChatMessage;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    pub password: Option<String>,
}
