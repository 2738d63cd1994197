//! Reply generation with optional citation augmentation.
//!
//! Per request: generate a reply with the chat model, ask the utility model
//! whether the conversation is finished, and if so have it write a search
//! query whose top links are appended to the reply. Only the first call is
//! mandatory; every later step falls back to the plain reply.

use std::sync::Arc;

use chatrelay_core::{
    AppConfig, CITATION_LIMIT, ChatMessage, QUERY_EXTRACTION_PROMPT, QUERY_MAX_TOKENS, SearchHit,
    TERMINALITY_MAX_TOKENS, TERMINALITY_QUESTION,
};
use chatrelay_llm::Completion;
use chatrelay_search::WebSearch;

use crate::citations::{append_citations, is_affirmative, sanitize_search_query};
use crate::error::ServiceError;

/// Prompt and model selection for [`ConversationService`].
#[derive(Debug, Clone)]
pub struct ConversationSettings {
    pub system_prompt: String,
    pub chat_model: String,
    pub utility_model: String,
}

impl From<&AppConfig> for ConversationSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            system_prompt: config.system_prompt.clone(),
            chat_model: config.llm.chat_model.clone(),
            utility_model: config.llm.utility_model.clone(),
        }
    }
}

pub struct ConversationService {
    completion: Arc<dyn Completion>,
    search: Option<Arc<dyn WebSearch>>,
    settings: ConversationSettings,
}

impl ConversationService {
    /// `search: None` disables citation augmentation; the terminality and
    /// query calls are then skipped too.
    #[must_use]
    pub fn new(
        completion: Arc<dyn Completion>,
        search: Option<Arc<dyn WebSearch>>,
        settings: ConversationSettings,
    ) -> Self {
        Self { completion, search, settings }
    }

    /// Produce the final reply for a client-supplied conversation.
    ///
    /// An empty conversation is forwarded as the system prompt alone.
    pub async fn respond(&self, messages: &[ChatMessage]) -> Result<String, ServiceError> {
        let initial = self.initial_messages(messages);
        let reply = self.generate(&initial).await?;

        let Some(search) = self.search.as_deref() else {
            return Ok(reply);
        };
        match self.citations(search, &initial, &reply).await {
            Some(hits) => Ok(append_citations(reply, &hits)),
            None => Ok(reply),
        }
    }

    fn initial_messages(&self, messages: &[ChatMessage]) -> Vec<ChatMessage> {
        let mut initial = Vec::with_capacity(messages.len() + 1);
        initial.push(ChatMessage::system(self.settings.system_prompt.clone()));
        initial.extend_from_slice(messages);
        initial
    }

    /// Step 1: the reply itself. Failure aborts the request.
    pub async fn generate(&self, initial: &[ChatMessage]) -> Result<String, ServiceError> {
        let reply = self.completion.complete(&self.settings.chat_model, initial, None).await?;
        tracing::debug!(model = %self.settings.chat_model, chars = reply.len(), "reply generated");
        Ok(reply)
    }

    async fn citations(
        &self,
        search: &dyn WebSearch,
        initial: &[ChatMessage],
        reply: &str,
    ) -> Option<Vec<SearchHit>> {
        if !self.classify_terminality(initial, reply).await {
            return None;
        }
        let query = self.synthesize_query(initial, reply).await?;
        Self::fetch_citations(search, &query).await
    }

    /// Step 2: ask the utility model whether the conversation has concluded.
    /// Failure counts as "not final".
    pub async fn classify_terminality(&self, initial: &[ChatMessage], reply: &str) -> bool {
        let messages = follow_up(initial, reply, TERMINALITY_QUESTION);
        match self
            .completion
            .complete(&self.settings.utility_model, &messages, Some(TERMINALITY_MAX_TOKENS))
            .await
        {
            Ok(output) => {
                let is_final = is_affirmative(&output);
                tracing::debug!(output = %output.trim(), is_final, "terminality classified");
                is_final
            },
            Err(e) => {
                tracing::warn!(error = %e, "terminality classification failed, skipping citations");
                false
            },
        }
    }

    /// Step 3: have the utility model write a search query for the reply.
    pub async fn synthesize_query(&self, initial: &[ChatMessage], reply: &str) -> Option<String> {
        let messages = follow_up(initial, reply, QUERY_EXTRACTION_PROMPT);
        match self
            .completion
            .complete(&self.settings.utility_model, &messages, Some(QUERY_MAX_TOKENS))
            .await
        {
            Ok(raw) => {
                let query = sanitize_search_query(&raw);
                if query.is_none() {
                    tracing::warn!(raw = %raw, "synthesized search query was empty");
                }
                query
            },
            Err(e) => {
                tracing::warn!(error = %e, "search query synthesis failed, skipping citations");
                None
            },
        }
    }

    /// Step 4: look up citation links. Failure and zero hits both yield `None`.
    pub async fn fetch_citations(search: &dyn WebSearch, query: &str) -> Option<Vec<SearchHit>> {
        match search.search(query, CITATION_LIMIT).await {
            Ok(hits) if hits.is_empty() => {
                tracing::debug!(query, "search returned no results");
                None
            },
            Ok(hits) => Some(hits),
            Err(e) => {
                tracing::warn!(query, error = %e, "citation search failed");
                None
            },
        }
    }
}

/// `initial` + the generated reply + one more user turn.
fn follow_up(initial: &[ChatMessage], reply: &str, question: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(initial.len() + 2);
    messages.extend_from_slice(initial);
    messages.push(ChatMessage::assistant(reply));
    messages.push(ChatMessage::user(question));
    messages
}
