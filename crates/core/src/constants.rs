//! Fixed prompts, model defaults and limits.

/// Default primary model used to generate the reply.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4.1";

/// Default lighter model used for terminality classification and query synthesis.
pub const DEFAULT_UTILITY_MODEL: &str = "gpt-4.1-mini";

/// Default completion API base URL (OpenAI-compatible).
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Default Google Programmable Search endpoint.
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// System prompt used when `SYSTEM_PROMPT` is not set.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Table holding the singleton metrics record.
pub const DEFAULT_METRICS_TABLE: &str = "metricsplus";

pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Question appended after the generated reply to ask whether the conversation is over.
pub const TERMINALITY_QUESTION: &str =
    "Has this conversation reached a final answer or conclusion? Answer with only yes or no.";

/// Output cap for the terminality question.
pub const TERMINALITY_MAX_TOKENS: u32 = 5;

/// Token whose presence in the classifier output marks the conversation final.
pub const AFFIRMATIVE_TOKEN: &str = "yes";

/// Prompt asking the utility model for a web search query.
pub const QUERY_EXTRACTION_PROMPT: &str = "Write a short web search query (a few words) that would find sources supporting the answer above. Reply with the query only.";

/// Output cap for query synthesis.
pub const QUERY_MAX_TOKENS: u32 = 20;

/// Number of links requested from the search API.
pub const CITATION_LIMIT: usize = 3;

/// Inserted between the reply and the numbered link list.
pub const CITATION_SEPARATOR: &str = "\n\n---\n📚 References\n";
