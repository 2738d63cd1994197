//! Process configuration assembled from environment variables.

use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{
    DEFAULT_CHAT_MODEL, DEFAULT_HOST, DEFAULT_LLM_TIMEOUT_SECS, DEFAULT_METRICS_TABLE,
    DEFAULT_OPENAI_BASE_URL, DEFAULT_PORT, DEFAULT_SEARCH_BASE_URL, DEFAULT_SYSTEM_PROMPT,
    DEFAULT_UTILITY_MODEL,
};
use crate::env_config::{env_non_empty, parse_with_default};
use crate::error::ConfigError;

static TABLE_NAME_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").ok());

/// A credential that never shows up in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed browser origin; `None` allows any origin.
    pub cors_origin: Option<String>,
    /// Page served at `/`; `None` serves the embedded page.
    pub index_html_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Secret,
    pub base_url: String,
    pub chat_model: String,
    pub utility_model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_key: Secret,
    pub engine_id: String,
    pub base_url: String,
}

/// Where the usage counters live.
#[derive(Debug, Clone)]
pub enum MetricsStoreConfig {
    /// Managed store reached over its REST interface.
    Rest { url: String, service_key: Secret, table: String },
    /// Direct Postgres connection.
    Postgres { database_url: Secret, table: String },
    /// Process-local counters, lost on restart.
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub system_prompt: String,
    /// `None` denies every admin request.
    pub admin_password: Option<Secret>,
    pub metrics: MetricsStoreConfig,
    /// `None` disables citation augmentation.
    pub search: Option<SearchConfig>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_non_empty)
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values must be reported as `None` by `lookup`.
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = ServerConfig {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port: parse_with_default("PORT", lookup("PORT"), DEFAULT_PORT),
            cors_origin: lookup("CORS_ORIGIN"),
            index_html_path: lookup("INDEX_HTML_PATH").map(PathBuf::from),
        };

        let llm = LlmConfig {
            api_key: lookup("OPENAI_API_KEY")
                .map(Secret::new)
                .ok_or(ConfigError::Missing("OPENAI_API_KEY"))?,
            base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_owned())
                .trim_end_matches('/')
                .to_owned(),
            chat_model: lookup("CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_owned()),
            utility_model: lookup("UTILITY_MODEL")
                .unwrap_or_else(|| DEFAULT_UTILITY_MODEL.to_owned()),
            timeout_secs: parse_with_default(
                "LLM_TIMEOUT_SECS",
                lookup("LLM_TIMEOUT_SECS"),
                DEFAULT_LLM_TIMEOUT_SECS,
            ),
        };

        let table = match lookup("METRICS_TABLE") {
            Some(t) => validate_table_name(&t)?,
            None => DEFAULT_METRICS_TABLE.to_owned(),
        };

        let metrics = match (lookup("SUPABASE_URL"), lookup("SUPABASE_SERVICE_ROLE_KEY")) {
            (Some(url), Some(key)) => MetricsStoreConfig::Rest {
                url: url.trim_end_matches('/').to_owned(),
                service_key: Secret::new(key),
                table,
            },
            (Some(_), None) => {
                return Err(ConfigError::Incomplete {
                    var: "SUPABASE_URL",
                    requires: "SUPABASE_SERVICE_ROLE_KEY",
                });
            },
            (None, _) => match lookup("DATABASE_URL") {
                Some(database_url) => {
                    MetricsStoreConfig::Postgres { database_url: Secret::new(database_url), table }
                },
                None => MetricsStoreConfig::Memory,
            },
        };

        let search = match (lookup("GOOGLE_API_KEY"), lookup("GOOGLE_CSE_ID")) {
            (Some(api_key), Some(engine_id)) => Some(SearchConfig {
                api_key: Secret::new(api_key),
                engine_id,
                base_url: lookup("SEARCH_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_SEARCH_BASE_URL.to_owned()),
            }),
            (Some(_), None) => {
                return Err(ConfigError::Incomplete { var: "GOOGLE_API_KEY", requires: "GOOGLE_CSE_ID" });
            },
            (None, _) => None,
        };

        Ok(Self {
            server,
            llm,
            system_prompt: lookup("SYSTEM_PROMPT")
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_owned()),
            admin_password: lookup("ADMIN_PASSWORD").map(Secret::new),
            metrics,
            search,
        })
    }
}

/// The table name is interpolated into SQL and URLs, so only plain identifiers pass.
fn validate_table_name(name: &str) -> Result<String, ConfigError> {
    let valid = TABLE_NAME_RE.as_ref().is_some_and(|re| re.is_match(name));
    if valid {
        Ok(name.to_owned())
    } else {
        Err(ConfigError::Invalid {
            var: "METRICS_TABLE",
            reason: format!("'{name}' is not a plain identifier"),
        })
    }
}
