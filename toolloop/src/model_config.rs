//! Model and embedding endpoint settings read from the environment.
//!
//! Callers load `.env` / `config.toml` into the process environment first (see the
//! `config` crate), then call [`ModelConfig::from_env`].

use async_openai::config::OpenAIConfig;

use crate::graph::DEFAULT_RECURSION_LIMIT;
use crate::retrieval::DEFAULT_EMBEDDING_MODEL;

pub const DEFAULT_CHAT_MODEL: &str = "Qwen/Qwen3-8B";

/// Chat and embedding endpoints plus the agent's step budget.
///
/// Embedding key and base URL fall back to the chat ones when unset.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelConfig {
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub model: String,
    pub embedding_api_key: Option<String>,
    pub embedding_base_url: Option<String>,
    pub embedding_model: String,
    pub recursion_limit: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: None,
            model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_api_key: None,
            embedding_base_url: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl ModelConfig {
    /// Reads `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_MODEL`, `EMBEDDING_API_KEY`,
    /// `EMBEDDING_BASE_URL`, `EMBEDDING_MODEL` and `TOOLLOOP_RECURSION_LIMIT`. No variable
    /// is required; unset or empty values yield `None` or the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        let recursion_limit = match get("TOOLLOOP_RECURSION_LIMIT") {
            None => defaults.recursion_limit,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    tracing::warn!(value = %raw, "ignoring invalid TOOLLOOP_RECURSION_LIMIT");
                    defaults.recursion_limit
                }
            },
        };
        Self {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL"),
            model: get("OPENAI_MODEL").unwrap_or(defaults.model),
            embedding_api_key: get("EMBEDDING_API_KEY"),
            embedding_base_url: get("EMBEDDING_BASE_URL"),
            embedding_model: get("EMBEDDING_MODEL").unwrap_or(defaults.embedding_model),
            recursion_limit,
        }
    }

    fn openai_config(api_key: Option<&String>, base_url: Option<&String>) -> OpenAIConfig {
        let mut config = OpenAIConfig::new();
        if let Some(key) = api_key {
            config = config.with_api_key(key.clone());
        }
        if let Some(base) = base_url {
            config = config.with_api_base(base.trim_end_matches('/').to_string());
        }
        config
    }

    /// Client config for chat completions.
    pub fn chat_config(&self) -> OpenAIConfig {
        Self::openai_config(self.openai_api_key.as_ref(), self.openai_base_url.as_ref())
    }

    /// Client config for embeddings.
    pub fn embedding_config(&self) -> OpenAIConfig {
        Self::openai_config(
            self.embedding_api_key.as_ref().or(self.openai_api_key.as_ref()),
            self.embedding_base_url
                .as_ref()
                .or(self.openai_base_url.as_ref()),
        )
    }
}
