//! Text-generation capability.
//!
//! Every generation step in the discovery pipeline (query expansion, the three term
//! tiers, relevance filtering) goes through [`TextGenerator`]: a system instruction
//! and role-tagged messages in, text out. Backends are interchangeable.

mod anthropic;
mod openai;

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use anthropic::AnthropicGenerator;
pub use openai::OpenAiGenerator;

use crate::config::{LlmConfig, LlmProvider};
use crate::error::ClientResult;

/// Message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The caller.
    User,
    /// The model.
    Assistant,
}

/// One role-tagged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who wrote it.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl Message {
    /// A user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    /// An assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// A text-completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// System instruction.
    pub system: String,
    /// Conversation so far.
    pub messages: Vec<Message>,
    /// Output token budget.
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// A single-turn request.
    #[must_use]
    pub fn single(system: impl Into<String>, prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self { system: system.into(), messages: vec![Message::user(prompt)], max_tokens }
    }

    /// Text of the last user message (handy for routing in fakes and logs).
    #[must_use]
    pub fn last_user_text(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

/// Prompt in, text out.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Generate a completion.
    async fn complete(&self, request: CompletionRequest) -> ClientResult<String>;
}

/// Build the configured backend.
///
/// # Errors
///
/// Returns error if HTTP client initialization fails.
pub fn from_config(config: &LlmConfig) -> anyhow::Result<Arc<dyn TextGenerator>> {
    Ok(match config.provider {
        LlmProvider::Anthropic => Arc::new(AnthropicGenerator::new(config)?),
        LlmProvider::OpenAi => Arc::new(OpenAiGenerator::new(config)?),
    })
}

/// Shared HTTP client construction for backends.
pub(crate) fn http_client(
    timeout: Duration,
) -> anyhow::Result<reqwest_middleware::ClientWithMiddleware> {
    let client = reqwest::Client::builder().timeout(timeout).gzip(true).build()?;
    Ok(reqwest_middleware::ClientBuilder::new(client).build())
}

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[a-zA-Z]*\s*|\s*```$").expect("valid code fence pattern"));

/// Parse a response that should be exactly a JSON array of strings.
///
/// Markdown code fences around the array are tolerated.
#[must_use]
pub fn parse_string_array(raw: &str) -> Option<Vec<String>> {
    let trimmed = CODE_FENCE.replace_all(raw.trim(), "");
    serde_json::from_str(trimmed.trim()).ok()
}

/// Find the first JSON array embedded in free text and decode it.
///
/// Surrounding prose is ignored. Each `[` is tried as the start of an array and the
/// first one that decodes wins, so brackets inside string elements are fine.
#[must_use]
pub fn extract_json_array<T>(raw: &str) -> Option<Vec<T>>
where
    T: serde::de::DeserializeOwned,
{
    raw.match_indices('[').find_map(|(start, _)| {
        serde_json::Deserializer::from_str(&raw[start..])
            .into_iter::<Vec<T>>()
            .next()
            .and_then(Result::ok)
    })
}

/// Trim, drop blanks, and keep at most `max` terms.
#[must_use]
pub fn clean_terms(terms: Vec<String>, max: usize) -> Vec<String> {
    terms
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .take(max)
        .collect()
}
