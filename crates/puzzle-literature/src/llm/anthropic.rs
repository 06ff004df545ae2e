//! Anthropic Messages API backend.

use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use serde_json::json;

use super::{CompletionRequest, TextGenerator};
use crate::client::handle_response;
use crate::config::{LlmConfig, llm};
use crate::error::{ClientError, ClientResult};

/// Messages API client.
#[derive(Clone)]
pub struct AnthropicGenerator {
    client: ClientWithMiddleware,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl AnthropicGenerator {
    /// Create a backend from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &LlmConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: super::http_client(config.request_timeout)?,
            url: format!("{}/v1/messages", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[async_trait::async_trait]
impl TextGenerator for AnthropicGenerator {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, request: CompletionRequest) -> ClientResult<String> {
        let api_key = self.api_key.as_deref().ok_or(ClientError::MissingApiKey("anthropic"))?;

        let body = json!({
            "model": self.model,
            "max_tokens": request.max_tokens,
            "system": request.system,
            "messages": request.messages,
        });

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", api_key)
            .header("anthropic-version", llm::ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let response = handle_response(response).await?;
        let parsed: MessagesResponse = response.json().await?;

        let text: String = parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        if text.trim().is_empty() {
            return Err(ClientError::provider("response carried no text content"));
        }
        Ok(text)
    }
}

impl std::fmt::Debug for AnthropicGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicGenerator").field("model", &self.model).finish()
    }
}
