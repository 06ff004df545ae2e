//! OpenAI-compatible chat completions backend.

use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use serde_json::json;

use super::{CompletionRequest, TextGenerator};
use crate::client::handle_response;
use crate::config::LlmConfig;
use crate::error::{ClientError, ClientResult};

/// Chat completions client.
#[derive(Clone)]
pub struct OpenAiGenerator {
    client: ClientWithMiddleware,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiGenerator {
    /// Create a backend from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &LlmConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: super::http_client(config.request_timeout)?,
            url: format!("{}/v1/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait::async_trait]
impl TextGenerator for OpenAiGenerator {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> ClientResult<String> {
        let api_key = self.api_key.as_deref().ok_or(ClientError::MissingApiKey("openai"))?;

        // The system instruction travels as the first message.
        let mut messages = vec![json!({"role": "system", "content": request.system})];
        messages.extend(
            request
                .messages
                .iter()
                .map(|m| json!({"role": m.role, "content": m.content})),
        );

        let body = json!({
            "model": self.model,
            "max_tokens": request.max_tokens,
            "messages": messages,
        });

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let response = handle_response(response).await?;
        let parsed: ChatResponse = response.json().await?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ClientError::provider("response carried no message content"))
    }
}

impl std::fmt::Debug for OpenAiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiGenerator").field("model", &self.model).finish()
    }
}
