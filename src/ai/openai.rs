//! OpenAI-compatible backend over `/chat/completions`.
//!
//! Every prompt goes out as a lone user turn.

use super::provider::{check_status, CompletionOptions, LlmError, LlmProvider};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const HEALTH_CHECK_PROMPT: &str = "Test";

pub struct OpenAIProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAIProvider {
    /// `base_url` includes the version segment, e.g. `https://api.openai.com/v1`.
    /// An empty key counts as no key.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: [UserTurn {
                role: "user",
                content: prompt,
            }],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };
        debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            "Sending prompt to OpenAI-compatible API"
        );

        let response = self
            .authorize(self.client.post(format!("{}/chat/completions", self.base_url)))
            .json(&request)
            .timeout(options.timeout)
            .send()
            .await?;
        let reply: ChatCompletionResponse =
            check_status(response).await?.json().await.map_err(|e| {
                LlmError::InvalidResponse(format!("Failed to parse OpenAI response: {}", e))
            })?;

        reply.into_text()
    }

    /// One-token completion, so a wrong key or model fails here.
    async fn health_check(&self) -> Result<(), LlmError> {
        if self.api_key.is_none() && self.base_url.contains("api.openai.com") {
            return Err(LlmError::Connection(
                "OpenAI API key not provided".to_string(),
            ));
        }

        let options = CompletionOptions {
            temperature: 0.0,
            max_tokens: Some(1),
            timeout: Duration::from_secs(5),
        };
        self.complete(HEALTH_CHECK_PROMPT, &options).await.map(|_| ())
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [UserTurn<'a>; 1],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct UserTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice. A null content reads as empty.
    fn into_text(self) -> Result<String, LlmError> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| LlmError::InvalidResponse("No choices in OpenAI response".to_string()))
    }
}
