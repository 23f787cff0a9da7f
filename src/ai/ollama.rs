//! Ollama backend over the non-streaming `/api/generate` endpoint.

use super::provider::{check_status, CompletionOptions, LlmError, LlmProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    /// `base_url` is the server root, e.g. `http://localhost:11434`.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: options.temperature,
                num_predict: options.max_tokens,
            },
        };
        debug!(model = %self.model, prompt_chars = prompt.len(), "Sending prompt to Ollama");

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .timeout(options.timeout)
            .send()
            .await?;
        let reply: GenerateResponse = check_status(response).await?.json().await.map_err(|e| {
            LlmError::InvalidResponse(format!("Failed to parse Ollama response: {}", e))
        })?;

        reply.into_text()
    }

    /// Reachability check. A missing model is only a warning since it can be
    /// pulled while the server runs.
    async fn health_check(&self) -> Result<(), LlmError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(Duration::from_secs(5))
            .send()
            .await?;
        let tags: TagsResponse = check_status(response).await?.json().await.map_err(|e| {
            LlmError::InvalidResponse(format!("Failed to parse tags response: {}", e))
        })?;

        if !tags.models.iter().any(|m| m.name == self.model) {
            warn!(model = %self.model, "Model not available in Ollama, run `ollama pull` for it");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    error: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Result<String, LlmError> {
        match self.error {
            Some(error) => Err(LlmError::InvalidResponse(format!("Ollama error: {}", error))),
            None => Ok(self.response),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generate_request_shape() {
        let request = GenerateRequest {
            model: "llama3.2:3b",
            prompt: "What is jazz?",
            stream: false,
            options: GenerateOptions {
                temperature: 0.5,
                num_predict: None,
            },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "llama3.2:3b",
                "prompt": "What is jazz?",
                "stream": false,
                "options": { "temperature": 0.5 }
            })
        );
    }

    #[test]
    fn reads_generated_text() {
        let body = r#"{
            "model": "llama3.2:3b",
            "response": "Jazz grew out of New Orleans.",
            "done": true,
            "eval_count": 40
        }"#;
        let reply: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(reply.into_text().unwrap(), "Jazz grew out of New Orleans.");
    }

    #[test]
    fn error_field_becomes_invalid_response() {
        let reply: GenerateResponse =
            serde_json::from_str(r#"{ "error": "model 'x' not found" }"#).unwrap();
        assert!(matches!(
            reply.into_text(),
            Err(LlmError::InvalidResponse(msg)) if msg.contains("model 'x' not found")
        ));
    }

    #[test]
    fn trims_trailing_slash() {
        let provider = OllamaProvider::new("http://localhost:11434/", "llama3.2:3b");
        assert_eq!(provider.base_url, "http://localhost:11434");
        assert_eq!(provider.name(), "ollama");
    }
}
