//! Text-generation contract consumed by the chat core.

use super::provider::{CompletionOptions, LlmError, LlmProvider};
use crate::server::metrics;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Upper bound on lyric characters forwarded to the model.
const MAX_LYRICS_CHARS: usize = 4000;

/// Natural-language generation used by the chat handlers and mood analysis.
#[async_trait]
pub trait AiResponder: Send + Sync {
    /// Free-form completion of a single prompt.
    async fn generate_response(&self, prompt: &str) -> Result<String, LlmError>;

    /// Answers `query` about the song described by `song_info`.
    async fn analyze_lyrics(
        &self,
        query: &str,
        lyrics: &str,
        song_info: &str,
    ) -> Result<String, LlmError>;
}

/// Builds the lyric-analysis prompt sent to the model.
pub fn build_lyrics_prompt(query: &str, lyrics: &str, song_info: &str) -> String {
    let excerpt: String = lyrics.chars().take(MAX_LYRICS_CHARS).collect();
    format!(
        "You are analyzing \"{song_info}\". Answer in EXACTLY 2 short paragraphs only. Be concise.\n\n\
         Question: {query}\n\n\
         Keep it brief - maximum 4-5 sentences per paragraph. Focus only on the most important points.\n\n\
         Lyrics:\n{excerpt}"
    )
}

/// Adapts any [`LlmProvider`] to [`AiResponder`].
///
/// Every call runs under `options.timeout` as a hard deadline, on top of
/// whatever timeout the HTTP client applies.
pub struct LlmResponder {
    provider: Arc<dyn LlmProvider>,
    options: CompletionOptions,
}

impl LlmResponder {
    pub fn new(provider: Arc<dyn LlmProvider>, options: CompletionOptions) -> Self {
        Self { provider, options }
    }

    async fn complete(&self, operation: &str, prompt: String) -> Result<String, LlmError> {
        let start = Instant::now();

        let result = tokio::time::timeout(
            self.options.timeout,
            self.provider.complete(&prompt, &self.options),
        )
        .await
        .unwrap_or(Err(LlmError::Timeout));

        metrics::record_ai_request(operation, start.elapsed());

        match result {
            Ok(text) => {
                debug!(
                    provider = self.provider.name(),
                    operation,
                    answer_chars = text.len(),
                    "AI completion finished"
                );
                Ok(text.trim().to_string())
            }
            Err(e) => {
                warn!(provider = self.provider.name(), operation, error = %e, "AI completion failed");
                Err(e)
            }
        }
    }
}

#[async_trait]
impl AiResponder for LlmResponder {
    async fn generate_response(&self, prompt: &str) -> Result<String, LlmError> {
        self.complete("generate", prompt.to_string()).await
    }

    async fn analyze_lyrics(
        &self,
        query: &str,
        lyrics: &str,
        song_info: &str,
    ) -> Result<String, LlmError> {
        self.complete("analyze_lyrics", build_lyrics_prompt(query, lyrics, song_info))
            .await
    }
}
