//! LLM access for the chat core.
//!
//! A trait-based provider layer (Ollama, OpenAI-compatible) plus the
//! narrower [`AiResponder`] contract the chat handlers and mood analysis
//! call through.

mod ollama;
mod openai;
mod provider;
mod responder;

pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;
pub use provider::{CompletionOptions, LlmError, LlmProvider};
pub use responder::{build_lyrics_prompt, AiResponder, LlmResponder};
