mod file_config;

pub use file_config::{AiConfig, ClassifierConfig, FileConfig, SpotifyConfig};

use crate::ai::CompletionOptions;
use crate::chat::{ChatSettings, ClassifierPolicy};
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub data_dir: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub play_history_size: usize,
    pub lyrics_cache_capacity: usize,
    pub matcher_concurrency: usize,
    pub ai_timeout_sec: u64,
    pub lyrics_timeout_sec: u64,
    pub ai_provider: Option<AiProviderKind>,
    pub ai_base_url: Option<String>,
    pub ai_model: Option<String>,
    pub openai_api_key: Option<String>,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AiProviderKind {
    #[default]
    Ollama,
    Openai,
}

impl AiProviderKind {
    fn default_base_url(&self) -> &'static str {
        match self {
            AiProviderKind::Ollama => "http://localhost:11434",
            AiProviderKind::Openai => "https://api.openai.com/v1",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            AiProviderKind::Ollama => "llama3.2:3b",
            AiProviderKind::Openai => "gpt-3.5-turbo",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub data_dir: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub play_history_size: usize,
    pub lyrics_cache_capacity: usize,
    pub matcher_concurrency: usize,
    pub ai_timeout_sec: u64,
    pub lyrics_timeout_sec: u64,
    pub lyrics_base_url: String,

    // Feature configs (with defaults)
    pub ai: AiSettings,
    pub spotify: Option<SpotifySettings>,
    pub classifier_policy: ClassifierPolicy,
}

/// Settings for the LLM provider.
#[derive(Debug, Clone)]
pub struct AiSettings {
    pub provider: AiProviderKind,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for AiSettings {
    fn default() -> Self {
        let provider = AiProviderKind::default();
        Self {
            provider,
            base_url: provider.default_base_url().to_string(),
            model: provider.default_model().to_string(),
            api_key: None,
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .or_else(|| cli.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from("./data"));
        if data_dir.exists() && !data_dir.is_dir() {
            bail!("data_dir is not a directory: {:?}", data_dir);
        }

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let play_history_size = file.play_history_size.unwrap_or(cli.play_history_size);
        if play_history_size == 0 {
            bail!("play_history_size must be at least 1");
        }
        let lyrics_cache_capacity = file
            .lyrics_cache_capacity
            .unwrap_or(cli.lyrics_cache_capacity);
        let matcher_concurrency = file.matcher_concurrency.unwrap_or(cli.matcher_concurrency);
        if matcher_concurrency == 0 {
            bail!("matcher_concurrency must be at least 1");
        }
        let ai_timeout_sec = file.ai_timeout_sec.unwrap_or(cli.ai_timeout_sec);
        let lyrics_timeout_sec = file.lyrics_timeout_sec.unwrap_or(cli.lyrics_timeout_sec);
        let lyrics_base_url = file
            .lyrics_base_url
            .unwrap_or_else(|| crate::lyrics::DEFAULT_LRCLIB_URL.to_string());

        // AI settings - merge file config, CLI and provider defaults
        let ai_file = file.ai.unwrap_or_default();
        let provider = match ai_file.provider {
            Some(name) => match AiProviderKind::from_str(&name, true) {
                Ok(provider) => provider,
                Err(_) => bail!("Unknown AI provider: {}", name),
            },
            None => cli.ai_provider.unwrap_or_default(),
        };
        let ai_defaults = AiSettings::default();
        let ai = AiSettings {
            provider,
            base_url: ai_file
                .base_url
                .or_else(|| cli.ai_base_url.clone())
                .unwrap_or_else(|| provider.default_base_url().to_string()),
            model: ai_file
                .model
                .or_else(|| cli.ai_model.clone())
                .unwrap_or_else(|| provider.default_model().to_string()),
            api_key: ai_file
                .api_key
                .or_else(|| cli.openai_api_key.clone())
                .filter(|k| !k.is_empty()),
            temperature: ai_file.temperature.unwrap_or(ai_defaults.temperature),
            max_tokens: ai_file.max_tokens.unwrap_or(ai_defaults.max_tokens),
        };

        // Spotify lookup is enabled only with both credentials
        let spotify_file = file.spotify.unwrap_or_default();
        let spotify = match (
            spotify_file
                .client_id
                .or_else(|| cli.spotify_client_id.clone()),
            spotify_file
                .client_secret
                .or_else(|| cli.spotify_client_secret.clone()),
        ) {
            (Some(client_id), Some(client_secret))
                if !client_id.is_empty() && !client_secret.is_empty() =>
            {
                Some(SpotifySettings {
                    client_id,
                    client_secret,
                })
            }
            _ => None,
        };

        let classifier_file = file.classifier.unwrap_or_default();
        let policy_defaults = ClassifierPolicy::default();
        let classifier_policy = ClassifierPolicy {
            personal_indicators: classifier_file
                .personal_indicators
                .unwrap_or(policy_defaults.personal_indicators),
            emotional_keywords: classifier_file
                .emotional_keywords
                .unwrap_or(policy_defaults.emotional_keywords),
        };

        Ok(Self {
            data_dir,
            port,
            metrics_port,
            logging_level,
            play_history_size,
            lyrics_cache_capacity,
            matcher_concurrency,
            ai_timeout_sec,
            lyrics_timeout_sec,
            lyrics_base_url,
            ai,
            spotify,
            classifier_policy,
        })
    }

    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: self.ai.temperature,
            max_tokens: Some(self.ai.max_tokens),
            timeout: Duration::from_secs(self.ai_timeout_sec),
        }
    }

    pub fn chat_settings(&self) -> ChatSettings {
        ChatSettings {
            classifier_policy: self.classifier_policy.clone(),
            matcher_concurrency: self.matcher_concurrency,
            lyrics_timeout: Duration::from_secs(self.lyrics_timeout_sec),
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
