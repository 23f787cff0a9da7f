use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tunechat::ai::{AiResponder, LlmProvider, LlmResponder, OllamaProvider, OpenAIProvider};
use tunechat::chat::{ChatOrchestrator, ChatServices, PlayHistoryLibrary, TrackLibrary};
use tunechat::config::{AiProviderKind, AppConfig, CliConfig, FileConfig};
use tunechat::lyrics::{LrclibProvider, LyricsMoodCache, LyricsProvider};
use tunechat::mood::MoodHistoryStore;
use tunechat::server::{self, run_server, RequestsLoggingLevel, ServerConfig, ServerState};
use tunechat::spotify::{SpotifyClient, TrackLookup};
use tunechat::state::MusicStateStore;

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Its values override the command line.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Directory for persisted data (mood history).
    #[clap(long)]
    pub data_dir: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8080)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9092)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Number of played tracks kept in the history.
    #[clap(long, default_value_t = 10)]
    pub play_history_size: usize,

    /// Maximum number of songs in the lyrics/mood cache. 0 means unbounded.
    #[clap(long, default_value_t = 512)]
    pub lyrics_cache_capacity: usize,

    /// Number of candidate songs analyzed in parallel.
    #[clap(long, default_value_t = 5)]
    pub matcher_concurrency: usize,

    /// Timeout in seconds for each LLM request.
    #[clap(long, default_value_t = 30)]
    pub ai_timeout_sec: u64,

    /// Timeout in seconds for each lyrics request.
    #[clap(long, default_value_t = 15)]
    pub lyrics_timeout_sec: u64,

    /// LLM backend.
    #[clap(long)]
    pub ai_provider: Option<AiProviderKind>,

    /// Base URL of the LLM backend.
    #[clap(long)]
    pub ai_base_url: Option<String>,

    /// Model name passed to the LLM backend.
    #[clap(long)]
    pub ai_model: Option<String>,

    #[clap(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[clap(long, env = "SPOTIFY_CLIENT_ID")]
    pub spotify_client_id: Option<String>,

    #[clap(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub spotify_client_secret: Option<String>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            data_dir: self.data_dir.clone(),
            port: self.port,
            metrics_port: self.metrics_port,
            logging_level: self.logging_level.clone(),
            play_history_size: self.play_history_size,
            lyrics_cache_capacity: self.lyrics_cache_capacity,
            matcher_concurrency: self.matcher_concurrency,
            ai_timeout_sec: self.ai_timeout_sec,
            lyrics_timeout_sec: self.lyrics_timeout_sec,
            ai_provider: self.ai_provider,
            ai_base_url: self.ai_base_url.clone(),
            ai_model: self.ai_model.clone(),
            openai_api_key: self.openai_api_key.clone(),
            spotify_client_id: self.spotify_client_id.clone(),
            spotify_client_secret: self.spotify_client_secret.clone(),
        }
    }
}

fn make_llm_provider(config: &AppConfig) -> Arc<dyn LlmProvider> {
    match config.ai.provider {
        AiProviderKind::Ollama => Arc::new(OllamaProvider::new(
            config.ai.base_url.clone(),
            config.ai.model.clone(),
        )),
        AiProviderKind::Openai => Arc::new(OpenAIProvider::new(
            config.ai.base_url.clone(),
            config.ai.model.clone(),
            config.ai.api_key.clone(),
        )),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}...", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Initializing metrics...");
    server::metrics::init_metrics();

    let llm = make_llm_provider(&config);
    info!(
        "Using {} at {} with model {}",
        llm.name(),
        config.ai.base_url,
        config.ai.model
    );
    if let Err(err) = llm.health_check().await {
        warn!("LLM backend health check failed: {}", err);
    }
    let ai: Arc<dyn AiResponder> = Arc::new(LlmResponder::new(llm, config.completion_options()));

    let lyrics_provider: Arc<dyn LyricsProvider> = Arc::new(LrclibProvider::new(
        config.lyrics_base_url.clone(),
        Duration::from_secs(config.lyrics_timeout_sec),
    ));
    let lyrics_cache = Arc::new(LyricsMoodCache::new(
        lyrics_provider.clone(),
        ai.clone(),
        config.lyrics_cache_capacity,
    ));

    let music_state = Arc::new(MusicStateStore::new(config.play_history_size));
    let mood_history = Arc::new(MoodHistoryStore::new(&config.data_dir));
    info!("Mood history stored in {:?}", mood_history.dir());
    let library: Arc<dyn TrackLibrary> = Arc::new(PlayHistoryLibrary::new(music_state.clone()));

    let chat = Arc::new(ChatOrchestrator::new(
        ChatServices {
            state: music_state.clone(),
            ai,
            lyrics_provider,
            lyrics_cache,
            mood_history: mood_history.clone(),
            library,
        },
        config.chat_settings(),
    ));

    let track_lookup = config.spotify.as_ref().map(|spotify| {
        info!("Spotify track lookup enabled");
        Arc::new(SpotifyClient::new(
            spotify.client_id.clone(),
            spotify.client_secret.clone(),
        )) as Arc<dyn TrackLookup>
    });

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level.clone(),
        port: config.port,
        metrics_port: config.metrics_port,
    };
    let state = ServerState::new(server_config, chat, music_state, mood_history, track_lookup);

    run_server(state).await
}
