//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own state, fake collaborators
//! and temporary data directory.

use super::constants::*;
use super::fixtures::{FakeAi, FakeLyrics};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tunechat::chat::{ChatOrchestrator, ChatServices, ChatSettings, PlayHistoryLibrary};
use tunechat::lyrics::LyricsMoodCache;
use tunechat::mood::MoodHistoryStore;
use tunechat::server::{make_app, RequestsLoggingLevel, ServerConfig, ServerState};
use tunechat::state::MusicStateStore;

/// Test server instance with fake AI and lyrics backends
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
#[allow(dead_code)]
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    pub ai: Arc<FakeAi>,
    pub lyrics: Arc<FakeLyrics>,
    pub music_state: Arc<MusicStateStore>,

    // Private fields - keep resources alive until drop
    _temp_data_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

#[allow(dead_code)]
impl TestServer {
    /// Spawns a new test server on a random port with a working fake AI
    pub async fn spawn() -> Self {
        Self::spawn_with_ai(FakeAi::default()).await
    }

    /// Spawns a new test server whose AI backend always fails
    pub async fn spawn_offline() -> Self {
        Self::spawn_with_ai(FakeAi::offline()).await
    }

    async fn spawn_with_ai(ai: FakeAi) -> Self {
        let temp_data_dir = TempDir::new().expect("Failed to create temp data dir");

        let ai = Arc::new(ai);
        let lyrics = Arc::new(FakeLyrics::default());
        let music_state = Arc::new(MusicStateStore::new(PLAY_HISTORY_SIZE));
        let mood_history = Arc::new(MoodHistoryStore::new(temp_data_dir.path()));
        let lyrics_cache = Arc::new(LyricsMoodCache::new(lyrics.clone(), ai.clone(), 32));

        let chat = Arc::new(ChatOrchestrator::new(
            ChatServices {
                state: music_state.clone(),
                ai: ai.clone(),
                lyrics_provider: lyrics.clone(),
                lyrics_cache,
                mood_history: mood_history.clone(),
                library: Arc::new(PlayHistoryLibrary::new(music_state.clone())),
            },
            ChatSettings {
                lyrics_timeout: Duration::from_secs(2),
                ..ChatSettings::default()
            },
        ));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            ..ServerConfig::default()
        };
        let state = ServerState::new(config, chat, music_state.clone(), mood_history, None);
        let app = make_app(state);

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            ai,
            lyrics,
            music_state,
            _temp_data_dir: temp_data_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the health endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client
                .get(format!("{}/api/health", self.base_url))
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
