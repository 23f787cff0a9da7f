use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::{log_requests, metrics::make_metrics_app, state::*};
use crate::chat::DEFAULT_USER_ID;
use crate::mood::{validate_user_id, MoodHistoryError};
use crate::music::TrackPayload;
use crate::spotify::TrackLookupError;

const NOW_PLAYING_UPDATED: &str = "Now playing updated";
const NOTHING_PLAYING: &str = "No song is currently playing";
const EMPTY_QUERY: &str = "Query cannot be empty";

#[derive(Deserialize, Debug)]
struct ChatBody {
    pub query: String,
    pub user_id: Option<String>,
}

async fn health() -> &'static str {
    "OK"
}

async fn post_now_playing(
    State(music_state): State<GuardedMusicState>,
    payload: Result<Json<TrackPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            debug!("Rejected now-playing payload: {}", rejection.body_text());
            return (StatusCode::BAD_REQUEST, rejection.body_text()).into_response();
        }
    };

    match payload.into_track() {
        Ok(track) => {
            music_state.update(track);
            (StatusCode::OK, NOW_PLAYING_UPDATED).into_response()
        }
        Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}

async fn get_now_playing(State(music_state): State<GuardedMusicState>) -> Response {
    let snapshot = music_state.get();
    if snapshot.is_empty() {
        return (StatusCode::NOT_FOUND, NOTHING_PLAYING).into_response();
    }
    Json(snapshot).into_response()
}

async fn get_history(State(music_state): State<GuardedMusicState>) -> Response {
    Json(music_state.history()).into_response()
}

async fn post_chat(
    State(chat): State<GuardedChatOrchestrator>,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return (StatusCode::BAD_REQUEST, rejection.body_text()).into_response(),
    };

    let query = body.query.trim();
    if query.is_empty() {
        return (StatusCode::BAD_REQUEST, EMPTY_QUERY).into_response();
    }

    let user_id = body.user_id.as_deref().unwrap_or(DEFAULT_USER_ID);
    if let Err(err) = validate_user_id(user_id) {
        return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
    }
    Json(chat.respond_for_user(user_id, query).await).into_response()
}

async fn get_mood_history(
    State(mood_history): State<GuardedMoodHistory>,
    Path(user_id): Path<String>,
) -> Response {
    match mood_history.read(&user_id).await {
        Ok(entries) => Json(entries).into_response(),
        Err(err @ MoodHistoryError::InvalidUserId(_)) => {
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
        Err(err) => {
            error!("Failed to read mood history for {}: {}", user_id, err);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

async fn get_track(
    State(track_lookup): State<OptionalTrackLookup>,
    Path(id): Path<String>,
) -> Response {
    let Some(track_lookup) = track_lookup else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match track_lookup.get_track_by_id(&id).await {
        Ok(track) => Json(track).into_response(),
        Err(TrackLookupError::NotFound(_)) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            warn!("Track lookup for {} failed: {}", id, err);
            (StatusCode::BAD_GATEWAY, err.to_string()).into_response()
        }
    }
}

pub fn make_app(state: ServerState) -> Router {
    let api_routes: Router = Router::new()
        .route("/health", get(health))
        .route("/now-playing", get(get_now_playing).post(post_now_playing))
        .route("/history", get(get_history))
        .route("/chat", axum::routing::post(post_chat))
        .route("/mood-history/{user_id}", get(get_mood_history))
        .route("/tracks/{id}", get(get_track))
        .with_state(state.clone());

    Router::new()
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(state, log_requests))
}

/// Serves the API and the Prometheus endpoint until either listener fails.
pub async fn run_server(state: ServerState) -> Result<()> {
    let port = state.config.port;
    let metrics_port = state.config.metrics_port;
    let app = make_app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    let metrics_listener = tokio::net::TcpListener::bind(("0.0.0.0", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;

    info!("Ready to serve at port {}!", port);
    info!("Metrics available at port {}!", metrics_port);

    tokio::try_join!(
        async { axum::serve(listener, app).await.context("API server failed") },
        async {
            axum::serve(metrics_listener, make_metrics_app())
                .await
                .context("Metrics server failed")
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiResponder, LlmError};
    use crate::chat::{ChatOrchestrator, ChatServices, ChatSettings, PlayHistoryLibrary};
    use crate::lyrics::{LyricsError, LyricsMoodCache, LyricsProvider};
    use crate::mood::{Mood, MoodHistoryStore};
    use crate::music::{TrackSource, UnifiedTrack};
    use crate::server::ServerConfig;
    use crate::spotify::TrackLookup;
    use crate::state::MusicStateStore;
    use async_trait::async_trait;
    use axum::{body::Body, http::Request};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt; // for `oneshot`

    struct EchoAi;

    #[async_trait]
    impl AiResponder for EchoAi {
        async fn generate_response(&self, _prompt: &str) -> Result<String, LlmError> {
            Ok("Jazz was born in New Orleans.".to_string())
        }

        async fn analyze_lyrics(
            &self,
            _query: &str,
            _lyrics: &str,
            _song_info: &str,
        ) -> Result<String, LlmError> {
            Err(LlmError::Timeout)
        }
    }

    struct NoLyrics;

    #[async_trait]
    impl LyricsProvider for NoLyrics {
        async fn get_lyrics(&self, track: &str, artist: &str) -> Result<String, LyricsError> {
            Err(LyricsError::NotFound {
                track: track.to_string(),
                artist: artist.to_string(),
            })
        }
    }

    struct SingleTrack;

    #[async_trait]
    impl TrackLookup for SingleTrack {
        async fn get_track_by_id(&self, id: &str) -> Result<UnifiedTrack, TrackLookupError> {
            if id == "known" {
                Ok(UnifiedTrack::new("known", "Hurt", "Johnny Cash", TrackSource::Spotify))
            } else {
                Err(TrackLookupError::NotFound(id.to_string()))
            }
        }
    }

    struct TestApp {
        app: Router,
        music_state: Arc<MusicStateStore>,
        mood_history: Arc<MoodHistoryStore>,
        _dir: TempDir,
    }

    fn test_app(track_lookup: OptionalTrackLookup) -> TestApp {
        let dir = TempDir::new().unwrap();
        let music_state = Arc::new(MusicStateStore::new(10));
        let mood_history = Arc::new(MoodHistoryStore::new(dir.path()));
        let ai: Arc<dyn AiResponder> = Arc::new(EchoAi);
        let lyrics: Arc<dyn LyricsProvider> = Arc::new(NoLyrics);
        let chat = Arc::new(ChatOrchestrator::new(
            ChatServices {
                state: music_state.clone(),
                ai: ai.clone(),
                lyrics_provider: lyrics.clone(),
                lyrics_cache: Arc::new(LyricsMoodCache::new(lyrics, ai, 8)),
                mood_history: mood_history.clone(),
                library: Arc::new(PlayHistoryLibrary::new(music_state.clone())),
            },
            ChatSettings::default(),
        ));
        let state = ServerState::new(
            ServerConfig::default(),
            chat,
            music_state.clone(),
            mood_history.clone(),
            track_lookup,
        );
        TestApp {
            app: make_app(state),
            music_state,
            mood_history,
            _dir: dir,
        }
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_responds_ok() {
        let t = test_app(None);
        let response = t.app.oneshot(get_request("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
    }

    #[tokio::test]
    async fn now_playing_is_not_found_when_empty() {
        let t = test_app(None);
        let response = t.app.oneshot(get_request("/api/now-playing")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, NOTHING_PLAYING);
    }

    #[tokio::test]
    async fn posting_now_playing_updates_state_and_history() {
        let t = test_app(None);
        let body = r#"{"source":"spotify","id":"t1","name":"Hurt","artist":"Johnny Cash"}"#;

        let response = t
            .app
            .clone()
            .oneshot(json_request("POST", "/api/now-playing", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, NOW_PLAYING_UPDATED);
        assert_eq!(t.music_state.current_song_info(), "Hurt by Johnny Cash");

        let response = t
            .app
            .clone()
            .oneshot(get_request("/api/now-playing"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let snapshot: serde_json::Value =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(snapshot["track"]["id"], "t1");

        let response = t.app.oneshot(get_request("/api/history")).await.unwrap();
        let history: Vec<serde_json::Value> =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["name"], "Hurt");
    }

    #[tokio::test]
    async fn rejects_invalid_now_playing_payloads() {
        let t = test_app(None);
        let payloads = [
            r#"{"id":"t1","name":"Hurt","artist":"Johnny Cash"}"#,
            r#"{"source":"spotify","id":"","name":"Hurt","artist":"Johnny Cash"}"#,
            r#"{"source":"youtube","id":"abc","name":"  ","artist":"X"}"#,
            r#"{"source":"spotify","id":"a|b","name":"Hurt","artist":"Johnny Cash"}"#,
            r#"{"source":"youtube","id":"a,b","name":"Hurt","artist":"Johnny Cash"}"#,
            "not json",
        ];

        for payload in payloads {
            let response = t
                .app
                .clone()
                .oneshot(json_request("POST", "/api/now-playing", payload))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{payload}");
        }
        assert!(!t.music_state.is_playing());
        assert!(t.music_state.history().is_empty());
    }

    #[tokio::test]
    async fn chat_rejects_empty_query() {
        let t = test_app(None);
        let response = t
            .app
            .oneshot(json_request("POST", "/api/chat", r#"{"query":"   "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, EMPTY_QUERY);
    }

    #[tokio::test]
    async fn chat_rejects_unsafe_user_id() {
        let t = test_app(None);
        let response = t
            .app
            .oneshot(json_request(
                "POST",
                "/api/chat",
                r#"{"query":"I feel so lonely","user_id":"../bob"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("invalid user id"));
    }

    #[tokio::test]
    async fn chat_answers_music_questions() {
        let t = test_app(None);
        let response = t
            .app
            .oneshot(json_request("POST", "/api/chat", r#"{"query":"What is jazz music?"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["type"], "text");
        assert_eq!(body["answer"], "Jazz was born in New Orleans.");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn mood_history_endpoint_reads_user_entries() {
        let t = test_app(None);
        t.mood_history
            .append("alice", Mood::Sad, &["t1".to_string()])
            .await
            .unwrap();

        let response = t
            .app
            .clone()
            .oneshot(get_request("/api/mood-history/alice"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let entries: Vec<serde_json::Value> =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["detected_mood"], "sad");

        let response = t
            .app
            .oneshot(get_request("/api/mood-history/..%2Fetc"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn track_lookup_routes() {
        let t = test_app(None);
        let response = t.app.oneshot(get_request("/api/tracks/known")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let t = test_app(Some(Arc::new(SingleTrack)));
        let response = t
            .app
            .clone()
            .oneshot(get_request("/api/tracks/known"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let track: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(track["artist"], "Johnny Cash");

        let response = t.app.oneshot(get_request("/api/tracks/missing")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
