//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per API endpoint. When API routes or
//! request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

#[allow(dead_code)]
impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// GET /api/health
    pub async fn health(&self) -> Response {
        self.client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await
            .expect("Health request failed")
    }

    // ========================================================================
    // Now Playing
    // ========================================================================

    /// POST /api/now-playing with a raw JSON body
    pub async fn post_now_playing(&self, payload: Value) -> Response {
        self.client
            .post(format!("{}/api/now-playing", self.base_url))
            .json(&payload)
            .send()
            .await
            .expect("Post now playing request failed")
    }

    /// POST /api/now-playing with a Spotify-shaped track
    pub async fn play_spotify(&self, id: &str, name: &str, artist: &str) -> Response {
        self.post_now_playing(json!({
            "source": "spotify",
            "id": id,
            "name": name,
            "artist": artist,
        }))
        .await
    }

    /// GET /api/now-playing
    pub async fn get_now_playing(&self) -> Response {
        self.client
            .get(format!("{}/api/now-playing", self.base_url))
            .send()
            .await
            .expect("Get now playing request failed")
    }

    /// GET /api/history
    pub async fn get_history(&self) -> Response {
        self.client
            .get(format!("{}/api/history", self.base_url))
            .send()
            .await
            .expect("Get history request failed")
    }

    // ========================================================================
    // Chat
    // ========================================================================

    /// POST /api/chat
    pub async fn chat(&self, query: &str) -> Response {
        self.client
            .post(format!("{}/api/chat", self.base_url))
            .json(&json!({ "query": query }))
            .send()
            .await
            .expect("Chat request failed")
    }

    /// POST /api/chat on behalf of a specific user
    pub async fn chat_as(&self, user_id: &str, query: &str) -> Response {
        self.client
            .post(format!("{}/api/chat", self.base_url))
            .json(&json!({ "query": query, "user_id": user_id }))
            .send()
            .await
            .expect("Chat request failed")
    }

    /// POST /api/chat and decode the JSON answer
    pub async fn chat_json(&self, query: &str) -> Value {
        let response = self.chat(query).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        response.json().await.expect("Chat response is not JSON")
    }

    // ========================================================================
    // Mood History and Tracks
    // ========================================================================

    /// GET /api/mood-history/{user_id}
    pub async fn get_mood_history(&self, user_id: &str) -> Response {
        self.client
            .get(format!("{}/api/mood-history/{}", self.base_url, user_id))
            .send()
            .await
            .expect("Get mood history request failed")
    }

    /// GET /api/tracks/{id}
    pub async fn get_track(&self, id: &str) -> Response {
        self.client
            .get(format!("{}/api/tracks/{}", self.base_url, id))
            .send()
            .await
            .expect("Get track request failed")
    }
}
