//! Spotify track lookup with the client-credentials flow.

use crate::music::{TrackSource, UnifiedTrack};
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_URL: &str = "https://api.spotify.com/v1";

/// Tokens are refreshed this long before they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum TrackLookupError {
    #[error("track not found: {0}")]
    NotFound(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Spotify API error (status {0})")]
    Api(u16),
}

/// Resolves a track id to a [`UnifiedTrack`].
#[async_trait]
pub trait TrackLookup: Send + Sync {
    async fn get_track_by_id(&self, id: &str) -> Result<UnifiedTrack, TrackLookupError>;
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Deserialize)]
struct SpotifyApiTrack {
    id: String,
    name: String,
    artists: Vec<SpotifyApiArtist>,
    album: SpotifyApiAlbum,
    preview_url: Option<String>,
    duration_ms: Option<u64>,
    #[serde(default)]
    external_urls: SpotifyExternalUrls,
}

#[derive(Deserialize)]
struct SpotifyApiArtist {
    name: String,
}

#[derive(Deserialize)]
struct SpotifyApiAlbum {
    name: String,
    #[serde(default)]
    images: Vec<SpotifyApiImage>,
}

#[derive(Deserialize)]
struct SpotifyApiImage {
    url: String,
    width: Option<u32>,
}

#[derive(Default, Deserialize)]
struct SpotifyExternalUrls {
    spotify: Option<String>,
}

impl From<SpotifyApiTrack> for UnifiedTrack {
    fn from(track: SpotifyApiTrack) -> Self {
        let artist = track
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let image_url = track
            .album
            .images
            .iter()
            .max_by_key(|img| img.width.unwrap_or(0))
            .map(|img| img.url.clone());

        UnifiedTrack {
            preview_url: track.preview_url,
            external_url: track.external_urls.spotify,
            duration: track.duration_ms.map(|ms| (ms / 1000) as u32),
            image_url,
            ..UnifiedTrack::new(track.id, track.name, artist, TrackSource::Spotify)
                .with_album(track.album.name)
        }
    }
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

pub struct SpotifyClient {
    client: Client,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyClient {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> Result<String, TrackLookupError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| Instant::now() < t.expires_at) {
            return Ok(token.value.clone());
        }

        let credentials = format!("{}:{}", self.client_id, self.client_secret);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);

        let response = self
            .client
            .post(TOKEN_URL)
            .header("Authorization", format!("Basic {}", encoded))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(TrackLookupError::Auth(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }

        let token: TokenResponse = response.json().await?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        info!(expires_in = token.expires_in, "Obtained Spotify access token");

        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }
}

#[async_trait]
impl TrackLookup for SpotifyClient {
    async fn get_track_by_id(&self, id: &str) -> Result<UnifiedTrack, TrackLookupError> {
        let token = self.access_token().await?;
        let url = format!("{}/tracks/{}", API_URL, urlencoding::encode(id));
        debug!(track_id = id, "Looking up Spotify track");

        let response = self.client.get(&url).bearer_auth(token).send().await?;
        match response.status() {
            status if status.is_success() => {
                let track: SpotifyApiTrack = response.json().await?;
                Ok(track.into())
            }
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                Err(TrackLookupError::NotFound(id.to_string()))
            }
            StatusCode::UNAUTHORIZED => {
                *self.token.lock().await = None;
                Err(TrackLookupError::Auth("access token rejected".to_string()))
            }
            status => Err(TrackLookupError::Api(status.as_u16())),
        }
    }
}
