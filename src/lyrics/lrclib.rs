//! LRCLIB lyrics provider.
//!
//! Queries the public search endpoint by track and artist first and falls
//! back to a free-text `q` search.

use super::provider::{LyricsError, LyricsProvider};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_LRCLIB_URL: &str = "https://lrclib.net";

const USER_AGENT: &str = concat!("tunechat/", env!("CARGO_PKG_VERSION"));

lazy_static! {
    static ref LRC_TIMESTAMP: Regex =
        Regex::new(r"\[\d{1,2}:\d{2}(?:[.:]\d{1,3})?\]\s?").expect("Failed to compile LRC regex");
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LrclibRecord {
    plain_lyrics: Option<String>,
    synced_lyrics: Option<String>,
}

impl LrclibRecord {
    fn lyrics(&self) -> Option<String> {
        if let Some(plain) = self.plain_lyrics.as_deref().filter(|s| !s.trim().is_empty()) {
            return Some(plain.trim().to_string());
        }
        self.synced_lyrics
            .as_deref()
            .map(strip_lrc_timestamps)
            .filter(|s| !s.is_empty())
    }
}

/// Removes `[mm:ss.xx]` tags from synced lyrics.
pub fn strip_lrc_timestamps(synced: &str) -> String {
    synced
        .lines()
        .map(|line| LRC_TIMESTAMP.replace_all(line, "").trim().to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

pub struct LrclibProvider {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl LrclibProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    async fn search(&self, params: &[(&str, &str)]) -> Result<Option<String>, LyricsError> {
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let url = format!("{}/api/search?{}", self.base_url, query);
        debug!(url = %url, "Searching LRCLIB");

        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LyricsError::Network(format!(
                "LRCLIB returned status {}",
                response.status()
            )));
        }

        let records: Vec<LrclibRecord> = response
            .json()
            .await
            .map_err(|e| LyricsError::InvalidResponse(e.to_string()))?;

        debug!(results = records.len(), "LRCLIB search finished");
        Ok(records.iter().find_map(LrclibRecord::lyrics))
    }
}

#[async_trait]
impl LyricsProvider for LrclibProvider {
    async fn get_lyrics(
        &self,
        track_name: &str,
        artist_name: &str,
    ) -> Result<String, LyricsError> {
        let track = track_name.trim();
        let artist = artist_name.trim();

        let mut params = vec![("track_name", track)];
        if !artist.is_empty() {
            params.push(("artist_name", artist));
        }
        if let Some(lyrics) = self.search(&params).await? {
            info!(track, artist, "Found lyrics");
            return Ok(lyrics);
        }

        let free_text = format!("{} {}", track, artist);
        if let Some(lyrics) = self.search(&[("q", free_text.trim())]).await? {
            info!(track, artist, "Found lyrics with free-text search");
            return Ok(lyrics);
        }

        Err(LyricsError::NotFound {
            track: track.to_string(),
            artist: artist.to_string(),
        })
    }
}
