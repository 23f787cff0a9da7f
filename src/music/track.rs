use serde::{Deserialize, Serialize};
use thiserror::Error;

const YOUTUBE_MUSIC_WATCH_URL: &str = "https://music.youtube.com/watch?v=";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackSource {
    #[default]
    Spotify,
    Youtube,
}

impl std::fmt::Display for TrackSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackSource::Spotify => write!(f, "spotify"),
            TrackSource::Youtube => write!(f, "youtube"),
        }
    }
}

/// A source-agnostic song record.
///
/// Every track entering the now-playing state or the mood matcher is
/// normalized into this shape first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnifiedTrack {
    pub id: String,
    pub name: String,
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    pub source: TrackSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    /// Duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl UnifiedTrack {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        artist: impl Into<String>,
        source: TrackSource,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            artist: artist.into(),
            album: None,
            source,
            preview_url: None,
            external_url: None,
            duration: None,
            image_url: None,
        }
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }
}

/// Track shape reported by the Spotify web player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub id: String,
    pub name: String,
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

impl From<SpotifyTrack> for UnifiedTrack {
    fn from(track: SpotifyTrack) -> Self {
        UnifiedTrack {
            id: track.id,
            name: track.name,
            artist: track.artist,
            album: Some(track.album).filter(|a| !a.is_empty()),
            source: TrackSource::Spotify,
            preview_url: track.preview_url,
            external_url: None,
            duration: None,
            image_url: None,
        }
    }
}

/// Track shape reported by the YouTube Music integration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct YoutubeTrack {
    pub id: String,
    pub name: String,
    pub artist: String,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<YoutubeTrack> for UnifiedTrack {
    fn from(track: YoutubeTrack) -> Self {
        let external_url = track
            .external_url
            .unwrap_or_else(|| format!("{}{}", YOUTUBE_MUSIC_WATCH_URL, track.id));
        UnifiedTrack {
            id: track.id,
            name: track.name,
            artist: track.artist,
            album: track.album,
            source: TrackSource::Youtube,
            preview_url: None,
            external_url: Some(external_url),
            duration: track.duration,
            image_url: track.image_url,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Missing required fields")]
    MissingRequiredFields,

    #[error("Track id contains reserved characters")]
    InvalidId,
}

/// Ids end up in the `|`/`,` delimited mood history log.
pub fn is_valid_track_id(id: &str) -> bool {
    !id.trim().is_empty() && !id.chars().any(|c| c == '|' || c == ',' || c.is_control())
}

/// Now-playing update body, discriminated by its `source` field.
///
/// Payloads without a `source` are rejected at deserialization time.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum TrackPayload {
    Spotify(SpotifyTrack),
    Youtube(YoutubeTrack),
}

impl TrackPayload {
    /// Normalizes the payload, rejecting tracks without an id or a name
    /// and ids carrying `|`, `,` or control characters.
    pub fn into_track(self) -> Result<UnifiedTrack, PayloadError> {
        let track: UnifiedTrack = match self {
            TrackPayload::Spotify(t) => t.into(),
            TrackPayload::Youtube(t) => t.into(),
        };
        if track.id.trim().is_empty() || track.name.trim().is_empty() {
            return Err(PayloadError::MissingRequiredFields);
        }
        if !is_valid_track_id(&track.id) {
            return Err(PayloadError::InvalidId);
        }
        Ok(track)
    }
}
