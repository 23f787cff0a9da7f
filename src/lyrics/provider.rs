use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LyricsError {
    #[error("no lyrics found for {track} by {artist}")]
    NotFound { track: String, artist: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("lyrics request timed out")]
    Timeout,

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for LyricsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LyricsError::Timeout
        } else if err.is_decode() {
            LyricsError::InvalidResponse(err.to_string())
        } else {
            LyricsError::Network(err.to_string())
        }
    }
}

/// Source of song lyrics.
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    async fn get_lyrics(&self, track_name: &str, artist_name: &str)
        -> Result<String, LyricsError>;
}
