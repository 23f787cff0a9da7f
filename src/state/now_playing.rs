use crate::music::UnifiedTrack;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{PoisonError, RwLock};

/// Snapshot of the currently playing track.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NowPlayingState {
    pub track: Option<UnifiedTrack>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub lyrics: String,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NowPlayingState {
    pub fn is_empty(&self) -> bool {
        match &self.track {
            Some(track) => track.id.is_empty() || track.name.is_empty(),
            None => true,
        }
    }

    /// `"<name> by <artist>"`, or an empty string when either is unknown.
    pub fn info(&self) -> String {
        match &self.track {
            Some(track) if !track.name.is_empty() && !track.artist.is_empty() => {
                format!("{} by {}", track.name, track.artist)
            }
            _ => String::new(),
        }
    }
}

/// Holder of the single "currently playing" track.
///
/// Every update replaces the whole record under the write lock, so readers
/// never observe a half-updated track. `get` hands out owned copies.
#[derive(Debug, Default)]
pub struct NowPlaying {
    state: RwLock<NowPlayingState>,
}

impl NowPlaying {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current track, clearing any lyrics attached to the previous one.
    pub fn update(&self, track: UnifiedTrack) {
        let next = NowPlayingState {
            track: Some(track),
            lyrics: String::new(),
            updated_at: Some(Utc::now()),
        };
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    pub fn update_lyrics(&self, lyrics: impl Into<String>) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .lyrics = lyrics.into();
    }

    /// Attaches lyrics only if `track_id` is still the current track.
    ///
    /// Returns false when the track changed while the lyrics were being fetched.
    pub fn update_lyrics_for(&self, track_id: &str, lyrics: impl Into<String>) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        match &state.track {
            Some(track) if track.id == track_id => {
                state.lyrics = lyrics.into();
                true
            }
            _ => false,
        }
    }

    pub fn get(&self) -> NowPlayingState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    pub fn get_info(&self) -> String {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .info()
    }
}
