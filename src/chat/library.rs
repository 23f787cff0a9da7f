use crate::music::UnifiedTrack;
use crate::state::MusicStateStore;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("library unavailable: {0}")]
    Unavailable(String),
}

/// The user's tracks, used as the candidate pool for mood matching.
#[async_trait]
pub trait TrackLibrary: Send + Sync {
    async fn tracks(&self) -> Result<Vec<UnifiedTrack>, LibraryError>;
}

/// Stands in for a real library with the distinct tracks of the play
/// history, most recent first.
pub struct PlayHistoryLibrary {
    state: Arc<MusicStateStore>,
}

impl PlayHistoryLibrary {
    pub fn new(state: Arc<MusicStateStore>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl TrackLibrary for PlayHistoryLibrary {
    async fn tracks(&self) -> Result<Vec<UnifiedTrack>, LibraryError> {
        let mut seen = HashSet::new();
        Ok(self
            .state
            .history()
            .into_iter()
            .map(|entry| entry.track)
            .filter(|track| seen.insert(track.id.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::TrackSource;

    #[tokio::test]
    async fn history_tracks_are_deduplicated() {
        let state = Arc::new(MusicStateStore::new(10));
        for id in ["a", "b", "a"] {
            state.update(UnifiedTrack::new(id, id, "artist", TrackSource::Spotify));
        }

        let library = PlayHistoryLibrary::new(state);
        let ids: Vec<String> = library
            .tracks()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
