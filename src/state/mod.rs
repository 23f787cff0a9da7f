//! Shared "what is playing" state.
//!
//! `MusicStateStore` is built once at startup and handed to every consumer
//! behind an `Arc`. The two sub-stores are locked independently.

mod now_playing;
mod play_history;

pub use now_playing::{NowPlaying, NowPlayingState};
pub use play_history::{PlayHistory, PlayHistoryEntry, DEFAULT_PLAY_HISTORY_SIZE};

use crate::music::UnifiedTrack;
use tracing::info;

#[derive(Debug)]
pub struct MusicStateStore {
    now_playing: NowPlaying,
    play_history: PlayHistory,
}

impl MusicStateStore {
    pub fn new(history_size: usize) -> Self {
        Self {
            now_playing: NowPlaying::new(),
            play_history: PlayHistory::new(history_size),
        }
    }

    /// Records a play event: replaces now-playing and prepends to history.
    pub fn update(&self, track: UnifiedTrack) {
        info!(
            "Now playing updated ({}): {} by {}",
            track.source, track.name, track.artist
        );
        self.play_history.add(track.clone());
        self.now_playing.update(track);
    }

    pub fn get(&self) -> NowPlayingState {
        self.now_playing.get()
    }

    pub fn is_playing(&self) -> bool {
        !self.now_playing.is_empty()
    }

    pub fn history(&self) -> Vec<PlayHistoryEntry> {
        self.play_history.get_items()
    }

    pub fn current_song_info(&self) -> String {
        self.now_playing.get_info()
    }

    pub fn now_playing(&self) -> &NowPlaying {
        &self.now_playing
    }

    pub fn play_history(&self) -> &PlayHistory {
        &self.play_history
    }
}

impl Default for MusicStateStore {
    fn default() -> Self {
        Self::new(DEFAULT_PLAY_HISTORY_SIZE)
    }
}
