use crate::music::UnifiedTrack;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};

/// Number of tracks kept when no explicit bound is configured.
pub const DEFAULT_PLAY_HISTORY_SIZE: usize = 10;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayHistoryEntry {
    #[serde(flatten)]
    pub track: UnifiedTrack,
    pub played_at: DateTime<Utc>,
}

/// Bounded, most-recent-first list of played tracks.
#[derive(Debug)]
pub struct PlayHistory {
    items: RwLock<VecDeque<PlayHistoryEntry>>,
    max_items: usize,
}

impl PlayHistory {
    pub fn new(max_items: usize) -> Self {
        Self {
            items: RwLock::new(VecDeque::with_capacity(max_items + 1)),
            max_items,
        }
    }

    /// Prepends the track, evicting the oldest entries beyond `max_items`.
    pub fn add(&self, track: UnifiedTrack) {
        let entry = PlayHistoryEntry {
            track,
            played_at: Utc::now(),
        };
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.push_front(entry);
        items.truncate(self.max_items);
    }

    pub fn get_items(&self) -> Vec<PlayHistoryEntry> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PlayHistory {
    fn default() -> Self {
        Self::new(DEFAULT_PLAY_HISTORY_SIZE)
    }
}
