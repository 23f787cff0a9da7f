use axum::extract::FromRef;

use crate::chat::ChatOrchestrator;
use crate::mood::MoodHistoryStore;
use crate::spotify::TrackLookup;
use crate::state::MusicStateStore;
use std::sync::Arc;

use super::ServerConfig;

pub type GuardedChatOrchestrator = Arc<ChatOrchestrator>;
pub type GuardedMusicState = Arc<MusicStateStore>;
pub type GuardedMoodHistory = Arc<MoodHistoryStore>;
pub type OptionalTrackLookup = Option<Arc<dyn TrackLookup>>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub chat: GuardedChatOrchestrator,
    pub music_state: GuardedMusicState,
    pub mood_history: GuardedMoodHistory,
    pub track_lookup: OptionalTrackLookup,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        chat: GuardedChatOrchestrator,
        music_state: GuardedMusicState,
        mood_history: GuardedMoodHistory,
        track_lookup: OptionalTrackLookup,
    ) -> Self {
        Self {
            config,
            chat,
            music_state,
            mood_history,
            track_lookup,
        }
    }
}

impl FromRef<ServerState> for GuardedChatOrchestrator {
    fn from_ref(input: &ServerState) -> Self {
        input.chat.clone()
    }
}

impl FromRef<ServerState> for GuardedMusicState {
    fn from_ref(input: &ServerState) -> Self {
        input.music_state.clone()
    }
}

impl FromRef<ServerState> for GuardedMoodHistory {
    fn from_ref(input: &ServerState) -> Self {
        input.mood_history.clone()
    }
}

impl FromRef<ServerState> for OptionalTrackLookup {
    fn from_ref(input: &ServerState) -> Self {
        input.track_lookup.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
