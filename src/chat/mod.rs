//! Chat core: intent classification and per-intent answers.

mod classifier;
mod library;
mod orchestrator;
mod response;

pub use classifier::{
    extract_song_request, is_music_related, ClassifierPolicy, Intent, QueryClassifier, SongQuery,
    DEFAULT_EMOTIONAL_KEYWORDS, DEFAULT_PERSONAL_INDICATORS, MUSIC_KEYWORDS,
};
pub use library::{LibraryError, PlayHistoryLibrary, TrackLibrary};
pub use orchestrator::{
    empathetic_preamble, ChatOrchestrator, ChatServices, ChatSettings, DEFAULT_USER_ID,
    MUSIC_ONLY_MESSAGE, NO_SONG_PLAYING_MESSAGE,
};
pub use response::ChatResponse;
