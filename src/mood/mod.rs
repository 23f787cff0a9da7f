//! Mood detection, matching and history.

mod analysis;
mod detector;
mod history;
mod keywords;
mod matcher;
mod suggestions;
mod types;

pub(crate) use analysis::parse_mood_json;
pub use detector::{keyword_mood, MoodDetector};
pub use history::{
    validate_user_id, MoodHistoryEntry, MoodHistoryError, MoodHistoryStore, MOOD_HISTORY_DIR,
};
pub use keywords::{related_emotions, related_moods, MOOD_KEYWORDS};
pub use matcher::{match_reason, score_match, SongMatcher, DEFAULT_MATCHER_CONCURRENCY, MATCH_THRESHOLD};
pub use suggestions::{general_suggestions, MAX_SUGGESTIONS};
pub use types::{Mood, MoodAnalysis, MoodBasedRecommendation, MoodRecommendations, UnknownMood};
