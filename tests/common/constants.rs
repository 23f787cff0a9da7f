//! Shared constants for end-to-end tests
//!
//! When the fake catalog or the canned AI answers change, update only this
//! file.
#![allow(dead_code)]

// ============================================================================
// Test Tracks
// ============================================================================

pub const SAD_TRACK_ID: &str = "spotify-hurt";
pub const SAD_TRACK_NAME: &str = "Hurt";
pub const SAD_TRACK_ARTIST: &str = "Johnny Cash";
pub const SAD_TRACK_LYRICS: &str = "I hurt myself today\nTo see if I still feel\nEvery tear I cry";

pub const HAPPY_TRACK_ID: &str = "spotify-happy";
pub const HAPPY_TRACK_NAME: &str = "Happy";
pub const HAPPY_TRACK_ARTIST: &str = "Pharrell Williams";
pub const HAPPY_TRACK_LYRICS: &str = "Clap along if you feel\nLike a room without a roof";

pub const YOUTUBE_TRACK_ID: &str = "dQw4w9WgXcQ";

/// A track the fake lyrics provider knows nothing about
pub const UNKNOWN_TRACK_ID: &str = "spotify-unknown";
pub const UNKNOWN_TRACK_NAME: &str = "Untitled Demo";

// ============================================================================
// Canned AI Answers
// ============================================================================

pub const GENERAL_ANSWER: &str = "Jazz grew out of New Orleans.\n\nIt is built on improvisation.";

/// Answer to the user-message mood prompt
pub const USER_MOOD_JSON: &str =
    r#"{"primary_mood":"sad","mood_score":0.85,"emotion_tags":["grief","tired"]}"#;

/// Answer to the lyrics mood prompt for lyrics mentioning tears
pub const SAD_SONG_JSON: &str = "```json\n{\"primary_mood\":\"sad\",\"mood_score\":0.9,\"emotion_tags\":[\"grief\"],\"themes\":[\"loss\",\"regret\"]}\n```";

/// Answer to the lyrics mood prompt for any other lyrics
pub const HAPPY_SONG_JSON: &str =
    r#"{"primary_mood":"happy","mood_score":0.95,"emotion_tags":["joy"],"themes":["freedom"]}"#;

// ============================================================================
// Test Server Configuration
// ============================================================================

pub const PLAY_HISTORY_SIZE: usize = 3;

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
