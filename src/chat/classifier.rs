//! Intent classification of chat queries.
//!
//! Stages run in a fixed order and the first match wins: song request, mood,
//! lyrics, then general. Every table is matched as a plain substring of the
//! lowercased query.

use serde::{Deserialize, Serialize};

const SONG_REQUEST_PATTERNS: &[&str] = &[
    "play ",
    "can you play",
    "find ",
    "search for",
    "put on ",
    "i want to hear",
    "i want to listen to",
    "show me ",
    "look for ",
    "get me ",
];

const SONG_REQUEST_PREFIXES: &[&str] = &[
    "can you play ",
    "i want to hear ",
    "i want to listen to ",
    "play ",
    "find ",
    "search for ",
    "put on ",
    "show me ",
    "look for ",
    "get me ",
];

const LYRICS_PATTERNS: &[&str] = &[
    "lyric",
    "current song",
    "current track",
    "now playing",
    "playing now",
    "this song",
    "this track",
    "about the song",
    "about the track",
    "song mean",
    "track mean",
    "lyrics mean",
    "song about",
    "tell me about",
    "what does",
    "explain the",
    "meaning of",
];

pub const DEFAULT_PERSONAL_INDICATORS: &[&str] =
    &["i ", "i'm", "i am", "me ", "my ", "feel", "feeling"];

pub const DEFAULT_EMOTIONAL_KEYWORDS: &[&str] = &[
    "feel",
    "feeling",
    "mood",
    "emotion",
    "sad",
    "happy",
    "angry",
    "upset",
    "depressed",
    "anxious",
    "lonely",
    "alone",
    "stressed",
    "overwhelmed",
    "excited",
    "joy",
    "love",
    "hate",
    "frustrated",
    "confused",
    "lost",
    "hurt",
    "broken",
    "empty",
    "hopeless",
    "worried",
    "scared",
    "afraid",
    "nervous",
    "calm",
    "peaceful",
    "nostalgic",
    "miss",
    "remember",
    "belong",
    "disconnected",
    "isolated",
    "abandoned",
    "rejected",
    "won",
    "victory",
    "celebrate",
    "celebration",
    "achievement",
    "accomplished",
    "tournament",
    "competition",
    "winning",
    "winner",
];

/// Music-domain gate for general questions.
pub const MUSIC_KEYWORDS: &[&str] = &[
    "music", "song", "artist", "band", "album", "track", "genre", "musician", "singer",
    "composer", "producer", "concert", "performance", "instrument", "guitar", "piano", "drums",
    "vocal", "melody", "harmony", "rhythm", "beat", "tempo", "chord", "scale", "key",
    "recording", "studio", "label", "release", "single", "ep", "mixtape", "soundtrack", "cover",
    "remix", "acoustic", "electric", "classical", "jazz", "rock", "pop", "hip hop", "rap",
    "country", "folk", "blues", "metal", "punk", "indie", "electronic",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    SongRequest,
    MoodQuery,
    LyricsQuery,
    GeneralQuery,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::SongRequest => "song_request",
            Intent::MoodQuery => "mood_query",
            Intent::LyricsQuery => "lyrics_query",
            Intent::GeneralQuery => "general_query",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword tables for the mood stage.
///
/// A query is a mood query only when it holds both an emotional keyword and
/// a personal indicator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassifierPolicy {
    pub personal_indicators: Vec<String>,
    pub emotional_keywords: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn lowercased(items: Vec<String>) -> Vec<String> {
    items.into_iter().map(|s| s.to_lowercase()).collect()
}

impl Default for ClassifierPolicy {
    fn default() -> Self {
        Self {
            personal_indicators: owned(DEFAULT_PERSONAL_INDICATORS),
            emotional_keywords: owned(DEFAULT_EMOTIONAL_KEYWORDS),
        }
    }
}

/// Song and optional artist pulled out of a song request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SongQuery {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct QueryClassifier {
    policy: ClassifierPolicy,
}

impl QueryClassifier {
    pub fn new(policy: ClassifierPolicy) -> Self {
        Self {
            policy: ClassifierPolicy {
                personal_indicators: lowercased(policy.personal_indicators),
                emotional_keywords: lowercased(policy.emotional_keywords),
            },
        }
    }

    pub fn classify(&self, query: &str) -> Intent {
        let lower = query.to_lowercase();
        if is_song_request(&lower) {
            Intent::SongRequest
        } else if self.is_mood_query(&lower) {
            Intent::MoodQuery
        } else if is_lyrics_query(&lower) {
            Intent::LyricsQuery
        } else {
            Intent::GeneralQuery
        }
    }

    fn is_mood_query(&self, lower: &str) -> bool {
        let emotional = self
            .policy
            .emotional_keywords
            .iter()
            .any(|k| lower.contains(k.as_str()));
        emotional
            && self
                .policy
                .personal_indicators
                .iter()
                .any(|p| lower.contains(p.as_str()))
    }
}

fn is_song_request(lower: &str) -> bool {
    SONG_REQUEST_PATTERNS
        .iter()
        .any(|p| lower.contains(p))
}

fn is_lyrics_query(lower: &str) -> bool {
    LYRICS_PATTERNS.iter().any(|p| lower.contains(p))
}

/// True when the query mentions something from the music domain.
pub fn is_music_related(query: &str) -> bool {
    let lower = query.to_lowercase();
    MUSIC_KEYWORDS.iter().any(|k| lower.contains(k))
}

const QUOTES: &[char] = &['"', '\''];

fn strip_request_prefix(text: &str) -> &str {
    let lower = text.to_ascii_lowercase();
    SONG_REQUEST_PREFIXES
        .iter()
        .find(|p| lower.starts_with(*p))
        .map_or(text, |p| &text[p.len()..])
}

fn clean_part(text: &str) -> &str {
    text.trim()
        .trim_end_matches(['?', '!', '.'])
        .trim()
        .trim_matches(QUOTES)
        .trim()
}

fn strip_suffix_ci<'a>(text: &'a str, suffix: &str) -> &'a str {
    let lower = text.to_ascii_lowercase();
    if lower.ends_with(suffix) {
        text[..text.len() - suffix.len()].trim_end()
    } else {
        text
    }
}

/// Splits a song request into song and artist.
///
/// With a `" by "` separator (last occurrence) the text before it, minus
/// the request prefix, is the song and the rest the artist. Otherwise the
/// prefix and trailing "please"/"song" words are stripped. Original casing
/// is kept.
pub fn extract_song_request(query: &str) -> SongQuery {
    let trimmed = query.trim();
    let lower = trimmed.to_ascii_lowercase();

    if let Some(idx) = lower.rfind(" by ") {
        let song = clean_part(strip_request_prefix(trimmed[..idx].trim()));
        let artist = clean_part(strip_suffix_ci(clean_part(&trimmed[idx + 4..]), " please"));
        if !song.is_empty() && !artist.is_empty() {
            return SongQuery {
                query: song.to_string(),
                artist: Some(artist.to_string()),
            };
        }
    }

    let stripped = strip_request_prefix(trimmed);
    if stripped.len() != trimmed.len() {
        let mut song = clean_part(stripped);
        song = clean_part(strip_suffix_ci(song, " please"));
        song = clean_part(strip_suffix_ci(song, " song"));
        if !song.is_empty() {
            return SongQuery {
                query: song.to_string(),
                artist: None,
            };
        }
    }

    SongQuery {
        query: trimmed.to_string(),
        artist: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(query: &str) -> Intent {
        QueryClassifier::default().classify(query)
    }

    #[test]
    fn song_request_takes_precedence() {
        assert_eq!(classify("play a sad song by Adele"), Intent::SongRequest);
        assert_eq!(classify("Can you play something, I feel lonely"), Intent::SongRequest);
        assert_eq!(classify("find the lyrics to Hurt"), Intent::SongRequest);
    }

    #[test]
    fn song_patterns_match_inside_words() {
        assert_eq!(classify("replay Hurt"), Intent::SongRequest);
        assert_eq!(classify("how do I display album art?"), Intent::SongRequest);
    }

    #[test]
    fn mood_needs_personal_indicator() {
        assert_eq!(classify("I'm feeling so lonely tonight"), Intent::MoodQuery);
        assert_eq!(classify("my heart is broken"), Intent::MoodQuery);
        assert_eq!(classify("is sadness common in blues?"), Intent::GeneralQuery);
    }

    #[test]
    fn mood_precedes_lyrics() {
        assert_eq!(
            classify("I feel like this song's lyrics are sad"),
            Intent::MoodQuery
        );
    }

    #[test]
    fn lyrics_queries() {
        assert_eq!(classify("what does the current song mean?"), Intent::LyricsQuery);
        assert_eq!(classify("Show lyrics"), Intent::LyricsQuery);
        assert_eq!(classify("explain the second verse"), Intent::LyricsQuery);
    }

    #[test]
    fn general_fallback() {
        assert_eq!(classify("What is jazz music?"), Intent::GeneralQuery);
        assert_eq!(classify("What is artificial intelligence?"), Intent::GeneralQuery);
    }

    #[test]
    fn policy_is_configurable() {
        let classifier = QueryClassifier::new(ClassifierPolicy {
            personal_indicators: vec!["we ".to_string()],
            emotional_keywords: vec!["Blue".to_string()],
        });
        assert_eq!(classifier.classify("we are so blue"), Intent::MoodQuery);
        assert_eq!(classifier.classify("I feel sad"), Intent::GeneralQuery);
    }

    #[test]
    fn music_gate() {
        assert!(is_music_related("What is jazz music?"));
        assert!(is_music_related("Who are the best rappers?"));
        assert!(is_music_related("Is synthpop still popular?"));
        assert!(!is_music_related("What is artificial intelligence?"));
        assert!(!is_music_related("How do volcanoes form?"));
    }

    #[test]
    fn extracts_song_and_artist() {
        assert_eq!(
            extract_song_request("play a sad song by Adele"),
            SongQuery {
                query: "a sad song".to_string(),
                artist: Some("Adele".to_string()),
            }
        );
        assert_eq!(
            extract_song_request("Play 'Stand by Me' by Ben E. King please"),
            SongQuery {
                query: "Stand by Me".to_string(),
                artist: Some("Ben E. King".to_string()),
            }
        );
    }

    #[test]
    fn extracts_song_without_artist() {
        assert_eq!(
            extract_song_request("can you play Bohemian Rhapsody please?"),
            SongQuery {
                query: "Bohemian Rhapsody".to_string(),
                artist: None,
            }
        );
        assert_eq!(
            extract_song_request("put on \"Hurt\" song"),
            SongQuery {
                query: "Hurt".to_string(),
                artist: None,
            }
        );
    }

    #[test]
    fn unmatched_request_keeps_whole_query() {
        assert_eq!(
            extract_song_request("  something upbeat  "),
            SongQuery {
                query: "something upbeat".to_string(),
                artist: None,
            }
        );
    }

    #[test]
    fn song_query_omits_missing_artist() {
        let json = serde_json::to_value(SongQuery {
            query: "Hurt".to_string(),
            artist: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "query": "Hurt" }));
    }
}
