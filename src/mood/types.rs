use crate::music::UnifiedTrack;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Emotional tone of a query or a song.
///
/// Declaration order is the fixed enumeration order used wherever moods are
/// scanned (keyword fallback tie-breaks included).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Sad,
    Happy,
    Angry,
    Lonely,
    Anxious,
    Nostalgic,
    Energetic,
    Calm,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Sad,
        Mood::Happy,
        Mood::Angry,
        Mood::Lonely,
        Mood::Anxious,
        Mood::Nostalgic,
        Mood::Energetic,
        Mood::Calm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Sad => "sad",
            Mood::Happy => "happy",
            Mood::Angry => "angry",
            Mood::Lonely => "lonely",
            Mood::Anxious => "anxious",
            Mood::Nostalgic => "nostalgic",
            Mood::Energetic => "energetic",
            Mood::Calm => "calm",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mood: {0}")]
pub struct UnknownMood(pub String);

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or(UnknownMood(s.to_string()))
    }
}

/// Detected mood of a piece of text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoodAnalysis {
    pub primary_mood: Mood,
    /// Confidence in `0.0..=1.0`.
    pub mood_score: f64,
    pub emotion_tags: Vec<String>,
}

impl MoodAnalysis {
    pub fn new(primary_mood: Mood, mood_score: f64, emotion_tags: Vec<String>) -> Self {
        Self {
            primary_mood,
            mood_score: clamp_unit(mood_score),
            emotion_tags,
        }
    }
}

/// A track matched against a mood.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MoodBasedRecommendation {
    pub track: UnifiedTrack,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_reason: Option<String>,
    /// Match quality in `0.0..=1.0`.
    pub mood_score: f64,
}

/// The two ranked lists returned for a mood query.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MoodRecommendations {
    pub from_library: Vec<MoodBasedRecommendation>,
    pub suggested: Vec<MoodBasedRecommendation>,
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
