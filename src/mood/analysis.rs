//! Parsing of model-produced mood JSON.

use super::types::{clamp_unit, MoodAnalysis};
use super::Mood;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RawMoodJson {
    primary_mood: String,
    #[serde(default)]
    mood_score: f64,
    #[serde(default)]
    emotion_tags: Vec<String>,
    #[serde(default)]
    themes: Vec<String>,
}

/// A mood analysis plus the themes a lyric analysis may carry.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedMood {
    pub analysis: MoodAnalysis,
    pub themes: Vec<String>,
}

/// Returns the outermost `{ ... }` span of `text`.
///
/// Models often wrap JSON in Markdown fences or add a sentence around it.
fn json_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Parses model output into a [`ParsedMood`].
///
/// Returns `None` when the output holds no JSON object, the object does not
/// deserialize, or `primary_mood` is not a known mood.
pub(crate) fn parse_mood_json(text: &str) -> Option<ParsedMood> {
    let raw: RawMoodJson = serde_json::from_str(json_object_span(text)?).ok()?;
    let mood: Mood = raw.primary_mood.parse().ok()?;

    let clean = |items: Vec<String>| -> Vec<String> {
        items
            .into_iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    };

    Some(ParsedMood {
        analysis: MoodAnalysis {
            primary_mood: mood,
            mood_score: clamp_unit(raw.mood_score),
            emotion_tags: clean(raw.emotion_tags),
        },
        themes: clean(raw.themes),
    })
}
