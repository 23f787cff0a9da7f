use super::analysis::parse_mood_json;
use super::keywords::{related_emotions, MOOD_KEYWORDS};
use super::{Mood, MoodAnalysis};
use crate::ai::AiResponder;
use std::sync::Arc;
use tracing::{debug, warn};

/// Fallback hit ratio a mood must exceed to be chosen.
const FALLBACK_THRESHOLD: f64 = 0.2;

const NEUTRAL_SCORE: f64 = 0.3;

fn mood_prompt(text: &str) -> String {
    format!(
        "Analyze the following message for emotional content and mood. Return a JSON response with:\n\
         - primary_mood: one of (sad, happy, angry, lonely, anxious, nostalgic, energetic, calm)\n\
         - mood_score: confidence between 0.0 and 1.0\n\
         - emotion_tags: array of specific emotions detected\n\n\
         Important: Respond ONLY with valid JSON, no additional text.\n\n\
         User message: \"{text}\""
    )
}

/// Detects the mood of free text.
///
/// Asks the model first when one is configured and falls back to keyword
/// scoring when the model is absent, fails, or answers with something that
/// does not parse.
#[derive(Clone)]
pub struct MoodDetector {
    ai: Option<Arc<dyn AiResponder>>,
}

impl MoodDetector {
    pub fn new(ai: Arc<dyn AiResponder>) -> Self {
        Self { ai: Some(ai) }
    }

    /// A detector that only ever uses the keyword fallback.
    pub fn keyword_only() -> Self {
        Self { ai: None }
    }

    pub async fn detect_mood(&self, text: &str) -> MoodAnalysis {
        let Some(ai) = &self.ai else {
            return keyword_mood(text);
        };

        match ai.generate_response(&mood_prompt(text)).await {
            Ok(answer) => match parse_mood_json(&answer) {
                Some(parsed) => parsed.analysis,
                None => {
                    debug!(answer = %answer, "Unparsable mood answer, using keyword fallback");
                    keyword_mood(text)
                }
            },
            Err(e) => {
                warn!(error = %e, "Mood detection failed, using keyword fallback");
                keyword_mood(text)
            }
        }
    }
}

/// Deterministic keyword-overlap mood detection.
///
/// Each mood scores `hits / keyword_count` over lower-cased substring hits.
/// The best score wins when it exceeds the threshold, earlier moods winning
/// ties. Otherwise the text is considered neutral.
pub fn keyword_mood(text: &str) -> MoodAnalysis {
    let lower = text.to_lowercase();

    let mut best: Option<(Mood, f64)> = None;
    for (mood, keywords) in MOOD_KEYWORDS {
        let hits = keywords.iter().filter(|k| lower.contains(*k)).count();
        if hits == 0 {
            continue;
        }
        let score = hits as f64 / keywords.len() as f64;
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((*mood, score));
        }
    }

    match best {
        Some((mood, score)) if score > FALLBACK_THRESHOLD => MoodAnalysis::new(
            mood,
            score,
            related_emotions(mood).iter().map(|s| s.to_string()).collect(),
        ),
        _ => MoodAnalysis::new(
            Mood::Calm,
            NEUTRAL_SCORE,
            vec!["neutral".to_string(), "uncertain".to_string()],
        ),
    }
}
