use super::classifier::SongQuery;
use crate::mood::{MoodAnalysis, MoodRecommendations};
use serde::Serialize;

/// Answer to a chat query, tagged by `type` on the wire.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatResponse {
    Text {
        answer: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    SongRequest {
        answer: String,
        song_query: SongQuery,
    },
    MoodRecommendation {
        answer: String,
        mood_analysis: MoodAnalysis,
        recommendations: MoodRecommendations,
    },
}

impl ChatResponse {
    pub fn text(answer: impl Into<String>) -> Self {
        ChatResponse::Text {
            answer: answer.into(),
            error: None,
        }
    }

    /// A response carrying only an error message.
    pub fn error(error: impl Into<String>) -> Self {
        ChatResponse::Text {
            answer: String::new(),
            error: Some(error.into()),
        }
    }

    pub fn answer(&self) -> &str {
        match self {
            ChatResponse::Text { answer, .. }
            | ChatResponse::SongRequest { answer, .. }
            | ChatResponse::MoodRecommendation { answer, .. } => answer,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ChatResponse::Text { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ChatResponse::Text { .. } => "text",
            ChatResponse::SongRequest { .. } => "song_request",
            ChatResponse::MoodRecommendation { .. } => "mood_recommendation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::Mood;
    use serde_json::json;

    #[test]
    fn text_omits_empty_error() {
        let json = serde_json::to_value(ChatResponse::text("hello")).unwrap();
        assert_eq!(json, json!({ "type": "text", "answer": "hello" }));
    }

    #[test]
    fn error_response_keeps_answer_field() {
        let json = serde_json::to_value(ChatResponse::error("boom")).unwrap();
        assert_eq!(json, json!({ "type": "text", "answer": "", "error": "boom" }));
    }

    #[test]
    fn song_request_shape() {
        let response = ChatResponse::SongRequest {
            answer: "ok".to_string(),
            song_query: SongQuery {
                query: "Hurt".to_string(),
                artist: Some("Johnny Cash".to_string()),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "song_request");
        assert_eq!(json["song_query"]["artist"], "Johnny Cash");
        assert_eq!(response.kind(), "song_request");
    }

    #[test]
    fn mood_recommendation_shape() {
        let response = ChatResponse::MoodRecommendation {
            answer: "here".to_string(),
            mood_analysis: MoodAnalysis::new(Mood::Calm, 0.3, vec![]),
            recommendations: MoodRecommendations::default(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "mood_recommendation");
        assert_eq!(json["mood_analysis"]["primary_mood"], "calm");
        assert_eq!(json["recommendations"]["from_library"], json!([]));
        assert_eq!(json["recommendations"]["suggested"], json!([]));
    }
}
