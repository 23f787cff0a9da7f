//! Dispatch of chat queries to the intent handlers.

use super::classifier::{extract_song_request, is_music_related, ClassifierPolicy, Intent, QueryClassifier};
use super::library::TrackLibrary;
use super::response::ChatResponse;
use crate::ai::AiResponder;
use crate::lyrics::{LyricsError, LyricsMoodCache, LyricsProvider};
use crate::mood::{
    general_suggestions, Mood, MoodDetector, MoodHistoryStore, MoodRecommendations, SongMatcher,
    DEFAULT_MATCHER_CONCURRENCY, MAX_SUGGESTIONS,
};
use crate::server::metrics;
use crate::state::{MusicStateStore, NowPlayingState};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// User whose mood history is recorded when no identity is supplied.
pub const DEFAULT_USER_ID: &str = "default_user";

const LIBRARY_MATCH_LIMIT: usize = 5;

pub const NO_SONG_PLAYING_MESSAGE: &str = "No song is currently playing. Please play a song in Spotify first, and I'll be able to help you understand its lyrics and meaning.";

pub const MUSIC_ONLY_MESSAGE: &str = "I can only help with questions about music, songs, lyrics, and artists. Please ask me something related to music!";

const PREAMBLES: &[(Mood, &str)] = &[
    (Mood::Lonely, "I hear you're feeling disconnected right now. Sometimes music can be a companion when we feel alone. Here are some songs that explore similar feelings and might resonate with you:"),
    (Mood::Sad, "I understand you're going through a difficult time. Music has a way of expressing what we can't always put into words. These songs might help you process these feelings:"),
    (Mood::Happy, "It's wonderful that you're feeling so positive! Let's keep that energy going with some uplifting tracks that match your mood:"),
    (Mood::Angry, "I can sense your frustration. Sometimes we need music that matches our intensity and helps us release these feelings. Here are some powerful tracks for you:"),
    (Mood::Anxious, "I understand you're feeling overwhelmed. These songs might help you find some calm or at least know you're not alone in feeling this way:"),
    (Mood::Nostalgic, "Ah, feeling nostalgic... Music has a unique way of taking us back. Here are some songs that capture that bittersweet feeling of remembering:"),
    (Mood::Energetic, "You're full of energy! Let's channel that into some high-powered tracks that'll keep you motivated:"),
    (Mood::Calm, "Finding your peace... Here are some tranquil songs to help maintain that serene state of mind:"),
];

pub fn empathetic_preamble(mood: Mood) -> String {
    PREAMBLES
        .iter()
        .find(|(m, _)| *m == mood)
        .map(|(_, text)| text.to_string())
        .unwrap_or_else(|| {
            format!(
                "I can sense you're feeling {mood}. Music has a way of connecting with our emotions. Here are some songs that might resonate with how you're feeling:"
            )
        })
}

fn general_prompt(query: &str) -> String {
    format!(
        "Answer this music question in EXACTLY 2 short paragraphs. Keep it brief - maximum 4-5 sentences per paragraph: {query}"
    )
}

/// Collaborators the orchestrator dispatches to.
pub struct ChatServices {
    pub state: Arc<MusicStateStore>,
    pub ai: Arc<dyn AiResponder>,
    pub lyrics_provider: Arc<dyn LyricsProvider>,
    pub lyrics_cache: Arc<LyricsMoodCache>,
    pub mood_history: Arc<MoodHistoryStore>,
    pub library: Arc<dyn TrackLibrary>,
}

#[derive(Clone, Debug)]
pub struct ChatSettings {
    pub classifier_policy: ClassifierPolicy,
    pub matcher_concurrency: usize,
    /// Deadline for a single lyrics fetch, also applied per matcher candidate.
    pub lyrics_timeout: Duration,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            classifier_policy: ClassifierPolicy::default(),
            matcher_concurrency: DEFAULT_MATCHER_CONCURRENCY,
            lyrics_timeout: Duration::from_secs(15),
        }
    }
}

pub struct ChatOrchestrator {
    classifier: QueryClassifier,
    detector: MoodDetector,
    matcher: SongMatcher,
    services: ChatServices,
    lyrics_timeout: Duration,
}

impl ChatOrchestrator {
    pub fn new(services: ChatServices, settings: ChatSettings) -> Self {
        // A candidate may need a lyrics fetch plus a mood analysis.
        let candidate_timeout = settings.lyrics_timeout * 2;
        Self {
            classifier: QueryClassifier::new(settings.classifier_policy),
            detector: MoodDetector::new(services.ai.clone()),
            matcher: SongMatcher::new(
                services.lyrics_cache.clone(),
                settings.matcher_concurrency,
                candidate_timeout,
            ),
            services,
            lyrics_timeout: settings.lyrics_timeout,
        }
    }

    pub async fn respond(&self, query: &str) -> ChatResponse {
        self.respond_for_user(DEFAULT_USER_ID, query).await
    }

    pub async fn respond_for_user(&self, user_id: &str, query: &str) -> ChatResponse {
        let query = query.trim();
        let intent = self.classifier.classify(query);
        info!(intent = %intent, "Handling chat query");
        metrics::record_chat_request(intent.as_str());

        let response = match intent {
            Intent::SongRequest => self.handle_song_request(query),
            Intent::MoodQuery => self.handle_mood_query(user_id, query).await,
            Intent::LyricsQuery => self.handle_lyrics_query(query).await,
            Intent::GeneralQuery => self.handle_general_query(query).await,
        };

        if response.error_message().is_some() {
            metrics::record_chat_error(intent.as_str());
        }
        response
    }

    fn handle_song_request(&self, query: &str) -> ChatResponse {
        let song_query = extract_song_request(query);
        let answer = match &song_query.artist {
            Some(artist) => format!(
                "I'm searching for \"{}\" by {} in your playlists. Let me show you what I found!",
                song_query.query, artist
            ),
            None => format!(
                "I'm searching for \"{}\" in your playlists. Let me show you what I found!",
                song_query.query
            ),
        };
        ChatResponse::SongRequest { answer, song_query }
    }

    async fn handle_mood_query(&self, user_id: &str, query: &str) -> ChatResponse {
        let mood_analysis = self.detector.detect_mood(query).await;
        let mood = mood_analysis.primary_mood;

        let tracks = match self.services.library.tracks().await {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!(error = %e, "Could not load track library");
                return ChatResponse::MoodRecommendation {
                    answer: format!(
                        "I understand you're feeling {mood}, but I'm having trouble accessing your music library right now. Please try again later."
                    ),
                    mood_analysis,
                    recommendations: MoodRecommendations::default(),
                };
            }
        };

        let from_library = self
            .matcher
            .match_tracks(&mood_analysis, tracks, LIBRARY_MATCH_LIMIT)
            .await;
        let suggested = general_suggestions(mood, MAX_SUGGESTIONS);

        let played: Vec<String> = from_library.iter().map(|r| r.track.id.clone()).collect();
        if let Err(e) = self.services.mood_history.append(user_id, mood, &played).await {
            warn!(user_id, error = %e, "Failed to save mood history");
        }

        info!(
            mood = %mood,
            library_matches = from_library.len(),
            suggestions = suggested.len(),
            "Mood recommendations ready"
        );

        ChatResponse::MoodRecommendation {
            answer: empathetic_preamble(mood),
            mood_analysis,
            recommendations: MoodRecommendations {
                from_library,
                suggested,
            },
        }
    }

    async fn handle_lyrics_query(&self, query: &str) -> ChatResponse {
        if !self.services.state.is_playing() {
            return ChatResponse::text(NO_SONG_PLAYING_MESSAGE);
        }

        let snapshot = self.services.state.get();
        let song_info = snapshot.info();

        let lyrics = match self.current_lyrics(&snapshot).await {
            Ok(lyrics) => lyrics,
            Err(e) => {
                warn!(song = %song_info, error = %e, "Failed to fetch lyrics");
                return ChatResponse::text(format!(
                    "I can see that you're currently playing \"{song_info}\", but I couldn't fetch the lyrics: {e}\n\nYou can still ask me general questions about this song or artist!"
                ));
            }
        };

        match self.services.ai.analyze_lyrics(query, &lyrics, &song_info).await {
            Ok(answer) => ChatResponse::text(answer),
            Err(e) => ChatResponse::error(format!("Error analyzing lyrics: {e}")),
        }
    }

    /// Lyrics of the playing track: attached ones first, then cached, then fetched.
    async fn current_lyrics(
        &self,
        snapshot: &NowPlayingState,
    ) -> Result<String, LyricsError> {
        if !snapshot.lyrics.is_empty() {
            return Ok(snapshot.lyrics.clone());
        }
        let Some(track) = &snapshot.track else {
            return Err(LyricsError::NotFound {
                track: String::new(),
                artist: String::new(),
            });
        };

        let lyrics = match self.services.lyrics_cache.peek(&track.name, &track.artist) {
            Some(record) => record.lyrics.clone(),
            None => tokio::time::timeout(
                self.lyrics_timeout,
                self.services.lyrics_provider.get_lyrics(&track.name, &track.artist),
            )
            .await
            .unwrap_or(Err(LyricsError::Timeout))?,
        };

        self.services
            .state
            .now_playing()
            .update_lyrics_for(&track.id, lyrics.clone());
        Ok(lyrics)
    }

    async fn handle_general_query(&self, query: &str) -> ChatResponse {
        if !is_music_related(query) {
            return ChatResponse::text(MUSIC_ONLY_MESSAGE);
        }

        match self.services.ai.generate_response(&general_prompt(query)).await {
            Ok(answer) => ChatResponse::text(answer),
            Err(e) => ChatResponse::error(format!("Error generating response: {e}")),
        }
    }
}
