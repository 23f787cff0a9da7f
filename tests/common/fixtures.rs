//! Fake collaborators wired into the test server

use super::constants::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tunechat::ai::{AiResponder, LlmError};
use tunechat::lyrics::{LyricsError, LyricsProvider};

/// Scripted LLM: answers each prompt family with a canned reply.
#[derive(Default)]
pub struct FakeAi {
    offline: bool,
    prompts: Mutex<Vec<String>>,
    lyric_analyses: AtomicUsize,
}

#[allow(dead_code)]
impl FakeAi {
    /// An AI whose every call fails with a connection error
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn lyric_analyses(&self) -> usize {
        self.lyric_analyses.load(Ordering::SeqCst)
    }

    /// Number of calls of any kind
    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len() + self.lyric_analyses()
    }
}

#[async_trait]
impl AiResponder for FakeAi {
    async fn generate_response(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.offline {
            return Err(LlmError::Connection("connection refused".to_string()));
        }

        if prompt.starts_with("Analyze the following message") {
            Ok(USER_MOOD_JSON.to_string())
        } else if prompt.starts_with("Analyze the mood and themes") {
            if prompt.contains("tear") {
                Ok(SAD_SONG_JSON.to_string())
            } else {
                Ok(HAPPY_SONG_JSON.to_string())
            }
        } else {
            Ok(GENERAL_ANSWER.to_string())
        }
    }

    async fn analyze_lyrics(
        &self,
        _query: &str,
        lyrics: &str,
        song_info: &str,
    ) -> Result<String, LlmError> {
        self.lyric_analyses.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(LlmError::Timeout);
        }
        Ok(format!("{song_info} is about: {lyrics}"))
    }
}

/// Lyrics provider backed by the test track table.
pub struct FakeLyrics {
    lyrics: HashMap<String, String>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeLyrics {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for FakeLyrics {
    fn default() -> Self {
        let lyrics = [
            (SAD_TRACK_NAME, SAD_TRACK_LYRICS),
            (HAPPY_TRACK_NAME, HAPPY_TRACK_LYRICS),
        ]
        .into_iter()
        .map(|(name, text)| (name.to_lowercase(), text.to_string()))
        .collect();
        Self {
            lyrics,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LyricsProvider for FakeLyrics {
    async fn get_lyrics(&self, track_name: &str, artist_name: &str) -> Result<String, LyricsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.lyrics
            .get(&track_name.to_lowercase())
            .cloned()
            .ok_or_else(|| LyricsError::NotFound {
                track: track_name.to_string(),
                artist: artist_name.to_string(),
            })
    }
}
