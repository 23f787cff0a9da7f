//! Read-through cache of lyrics and their mood analysis.

use super::provider::{LyricsError, LyricsProvider};
use crate::ai::AiResponder;
use crate::mood::{parse_mood_json, Mood, MoodAnalysis};
use crate::server::metrics;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

pub const DEFAULT_LYRICS_CACHE_CAPACITY: usize = 512;

/// Lyrics of a song plus the mood derived from them.
#[derive(Clone, Debug, PartialEq)]
pub struct LyricsMoodRecord {
    pub lyrics: String,
    pub analysis: MoodAnalysis,
    pub themes: Vec<String>,
}

impl LyricsMoodRecord {
    /// Record used when the lyrics could not be analyzed.
    pub fn neutral(lyrics: String) -> Self {
        Self {
            lyrics,
            analysis: MoodAnalysis::new(Mood::Calm, 0.5, vec!["uncertain".to_string()]),
            themes: vec!["general".to_string()],
        }
    }
}

fn lyrics_mood_prompt(lyrics: &str) -> String {
    format!(
        "Analyze the mood and themes of these song lyrics. Return a JSON response with:\n\
         - primary_mood: The main emotion (must be one of: sad, happy, angry, lonely, anxious, nostalgic, energetic, calm)\n\
         - mood_score: Confidence score between 0 and 1\n\
         - emotion_tags: Array of related emotions\n\
         - themes: Array of main themes in the song\n\n\
         Important: Respond ONLY with valid JSON.\n\n\
         Lyrics:\n{lyrics}"
    )
}

pub fn cache_key(track_name: &str, artist: &str) -> String {
    format!("{}-{}", track_name.to_lowercase(), artist.to_lowercase())
}

struct CacheEntry {
    record: Arc<LyricsMoodRecord>,
    last_access: AtomicU64,
}

/// Lyrics and mood records keyed by lower-cased `"<name>-<artist>"`.
///
/// Lookups share a read lock; a miss fetches without holding any lock and
/// then inserts under the write lock. When `capacity` is non-zero the least
/// recently used entry is evicted on overflow.
pub struct LyricsMoodCache {
    provider: Arc<dyn LyricsProvider>,
    ai: Arc<dyn AiResponder>,
    entries: RwLock<HashMap<String, CacheEntry>>,
    clock: AtomicU64,
    capacity: usize,
}

impl LyricsMoodCache {
    pub fn new(
        provider: Arc<dyn LyricsProvider>,
        ai: Arc<dyn AiResponder>,
        capacity: usize,
    ) -> Self {
        Self {
            provider,
            ai,
            entries: RwLock::new(HashMap::new()),
            clock: AtomicU64::new(0),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cached record without fetching on a miss.
    pub fn peek(&self, track_name: &str, artist: &str) -> Option<Arc<LyricsMoodRecord>> {
        self.lookup(&cache_key(track_name, artist))
    }

    pub async fn get_or_fetch(
        &self,
        track_name: &str,
        artist: &str,
    ) -> Result<Arc<LyricsMoodRecord>, LyricsError> {
        let key = cache_key(track_name, artist);

        if let Some(record) = self.lookup(&key) {
            metrics::record_lyrics_cache_lookup("hit");
            return Ok(record);
        }
        metrics::record_lyrics_cache_lookup("miss");

        let lyrics = self.provider.get_lyrics(track_name, artist).await?;
        let record = Arc::new(self.analyze(lyrics).await);
        self.insert(key, record.clone());
        Ok(record)
    }

    async fn analyze(&self, lyrics: String) -> LyricsMoodRecord {
        match self.ai.generate_response(&lyrics_mood_prompt(&lyrics)).await {
            Ok(answer) => match parse_mood_json(&answer) {
                Some(parsed) => LyricsMoodRecord {
                    lyrics,
                    analysis: parsed.analysis,
                    themes: parsed.themes,
                },
                None => {
                    debug!("Unparsable lyric mood answer, using neutral record");
                    LyricsMoodRecord::neutral(lyrics)
                }
            },
            Err(e) => {
                warn!(error = %e, "Lyric mood analysis failed, using neutral record");
                LyricsMoodRecord::neutral(lyrics)
            }
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn lookup(&self, key: &str) -> Option<Arc<LyricsMoodRecord>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).map(|entry| {
            entry.last_access.store(self.tick(), Ordering::Relaxed);
            entry.record.clone()
        })
    }

    fn insert(&self, key: String, record: Arc<LyricsMoodRecord>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key,
            CacheEntry {
                record,
                last_access: AtomicU64::new(self.tick()),
            },
        );

        if self.capacity > 0 && entries.len() > self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.last_access.load(Ordering::Relaxed))
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                debug!(key = %oldest, "Evicting lyrics cache entry");
                entries.remove(&oldest);
            }
        }
    }
}
