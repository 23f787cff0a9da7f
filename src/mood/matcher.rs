//! Concurrent mood matching of candidate tracks.

use super::keywords::{match_reason_base, related_moods};
use super::types::clamp_unit;
use super::{MoodAnalysis, MoodBasedRecommendation};
use crate::lyrics::LyricsMoodCache;
use crate::music::UnifiedTrack;
use crate::server::metrics;
use std::cmp::Ordering;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

pub const DEFAULT_MATCHER_CONCURRENCY: usize = 5;

/// Matches scoring at or below this are dropped.
pub const MATCH_THRESHOLD: f64 = 0.5;

const NO_MATCH_SCORE: f64 = 0.2;

/// Scores how well a song's mood fits the query mood.
pub fn score_match(query: &MoodAnalysis, song: &MoodAnalysis) -> f64 {
    let song_score = clamp_unit(song.mood_score);

    let score = if query.primary_mood == song.primary_mood {
        0.9 + 0.1 * song_score
    } else if related_moods(query.primary_mood).contains(&song.primary_mood) {
        0.7 + 0.2 * song_score
    } else {
        let overlap = query
            .emotion_tags
            .iter()
            .filter(|tag| song.emotion_tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
            .count();
        if overlap > 0 {
            0.5 + 0.3 * (overlap as f64 / query.emotion_tags.len() as f64)
        } else {
            NO_MATCH_SCORE
        }
    };

    clamp_unit(score)
}

/// Human-readable reason for recommending a song for `query`.
pub fn match_reason(query: &MoodAnalysis, themes: &[String]) -> String {
    let base = match_reason_base(query.primary_mood);
    match themes {
        [] => base.to_string(),
        [only] => format!("{base} through themes of {only}"),
        [first, second, ..] => format!("{base} through themes of {first} and {second}"),
    }
}

/// Ranks descending by score, then ascending by track id.
fn rank(a: &MoodBasedRecommendation, b: &MoodBasedRecommendation) -> Ordering {
    b.mood_score
        .partial_cmp(&a.mood_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.track.id.cmp(&b.track.id))
}

enum Outcome {
    Matched,
    BelowThreshold,
    Skipped,
}

/// Matches candidate tracks against a mood with bounded fan-out.
///
/// Each candidate's mood comes from the [`LyricsMoodCache`]. Candidates whose
/// lookup fails or exceeds `candidate_timeout` are skipped; the skip count is
/// logged and exported as a metric.
#[derive(Clone)]
pub struct SongMatcher {
    cache: Arc<LyricsMoodCache>,
    concurrency: usize,
    candidate_timeout: Duration,
}

impl SongMatcher {
    pub fn new(cache: Arc<LyricsMoodCache>, concurrency: usize, candidate_timeout: Duration) -> Self {
        Self {
            cache,
            concurrency: concurrency.max(1),
            candidate_timeout,
        }
    }

    pub async fn match_tracks(
        &self,
        mood: &MoodAnalysis,
        candidates: Vec<UnifiedTrack>,
        limit: usize,
    ) -> Vec<MoodBasedRecommendation> {
        if limit == 0 || candidates.is_empty() {
            return Vec::new();
        }

        let total = candidates.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let matches = Arc::new(Mutex::new(Vec::new()));
        let query = Arc::new(mood.clone());
        let mut workers = JoinSet::new();

        for track in candidates {
            let semaphore = semaphore.clone();
            let matches = matches.clone();
            let query = query.clone();
            let cache = self.cache.clone();
            let timeout = self.candidate_timeout;

            workers.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return Outcome::Skipped;
                };

                let lookup = tokio::time::timeout(
                    timeout,
                    cache.get_or_fetch(&track.name, &track.artist),
                )
                .await;
                let record = match lookup {
                    Ok(Ok(record)) => record,
                    Ok(Err(e)) => {
                        debug!(track_id = %track.id, error = %e, "Skipping candidate");
                        return Outcome::Skipped;
                    }
                    Err(_) => {
                        debug!(track_id = %track.id, "Skipping candidate after timeout");
                        return Outcome::Skipped;
                    }
                };

                let score = score_match(&query, &record.analysis);
                if score <= MATCH_THRESHOLD {
                    return Outcome::BelowThreshold;
                }

                let recommendation = MoodBasedRecommendation {
                    match_reason: Some(match_reason(&query, &record.themes)),
                    track,
                    mood_score: score,
                };
                matches
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(recommendation);
                Outcome::Matched
            });
        }

        let (mut matched, mut below, mut skipped) = (0usize, 0usize, 0usize);
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Outcome::Matched) => matched += 1,
                Ok(Outcome::BelowThreshold) => below += 1,
                Ok(Outcome::Skipped) | Err(_) => skipped += 1,
            }
        }

        metrics::record_matcher_outcomes(matched, below, skipped);
        info!(
            mood = %mood.primary_mood,
            candidates = total,
            matched,
            below_threshold = below,
            skipped,
            "Song matching finished"
        );

        let mut results = std::mem::take(&mut *matches.lock().unwrap_or_else(PoisonError::into_inner));
        results.sort_by(rank);
        results.truncate(limit);
        results
    }
}
