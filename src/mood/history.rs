//! Per-user append-only mood history log.
//!
//! One file per user under `<data_dir>/mood_history/`, one
//! `timestamp|mood|id,id,...` line per detected mood.

use super::Mood;
use crate::music::is_valid_track_id;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub const MOOD_HISTORY_DIR: &str = "mood_history";

#[derive(Debug, Error)]
pub enum MoodHistoryError {
    #[error("mood history I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),

    #[error("invalid song id: {0:?}")]
    InvalidSongId(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MoodHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub detected_mood: Mood,
    pub played_songs: Vec<String>,
}

impl MoodHistoryEntry {
    fn to_line(&self) -> String {
        format!(
            "{}|{}|{}\n",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.detected_mood,
            self.played_songs.join(",")
        )
    }

    /// Parses one log line. `None` for a wrong field count, an unknown mood
    /// or a non RFC 3339 timestamp. Empty song ids are dropped.
    fn parse_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split('|').collect();
        let [timestamp, mood, songs] = fields.as_slice() else {
            return None;
        };

        let timestamp = DateTime::parse_from_rfc3339(timestamp.trim())
            .ok()?
            .with_timezone(&Utc);
        let detected_mood = mood.parse().ok()?;
        let played_songs = songs
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Some(Self {
            timestamp,
            detected_mood,
            played_songs,
        })
    }
}

/// User ids name files on disk: ASCII letters, digits, `_` and `-` only.
pub fn validate_user_id(user_id: &str) -> Result<(), MoodHistoryError> {
    let valid = !user_id.is_empty()
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(MoodHistoryError::InvalidUserId(user_id.to_string()))
    }
}

pub struct MoodHistoryStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl MoodHistoryStore {
    /// History files live in `<data_dir>/mood_history/`, created on first append.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: data_dir.as_ref().join(MOOD_HISTORY_DIR),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn user_file(&self, user_id: &str) -> Result<PathBuf, MoodHistoryError> {
        validate_user_id(user_id)?;
        Ok(self.dir.join(format!("user_{}_mood_history.txt", user_id)))
    }

    pub async fn append(
        &self,
        user_id: &str,
        mood: Mood,
        song_ids: &[String],
    ) -> Result<(), MoodHistoryError> {
        let path = self.user_file(user_id)?;
        if let Some(bad) = song_ids.iter().find(|id| !is_valid_track_id(id)) {
            return Err(MoodHistoryError::InvalidSongId(bad.clone()));
        }
        let entry = MoodHistoryEntry {
            timestamp: Utc::now(),
            detected_mood: mood,
            played_songs: song_ids.to_vec(),
        };

        {
            let _guard = self.write_lock.lock().await;
            tokio::fs::create_dir_all(&self.dir).await?;
            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .await?;
            file.write_all(entry.to_line().as_bytes()).await?;
            file.flush().await?;
        }

        debug!(user_id, mood = %mood, songs = song_ids.len(), "Mood history appended");
        tokio::spawn(compact_if_needed(path));
        Ok(())
    }

    /// All parseable entries, oldest first. A missing file reads as empty.
    pub async fn read(&self, user_id: &str) -> Result<Vec<MoodHistoryEntry>, MoodHistoryError> {
        let path = self.user_file(user_id)?;
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        let mut skipped = 0usize;
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            match MoodHistoryEntry::parse_line(line) {
                Some(entry) => entries.push(entry),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!(user_id, skipped, "Skipped malformed mood history lines");
        }
        Ok(entries)
    }
}

/// Compaction hook run after every append.
///
/// Currently a no-op. Meant to summarize entries older than a retention
/// window once that window is defined.
async fn compact_if_needed(path: PathBuf) {
    debug!(path = %path.display(), "Mood history compaction skipped");
}
