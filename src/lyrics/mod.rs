//! Lyrics retrieval and the lyrics/mood cache.

mod cache;
mod lrclib;
mod provider;

pub use cache::{cache_key, LyricsMoodCache, LyricsMoodRecord, DEFAULT_LYRICS_CACHE_CAPACITY};
pub use lrclib::{strip_lrc_timestamps, LrclibProvider, DEFAULT_LRCLIB_URL};
pub use provider::{LyricsError, LyricsProvider};
