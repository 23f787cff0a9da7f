//! tunechat: a music-aware chat assistant.
//!
//! This library exposes the internal modules for testing and reuse by the
//! server binary.

pub mod ai;
pub mod chat;
pub mod config;
pub mod lyrics;
pub mod mood;
pub mod music;
pub mod server;
pub mod spotify;
pub mod state;

// Re-export commonly used types for convenience
pub use chat::{ChatOrchestrator, ChatResponse};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig, ServerState};
pub use state::MusicStateStore;
