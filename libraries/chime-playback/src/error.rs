//! Error types for playback session management

use thiserror::Error;

/// Playback session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Load was requested with an empty track id
    #[error("Track id is empty")]
    EmptyTrackId,

    /// The record store has no track for this id
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    /// The record lookup itself failed
    #[error("Track lookup failed: {0}")]
    FetchFailed(String),

    /// The engine rejected the audio resource
    #[error("Engine failed to load resource: {0}")]
    EngineLoad(String),

    /// A transport command was rejected by the engine
    #[error("Engine error: {0}")]
    Engine(String),
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
