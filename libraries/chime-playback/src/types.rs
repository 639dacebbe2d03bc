//! Core types for the playback session

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::engine::EngineStatus;

/// Track record resolved from an external id
///
/// Immutable once fetched. Owned by the session for the lifetime of
/// the screen; discarded on teardown or when a new id is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    /// Identifier supplied by the navigation layer
    pub id: String,

    /// Display title
    pub title: String,

    /// Locator for the audio resource (URL or asset path)
    pub audio_url: String,
}

/// Authoritative playback state record
///
/// Produced exclusively by the session's status task and replaced
/// wholesale; commands never write it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    /// Current position in milliseconds
    pub position_millis: u64,

    /// Total duration in milliseconds (0 until the engine reports it)
    pub duration_millis: u64,

    /// Whether the engine is currently playing
    pub is_playing: bool,

    /// Whether a resource is loaded and playable
    pub is_ready: bool,
}

impl PlaybackSnapshot {
    /// Build the next snapshot from an engine status event.
    ///
    /// Position is clamped so `position_millis <= duration_millis`
    /// holds whenever the duration is known.
    pub fn from_status(status: &EngineStatus) -> Self {
        let duration_millis = status.duration_millis.unwrap_or(0);
        let position_millis = if duration_millis > 0 {
            status.position_millis.min(duration_millis)
        } else {
            status.position_millis
        };

        Self {
            position_millis,
            duration_millis,
            is_playing: status.is_playing,
            is_ready: true,
        }
    }
}

/// Session lifecycle
///
/// `Idle → Loading → Ready ⇄ {Playing, Paused} → Unloaded`, with
/// `Failed` terminal for the attempted id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No load requested yet
    Idle,

    /// Fetching the record or loading the resource
    Loading,

    /// Resource loaded, no status event applied yet
    Ready,

    /// Engine confirmed playback
    Playing,

    /// Engine confirmed pause
    Paused,

    /// Record missing or resource rejected; not retried for this id
    Failed,

    /// Resource released by teardown
    Unloaded,
}

impl SessionState {
    /// States in which engine status events may move the session
    pub(crate) fn accepts_status(self) -> bool {
        matches!(self, Self::Ready | Self::Playing | Self::Paused)
    }
}

/// Read model published to the UI and presenter
///
/// Replaced wholesale through a watch channel, so readers never
/// observe a torn update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    /// Current lifecycle state
    pub state: SessionState,

    /// Last engine-confirmed playback snapshot
    pub snapshot: PlaybackSnapshot,

    /// Track being played, once resolved
    pub track: Option<TrackDescriptor>,
}

impl Default for SessionView {
    fn default() -> Self {
        Self {
            state: SessionState::Idle,
            snapshot: PlaybackSnapshot::default(),
            track: None,
        }
    }
}

/// Configuration for the playback session and presenter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Relative skip step (default: 15 s)
    pub skip_step: Duration,

    /// One full disc revolution while playing (default: 5 s)
    pub rotation_period: Duration,

    /// Presenter frame cadence while playing (default: 100 ms)
    pub frame_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            skip_step: Duration::from_millis(15_000),
            rotation_period: Duration::from_millis(5_000),
            frame_interval: Duration::from_millis(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.skip_step, Duration::from_millis(15_000));
        assert_eq!(config.rotation_period, Duration::from_millis(5_000));
        assert_eq!(config.frame_interval, Duration::from_millis(100));
    }

    #[test]
    fn snapshot_clamps_position_to_known_duration() {
        let status = EngineStatus {
            is_loaded: true,
            position_millis: 700_000,
            duration_millis: Some(600_000),
            is_playing: true,
        };

        let snapshot = PlaybackSnapshot::from_status(&status);
        assert_eq!(snapshot.position_millis, 600_000);
        assert_eq!(snapshot.duration_millis, 600_000);
        assert!(snapshot.is_playing);
        assert!(snapshot.is_ready);
    }

    #[test]
    fn snapshot_keeps_position_while_duration_unknown() {
        let status = EngineStatus {
            is_loaded: true,
            position_millis: 1_234,
            duration_millis: None,
            is_playing: false,
        };

        let snapshot = PlaybackSnapshot::from_status(&status);
        assert_eq!(snapshot.position_millis, 1_234);
        assert_eq!(snapshot.duration_millis, 0);
    }

    #[test]
    fn status_only_moves_loaded_states() {
        assert!(SessionState::Ready.accepts_status());
        assert!(SessionState::Playing.accepts_status());
        assert!(SessionState::Paused.accepts_status());
        assert!(!SessionState::Idle.accepts_status());
        assert!(!SessionState::Loading.accepts_status());
        assert!(!SessionState::Failed.accepts_status());
        assert!(!SessionState::Unloaded.accepts_status());
    }
}
