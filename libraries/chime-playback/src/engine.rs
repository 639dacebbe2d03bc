//! Audio engine contract
//!
//! Abstracts the native playback resource behind two seams: a backend
//! that loads resources and a handle representing one loaded resource.
//! This keeps the session manager platform-agnostic; platform code
//! (native player, web audio, test doubles) implements these traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::Result;

/// Status event emitted by the engine
///
/// The engine delivers events one at a time; the session's status
/// task is their only consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStatus {
    /// False when the engine holds no resource
    pub is_loaded: bool,

    /// Position in milliseconds
    pub position_millis: u64,

    /// Duration in milliseconds, once known
    pub duration_millis: Option<u64>,

    /// Whether the engine is playing
    pub is_playing: bool,
}

/// Options applied when loading a resource
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Start playback immediately after load
    pub autoplay: bool,
}

/// Channel end the engine pushes status events into
pub type StatusSender = mpsc::UnboundedSender<EngineStatus>;

/// Loads audio resources into playable engine handles
#[async_trait]
pub trait AudioBackend: Send + Sync {
    /// Load a resource, registering `listener` for status events.
    ///
    /// The returned handle owns the underlying playback resource
    /// until `unload` is called.
    async fn load(
        &self,
        resource: &str,
        options: LoadOptions,
        listener: StatusSender,
    ) -> Result<Box<dyn EngineHandle>>;
}

/// One loaded, playable audio resource
#[async_trait]
pub trait EngineHandle: Send {
    /// Start or resume playback
    async fn play(&mut self) -> Result<()>;

    /// Pause playback
    async fn pause(&mut self) -> Result<()>;

    /// Seek to an absolute offset from the start of the track
    async fn seek_to(&mut self, position_millis: u64) -> Result<()>;

    /// Release the underlying resource
    async fn unload(&mut self) -> Result<()>;

    /// Replace or remove the status listener
    ///
    /// After `set_status_listener(None)` returns, no further status
    /// events are delivered.
    fn set_status_listener(&mut self, listener: Option<StatusSender>);
}
