//! Chime Player - Playback Session Management
//!
//! Single-track playback session management for the Chime Player
//! screen: resolve a track id to a record, own exactly one audio
//! engine resource, expose transport commands, and publish a
//! continuously updated read-only playback view.
//!
//! This crate provides:
//! - A [`PlaybackSession`] that owns the engine handle and mediates
//!   the `Idle → Loading → Ready ⇄ {Playing, Paused} → Unloaded`
//!   lifecycle (with `Failed` terminal for a bad id)
//! - Transport commands: play/pause toggle, relative skip, seek to a
//!   fraction of the track
//! - A [`Presenter`] deriving the progress ratio and the disc
//!   rotation phase from the published view
//!
//! # Architecture
//!
//! `chime-playback` is completely platform-agnostic:
//! - No dependency on a concrete audio engine
//! - No dependency on the record store
//! - No dependency on the UI layer
//!
//! Platform code implements [`AudioBackend`] / [`EngineHandle`] over
//! the native player and [`TrackFetcher`] over the record store.
//! Commands are fire-and-await requests to the engine; the engine's
//! status events are the only writer of the published snapshot, so
//! the UI never sees a state the engine did not confirm.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use chime_playback::{
//!     AudioBackend, EngineHandle, LoadOptions, PlaybackSession, Presenter, Result,
//!     SessionConfig, StatusSender, TrackDescriptor, TrackFetcher,
//! };
//!
//! struct RecordStore;
//!
//! #[async_trait]
//! impl TrackFetcher for RecordStore {
//!     async fn fetch(&self, id: &str) -> Result<Option<TrackDescriptor>> {
//!         Ok(Some(TrackDescriptor {
//!             id: id.to_string(),
//!             title: "Ep1".to_string(),
//!             audio_url: "https://x/a.mp3".to_string(),
//!         }))
//!     }
//! }
//!
//! struct NativeEngine;
//! struct NativeHandle;
//!
//! #[async_trait]
//! impl AudioBackend for NativeEngine {
//!     async fn load(
//!         &self,
//!         _resource: &str,
//!         _options: LoadOptions,
//!         _listener: StatusSender,
//!     ) -> Result<Box<dyn EngineHandle>> {
//!         Ok(Box::new(NativeHandle))
//!     }
//! }
//!
//! #[async_trait]
//! impl EngineHandle for NativeHandle {
//!     async fn play(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!     async fn pause(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!     async fn seek_to(&mut self, _position_millis: u64) -> Result<()> {
//!         Ok(())
//!     }
//!     async fn unload(&mut self) -> Result<()> {
//!         Ok(())
//!     }
//!     fn set_status_listener(&mut self, _listener: Option<StatusSender>) {}
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let mut session = PlaybackSession::new(
//!         Arc::new(RecordStore),
//!         Arc::new(NativeEngine),
//!         SessionConfig::default(),
//!     );
//!
//!     // Animated values for the screen
//!     let (presenter, frames) = Presenter::new(session.subscribe(), session.config());
//!     tokio::spawn(presenter.run());
//!
//!     session.load("abc123").await?;
//!     session.toggle_play_pause().await;
//!     session.skip_forward().await;
//!     session.seek_to_fraction(0.5).await;
//!
//!     let _ = frames.borrow();
//!     session.teardown().await;
//!     Ok(())
//! }
//! ```

mod engine;
mod error;
mod fetcher;
mod presenter;
mod session;
pub mod types;

// Public exports
pub use engine::{AudioBackend, EngineHandle, EngineStatus, LoadOptions, StatusSender};
pub use error::{Result, SessionError};
pub use fetcher::TrackFetcher;
pub use presenter::{format_clock, progress_ratio, Presenter, PresenterFrame, RotationPhase};
pub use session::PlaybackSession;
pub use types::{PlaybackSnapshot, SessionConfig, SessionState, SessionView, TrackDescriptor};
