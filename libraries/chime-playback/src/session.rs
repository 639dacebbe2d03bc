//! Playback session manager - core orchestration
//!
//! Owns the engine handle for the lifetime of the screen, mediates all
//! lifecycle transitions, and reconciles engine status callbacks with
//! user commands. Commands are requests to the engine and never write
//! the published snapshot; the status task is the snapshot's sole
//! writer, so readers only ever see state the engine actually
//! reported.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::engine::{AudioBackend, EngineHandle, EngineStatus, LoadOptions};
use crate::error::{Result, SessionError};
use crate::fetcher::TrackFetcher;
use crate::types::{PlaybackSnapshot, SessionConfig, SessionState, SessionView};

/// Central playback session management
///
/// Exactly one audio resource is owned at a time. Loading a new id
/// releases the previous resource before the next one is created, and
/// a new `load` supersedes interest in the outcome of a prior one
/// (single-flight).
pub struct PlaybackSession {
    fetcher: Arc<dyn TrackFetcher>,
    backend: Arc<dyn AudioBackend>,
    config: SessionConfig,

    handle: Option<Box<dyn EngineHandle>>,
    status_task: Option<JoinHandle<()>>,

    view_tx: watch::Sender<SessionView>,
}

impl PlaybackSession {
    /// Create a session over a record store and an audio backend
    pub fn new(
        fetcher: Arc<dyn TrackFetcher>,
        backend: Arc<dyn AudioBackend>,
        config: SessionConfig,
    ) -> Self {
        let (view_tx, _view_rx) = watch::channel(SessionView::default());

        Self {
            fetcher,
            backend,
            config,
            handle: None,
            status_task: None,
            view_tx,
        }
    }

    /// Subscribe to view updates
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view_tx.subscribe()
    }

    /// Current published view
    pub fn view(&self) -> SessionView {
        self.view_tx.borrow().clone()
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.view_tx.borrow().state
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Resolve an id and load its audio resource, playback stopped.
    ///
    /// A previously owned resource is released first; the unload is
    /// awaited so two live engines never coexist. Fetch and engine
    /// failures park the session in `Failed` for this id and are
    /// surfaced to the caller; they are not retried.
    pub async fn load(&mut self, id: &str) -> Result<()> {
        if id.trim().is_empty() {
            return Err(SessionError::EmptyTrackId);
        }

        self.set_state(SessionState::Loading);

        let track = match self.fetcher.fetch(id).await {
            Ok(Some(track)) => track,
            Ok(None) => {
                self.set_state(SessionState::Failed);
                return Err(SessionError::TrackNotFound(id.to_string()));
            }
            Err(err) => {
                self.set_state(SessionState::Failed);
                return Err(err);
            }
        };

        self.release_engine().await;

        let (status_tx, status_rx) = mpsc::unbounded_channel();
        let handle = match self
            .backend
            .load(&track.audio_url, LoadOptions { autoplay: false }, status_tx)
            .await
        {
            Ok(handle) => handle,
            Err(err) => {
                self.set_state(SessionState::Failed);
                return Err(SessionError::EngineLoad(err.to_string()));
            }
        };

        debug!("loaded track {} ({})", track.id, track.title);

        // Publish Ready before the status task starts, so the first
        // engine event lands on a state that accepts it.
        self.view_tx.send_replace(SessionView {
            state: SessionState::Ready,
            snapshot: PlaybackSnapshot {
                is_ready: true,
                ..PlaybackSnapshot::default()
            },
            track: Some(track),
        });
        self.status_task = Some(spawn_status_task(status_rx, self.view_tx.clone()));
        self.handle = Some(handle);

        Ok(())
    }

    /// Issue play or pause against the last engine-confirmed state.
    ///
    /// No-op without a loaded resource. The snapshot is not flipped
    /// here; the engine's next status event confirms the transition.
    pub async fn toggle_play_pause(&mut self) {
        let playing = self.view_tx.borrow().snapshot.is_playing;
        let Some(handle) = self.handle.as_mut() else {
            return;
        };

        let result = if playing {
            handle.pause().await
        } else {
            handle.play().await
        };

        if let Err(err) = result {
            // Recoverable: the next valid status event self-corrects.
            warn!("play/pause rejected by engine: {}", err);
        }
    }

    /// Seek forward by the configured skip step, clamped to the track
    pub async fn skip_forward(&mut self) {
        let target = {
            let view = self.view_tx.borrow();
            skip_target(&view.snapshot, self.config.skip_step.as_millis() as u64, true)
        };
        self.request_seek(target).await;
    }

    /// Seek backward by the configured skip step, clamped to zero
    pub async fn skip_backward(&mut self) {
        let target = {
            let view = self.view_tx.borrow();
            skip_target(&view.snapshot, self.config.skip_step.as_millis() as u64, false)
        };
        self.request_seek(target).await;
    }

    /// Seek to a fraction of the track (0.0 = start, 1.0 = end)
    ///
    /// A newer request supersedes an older unresolved one: seeks may
    /// complete out of order inside the engine, and the displayed
    /// position is only ever what the engine reports afterwards.
    pub async fn seek_to_fraction(&mut self, fraction: f64) {
        let fraction = fraction.clamp(0.0, 1.0);
        let duration = self.view_tx.borrow().snapshot.duration_millis;
        let target = (duration as f64 * fraction).round() as u64;
        self.request_seek(target).await;
    }

    /// Tear down the session and release the engine resource.
    ///
    /// The status listener is removed before unload, so no callback
    /// can fire into a session that is being destroyed. Idempotent:
    /// calling it twice, or before a load ever finished, is safe.
    pub async fn teardown(&mut self) {
        self.release_engine().await;
        self.view_tx.send_modify(|view| {
            view.state = SessionState::Unloaded;
            view.track = None;
        });
    }

    /// Issue a seek; the engine's next status event, not this call,
    /// decides the displayed position.
    async fn request_seek(&mut self, position_millis: u64) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };

        if let Err(err) = handle.seek_to(position_millis).await {
            warn!("seek to {} ms rejected by engine: {}", position_millis, err);
        }
    }

    /// Release the owned engine, if any: listener off, status task
    /// stopped, then unload awaited to completion.
    async fn release_engine(&mut self) {
        let task = self.status_task.take();

        if let Some(mut handle) = self.handle.take() {
            handle.set_status_listener(None);
            if let Some(task) = task {
                task.abort();
            }
            if let Err(err) = handle.unload().await {
                warn!("engine unload failed: {}", err);
            }
        } else if let Some(task) = task {
            task.abort();
        }
    }

    fn set_state(&self, state: SessionState) {
        self.view_tx.send_modify(|view| view.state = state);
    }
}

/// Compute a relative skip target, clamped to [0, duration].
///
/// With an unknown duration (0) a forward skip resolves to 0 rather
/// than overshooting into undefined territory.
fn skip_target(snapshot: &PlaybackSnapshot, step_millis: u64, forward: bool) -> u64 {
    if forward {
        snapshot
            .position_millis
            .saturating_add(step_millis)
            .min(snapshot.duration_millis)
    } else {
        snapshot.position_millis.saturating_sub(step_millis)
    }
}

/// Sole writer of the published snapshot.
///
/// Applies engine status events one at a time. "Not loaded" events
/// leave the view untouched, and a session that has left the
/// Ready/Playing/Paused family is never resurrected by a late event.
fn spawn_status_task(
    mut status_rx: mpsc::UnboundedReceiver<EngineStatus>,
    view_tx: watch::Sender<SessionView>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(status) = status_rx.recv().await {
            if !status.is_loaded {
                continue;
            }

            view_tx.send_modify(|view| {
                if !view.state.accepts_status() {
                    return;
                }
                view.snapshot = PlaybackSnapshot::from_status(&status);
                view.state = if status.is_playing {
                    SessionState::Playing
                } else {
                    SessionState::Paused
                };
            });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(position_millis: u64, duration_millis: u64) -> PlaybackSnapshot {
        PlaybackSnapshot {
            position_millis,
            duration_millis,
            is_playing: false,
            is_ready: true,
        }
    }

    #[test]
    fn backward_skip_clamps_to_zero() {
        assert_eq!(skip_target(&snapshot(3_000, 600_000), 15_000, false), 0);
    }

    #[test]
    fn forward_skip_clamps_to_duration() {
        assert_eq!(
            skip_target(&snapshot(595_000, 600_000), 15_000, true),
            600_000
        );
    }

    #[test]
    fn forward_skip_with_unknown_duration_stays_at_zero() {
        assert_eq!(skip_target(&snapshot(0, 0), 15_000, true), 0);
    }

    #[test]
    fn mid_track_skips_move_by_the_step() {
        assert_eq!(skip_target(&snapshot(60_000, 600_000), 15_000, true), 75_000);
        assert_eq!(
            skip_target(&snapshot(60_000, 600_000), 15_000, false),
            45_000
        );
    }
}
