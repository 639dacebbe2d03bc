//! Progress and rotation derivation for the player screen
//!
//! Derives two animated values from the session view: a progress
//! ratio (position / duration) and a cyclic disc rotation phase gated
//! by the playing flag. The rotation ticker exists only while the
//! engine reports playing and is dropped on every exit path, so it
//! can neither outlive a pause nor leak across teardown.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::{interval, Instant, Interval, MissedTickBehavior};

use crate::types::{PlaybackSnapshot, SessionConfig, SessionView};

/// Animated values derived from the session view
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PresenterFrame {
    /// position / duration, clamped to [0, 1]; 0 while duration unknown
    pub progress_ratio: f32,

    /// Disc rotation in [0, 1); one revolution per rotation period
    pub rotation_phase: f32,
}

/// position / duration, clamped to [0, 1]
pub fn progress_ratio(snapshot: &PlaybackSnapshot) -> f32 {
    if snapshot.duration_millis == 0 {
        return 0.0;
    }
    (snapshot.position_millis as f32 / snapshot.duration_millis as f32).clamp(0.0, 1.0)
}

/// Format a millisecond offset as m:ss (e.g. 300000 → "5:00")
pub fn format_clock(millis: u64) -> String {
    let total_secs = millis / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Cyclic rotation phase, advanced by the clock while playing
///
/// Resets to phase 0 the moment playback stops.
#[derive(Debug)]
pub struct RotationPhase {
    period: Duration,
    started_at: Option<Instant>,
}

impl RotationPhase {
    /// Create a phase accumulator with the given revolution period
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            started_at: None,
        }
    }

    /// Advance (or reset) for the given playing flag and clock reading
    pub fn update(&mut self, is_playing: bool, now: Instant) -> f32 {
        if !is_playing {
            self.started_at = None;
            return 0.0;
        }

        let started = *self.started_at.get_or_insert(now);
        let elapsed = now.duration_since(started).as_millis();
        let period = self.period.as_millis().max(1);
        (elapsed % period) as f32 / period as f32
    }
}

/// Drives the two animated values from session view changes
///
/// Owns no playback state of its own: every frame is recomputed from
/// the last published snapshot and the wall clock.
pub struct Presenter {
    view_rx: watch::Receiver<SessionView>,
    frame_tx: watch::Sender<PresenterFrame>,
    rotation: RotationPhase,
    frame_interval: Duration,
}

impl Presenter {
    /// Create a presenter over a session view subscription
    ///
    /// Returns the presenter and the receiver its frames are
    /// published on.
    pub fn new(
        view_rx: watch::Receiver<SessionView>,
        config: &SessionConfig,
    ) -> (Self, watch::Receiver<PresenterFrame>) {
        let (frame_tx, frame_rx) = watch::channel(PresenterFrame::default());

        (
            Self {
                view_rx,
                frame_tx,
                rotation: RotationPhase::new(config.rotation_period),
                frame_interval: config.frame_interval,
            },
            frame_rx,
        )
    }

    /// Run until the session side of the view channel is dropped.
    ///
    /// Entering Playing starts the frame ticker; leaving Playing drops
    /// it in the same iteration, which also resets the rotation phase.
    pub async fn run(mut self) {
        let mut ticker: Option<Interval> = None;

        loop {
            tokio::select! {
                changed = self.view_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let playing = self.publish();
                    if playing && ticker.is_none() {
                        let mut t = interval(self.frame_interval);
                        t.set_missed_tick_behavior(MissedTickBehavior::Skip);
                        ticker = Some(t);
                    } else if !playing {
                        ticker = None;
                    }
                }
                () = next_tick(&mut ticker) => {
                    self.publish();
                }
            }
        }
    }

    /// Recompute both values from the current view; returns the
    /// playing flag
    fn publish(&mut self) -> bool {
        let snapshot = self.view_rx.borrow_and_update().snapshot;
        let frame = PresenterFrame {
            progress_ratio: progress_ratio(&snapshot),
            rotation_phase: self.rotation.update(snapshot.is_playing, Instant::now()),
        };
        self.frame_tx.send_replace(frame);
        snapshot.is_playing
    }
}

/// Await the next frame tick; pending forever while the ticker is off
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker.as_mut() {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_zero_until_duration_known() {
        let snapshot = PlaybackSnapshot {
            position_millis: 42_000,
            duration_millis: 0,
            is_playing: false,
            is_ready: true,
        };
        assert_eq!(progress_ratio(&snapshot), 0.0);
    }

    #[test]
    fn progress_is_position_over_duration() {
        let snapshot = PlaybackSnapshot {
            position_millis: 300_000,
            duration_millis: 600_000,
            is_playing: true,
            is_ready: true,
        };
        assert_eq!(progress_ratio(&snapshot), 0.5);
    }

    #[test]
    fn clock_formats_minutes_and_seconds() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(300_000), "5:00");
        assert_eq!(format_clock(61_500), "1:01");
        assert_eq!(format_clock(3_600_000), "60:00");
    }

    #[test]
    fn rotation_advances_and_wraps_while_playing() {
        let mut rotation = RotationPhase::new(Duration::from_millis(5_000));
        let start = Instant::now();

        assert_eq!(rotation.update(true, start), 0.0);
        let quarter = rotation.update(true, start + Duration::from_millis(1_250));
        assert!((quarter - 0.25).abs() < 1e-6);

        // One full revolution plus a half
        let wrapped = rotation.update(true, start + Duration::from_millis(7_500));
        assert!((wrapped - 0.5).abs() < 1e-6);
    }

    #[test]
    fn rotation_resets_immediately_on_pause() {
        let mut rotation = RotationPhase::new(Duration::from_millis(5_000));
        let start = Instant::now();

        rotation.update(true, start);
        rotation.update(true, start + Duration::from_millis(2_000));
        assert_eq!(rotation.update(false, start + Duration::from_millis(2_001)), 0.0);

        // Restarting begins a fresh revolution
        assert_eq!(rotation.update(true, start + Duration::from_millis(3_000)), 0.0);
    }
}
