//! Render Loop - the per-refresh frame driver
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      FRAME TIMELINE                      │
//! ├──────────────────────────────────────────────────────────┤
//! │  dt = clock.now() - previous                             │
//! │  ├── 1. Advance camera tweens       (collect settles)    │
//! │  ├── 2. Advance mixer / idle spin                        │
//! │  ├── 3. Render the ACTIVE viewport only                  │
//! │  └── 4. Ease parallax toward the pointer                 │
//! └──────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::animation::Settled;
use crate::clock::Clock;
use crate::session::{ActiveViewport, SceneSession};

/// Result of a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Frame number (1-based).
    pub frame: u64,
    /// Delta applied this frame.
    pub dt: Duration,
    /// Viewport drawn.
    pub viewport: ActiveViewport,
    /// Tweens that settled this frame.
    pub settled: Vec<Settled>,
}

/// Statistics for the render loop.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderLoopStats {
    /// Total frames run.
    pub total_frames: u64,
    /// Frames that ran with a zero delta.
    pub zero_delta_frames: u64,
    /// Longest delta seen.
    pub longest_delta: Duration,
}

/// Halts a [`RenderLoop`]. Clones share the flag.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Stops scheduling further frames.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// True once stopped.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The frame driver.
pub struct RenderLoop<C: Clock> {
    clock: C,
    previous: Option<Duration>,
    frame_count: u64,
    stop: StopHandle,
    stats: RenderLoopStats,
}

impl<C: Clock> RenderLoop<C> {
    /// Creates a loop reading time from `clock`.
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            previous: None,
            frame_count: 0,
            stop: StopHandle::default(),
            stats: RenderLoopStats::default(),
        }
    }

    /// Handle that stops this loop.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// True while frames are still scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.stop.is_stopped()
    }

    /// The loop's clock.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Statistics so far.
    #[must_use]
    pub fn stats(&self) -> RenderLoopStats {
        self.stats
    }

    /// Runs one frame. Returns `None` once stopped.
    ///
    /// The first frame runs with a zero delta.
    pub fn tick(&mut self, session: &mut SceneSession) -> Option<FrameReport> {
        if self.stop.is_stopped() {
            return None;
        }

        let now = self.clock.now();
        let dt = self.previous.map_or(Duration::ZERO, |previous| now.saturating_sub(previous));
        self.previous = Some(now);
        self.frame_count += 1;

        let settled = session.advance_tweens(dt);
        session.advance_mixer(dt);
        let viewport = session.render();
        session.apply_parallax(dt);

        self.stats.total_frames += 1;
        if dt.is_zero() {
            self.stats.zero_delta_frames += 1;
        }
        self.stats.longest_delta = self.stats.longest_delta.max(dt);
        tracing::trace!("Frame {} dt={dt:?} viewport={viewport:?}", self.frame_count);

        Some(FrameReport {
            frame: self.frame_count,
            dt,
            viewport,
            settled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::session::VisibilityGate;
    use vitrine_shared::Vec2;

    #[test]
    fn test_zero_delta_ticks_change_nothing() {
        let clock = ManualClock::new();
        let mut frames = RenderLoop::new(clock.clone());
        let mut session = SceneSession::headless(VisibilityGate::default());
        session.set_pointer(Vec2::new(0.4, -0.3));
        session.start_intro(Duration::from_millis(3500));

        frames.tick(&mut session);
        clock.advance(Duration::from_millis(16));
        frames.tick(&mut session);
        let cameras = session.cameras().clone();
        let parallax = *session.parallax();

        for _ in 0..5 {
            let report = frames.tick(&mut session).unwrap();
            assert!(report.dt.is_zero());
        }
        assert_eq!(session.cameras(), &cameras);
        assert_eq!(session.parallax(), &parallax);
        assert_eq!(frames.stats().zero_delta_frames, 6);
    }

    #[test]
    fn test_stop_halts_ticks() {
        let mut frames = RenderLoop::new(ManualClock::new());
        let mut session = SceneSession::headless(VisibilityGate::default());
        let stop = frames.stop_handle();

        assert!(frames.tick(&mut session).is_some());
        stop.stop();
        assert!(frames.tick(&mut session).is_none());
        assert!(!frames.is_running());
        assert_eq!(session.frames_rendered(ActiveViewport::Primary), 1);
    }

    #[test]
    fn test_settles_are_reported_by_tick() {
        let clock = ManualClock::new();
        let mut frames = RenderLoop::new(clock.clone());
        let mut session = SceneSession::headless(VisibilityGate::default());
        session.start_intro(Duration::from_millis(100));

        frames.tick(&mut session);
        clock.advance(Duration::from_millis(150));
        let report = frames.tick(&mut session).unwrap();
        assert_eq!(report.settled.len(), 1);
        assert_eq!(report.frame, 2);
    }
}
