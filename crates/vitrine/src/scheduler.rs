//! One-shot timers against an injected clock.
//!
//! Timers fire in due order. A timer that fires late still reports its own
//! due time, so follow-up timers chained from it keep exact spacing even
//! when the host skips frames.

use std::time::Duration;

/// A pending timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timer<T> {
    /// When it fires.
    pub due: Duration,
    /// What it is.
    pub kind: T,
}

/// Pending one-shot timers.
#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    pending: Vec<Timer<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self { pending: Vec::new() }
    }
}

impl<T> Scheduler<T> {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `kind` to fire `delay` after `from`.
    pub fn schedule(&mut self, from: Duration, delay: Duration, kind: T) {
        self.pending.push(Timer { due: from + delay, kind });
    }

    /// Drops everything.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Removes and returns the earliest timer due at `now`, if any.
    pub fn pop_due(&mut self, now: Duration) -> Option<Timer<T>> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= now)
            .min_by_key(|(_, timer)| timer.due)
            .map(|(index, _)| index)?;
        Some(self.pending.remove(index))
    }
}
