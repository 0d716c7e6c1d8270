//! Injectable time source.
//!
//! Everything time-dependent reads a [`Clock`] instead of the wall clock so
//! hosts can drive frames deterministically.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

/// Monotonic time since an arbitrary origin.
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Wall-clock time since construction.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Starts a clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Arc<RwLock<Duration>>,
}

impl ManualClock {
    /// Creates a clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        *self.now.write() += delta;
    }

    /// Jumps to `at`. Earlier values are ignored; time never runs backwards.
    pub fn set(&self, at: Duration) {
        let mut now = self.now.write();
        if at > *now {
            *now = at;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.read()
    }
}
