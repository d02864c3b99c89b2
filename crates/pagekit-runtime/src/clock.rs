#![forbid(unsafe_code)]

//! Time sources.
//!
//! All pagekit time is "time since page load" as a [`Duration`]. The
//! coordinator never reads a wall clock itself; the host either advances a
//! [`VirtualClock`] explicitly (tests, replay) or samples a [`SystemClock`]
//! and forwards the delta.

use std::time::Duration;

use web_time::Instant;

/// Source of page-relative time.
pub trait Clock {
    /// Time elapsed since page load.
    fn now(&self) -> Duration;
}

/// Manually advanced clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VirtualClock {
    now: Duration,
}

impl VirtualClock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Move forward by `delta`.
    pub fn advance(&mut self, delta: Duration) {
        self.now = self.now.saturating_add(delta);
    }

    /// Jump to `now`. Moving backwards is ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        self.now
    }
}

/// Monotonic wall clock anchored at construction. Works on `wasm32` through
/// `web-time`.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
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
