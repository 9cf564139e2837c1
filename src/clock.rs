//! Pacing for the render loop.

use std::time::{Duration, Instant};

/// Monotonic time source plus the ability to wait on it.
///
/// Time is measured from the clock's own origin; only differences matter.
pub trait FrameClock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
    /// Block the render loop for `d`.
    fn sleep(&mut self, d: Duration);
}

impl<T: FrameClock + ?Sized> FrameClock for &mut T {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn sleep(&mut self, d: Duration) {
        (**self).sleep(d)
    }
}

/// Real time, backed by [`Instant`] and [`std::thread::sleep`].
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    origin: Instant,
}

impl WallClock {
    /// Clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for WallClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, d: Duration) {
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}

/// Virtual time that only moves when slept on or advanced explicitly.
///
/// Makes timing deterministic: a segment of `n` frame intervals takes exactly that long.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    /// Clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward without sleeping, e.g. to model work that takes time.
    pub fn advance(&mut self, d: Duration) {
        self.now += d;
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, d: Duration) {
        self.now += d;
    }
}

#[cfg(test)]
#[path = "../tests/unit/clock.rs"]
mod tests;
