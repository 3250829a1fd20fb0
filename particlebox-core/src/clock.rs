//! Time sources feeding the scheduler

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic elapsed-time source
pub trait Clock {
    fn elapsed(&self) -> Duration;

    fn elapsed_seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

/// Wall clock started at construction.
///
/// `time_scale` speeds up or slows down the reported time.
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
    time_scale: f64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::with_time_scale(1.0)
    }

    pub fn with_time_scale(time_scale: f64) -> Self {
        Self {
            start: Instant::now(),
            time_scale: if time_scale.is_finite() && time_scale > 0.0 {
                time_scale
            } else {
                1.0
            },
        }
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed().mul_f64(self.time_scale)
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn elapsed(&self) -> Duration {
        (**self).elapsed()
    }
}

/// Turns a clock's elapsed time into per-frame deltas
#[derive(Debug)]
pub struct FrameTimer<C: Clock> {
    clock: C,
    last: Duration,
    frames: u64,
}

impl<C: Clock> FrameTimer<C> {
    pub fn new(clock: C) -> Self {
        let last = clock.elapsed();
        Self {
            clock,
            last,
            frames: 0,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Time since the previous call (or since construction)
    pub fn tick(&mut self) -> Duration {
        let now = self.clock.elapsed();
        self.frames += 1;
        let delta = match now.checked_sub(self.last) {
            Some(delta) => delta,
            None => {
                log::warn!(
                    "clock went backwards ({:?} -> {:?}), treating frame as zero length",
                    self.last,
                    now
                );
                Duration::ZERO
            }
        };
        self.last = now;
        delta
    }
}
