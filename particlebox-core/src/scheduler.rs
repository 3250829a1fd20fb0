//! Fixed-step scheduling
//!
//! Converts variable frame durations into a whole number of fixed physics
//! steps plus a carried remainder. Time is held as [`Duration`] so that tick
//! counting is exact: feeding 50ms at once or 10ms five times yields the same
//! five ticks.

use crate::error::SimulationError;
use std::time::Duration;

/// One fixed physics step handed out by the scheduler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Running tick number since the scheduler was created or reset
    pub index: u64,
    /// Step size in seconds
    pub dt: f32,
}

/// Iterator over the ticks produced by one [`FixedStepScheduler::advance`]
#[derive(Debug, Clone)]
pub struct Ticks {
    next_index: u64,
    remaining: u64,
    dt: f32,
}

impl Ticks {
    pub fn count_remaining(&self) -> u64 {
        self.remaining
    }
}

impl Iterator for Ticks {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        if self.remaining == 0 {
            return None;
        }
        let tick = Tick {
            index: self.next_index,
            dt: self.dt,
        };
        self.next_index += 1;
        self.remaining -= 1;
        Some(tick)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// Accumulator that drains real elapsed time in fixed increments
#[derive(Debug, Clone)]
pub struct FixedStepScheduler {
    fixed_delta: Duration,
    accumulator: Duration,
    max_steps_per_advance: Option<u32>,
    total_ticks: u64,
    dropped: Duration,
}

impl FixedStepScheduler {
    pub fn new(fixed_delta: Duration) -> Result<Self, SimulationError> {
        if fixed_delta.is_zero() {
            return Err(SimulationError::invalid("fixed_delta_time must be positive"));
        }
        Ok(Self {
            fixed_delta,
            accumulator: Duration::ZERO,
            max_steps_per_advance: None,
            total_ticks: 0,
            dropped: Duration::ZERO,
        })
    }

    /// Build from a step size in seconds
    pub fn from_secs(fixed_delta_time: f64) -> Result<Self, SimulationError> {
        if !fixed_delta_time.is_finite() || fixed_delta_time <= 0.0 {
            return Err(SimulationError::invalid(format!(
                "fixed_delta_time must be positive and finite, got {}",
                fixed_delta_time
            )));
        }
        let fixed_delta = Duration::try_from_secs_f64(fixed_delta_time).map_err(|_| {
            SimulationError::invalid(format!(
                "fixed_delta_time {} is too large to represent",
                fixed_delta_time
            ))
        })?;
        Self::new(fixed_delta)
    }

    /// Cap how many ticks a single advance may produce.
    ///
    /// Whole steps beyond the cap are discarded; the sub-step remainder is kept.
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps_per_advance = Some(max_steps.max(1));
        self
    }

    pub fn fixed_delta(&self) -> Duration {
        self.fixed_delta
    }

    pub fn fixed_delta_time(&self) -> f32 {
        self.fixed_delta.as_secs_f32()
    }

    pub fn accumulator(&self) -> Duration {
        self.accumulator
    }

    pub fn max_steps_per_advance(&self) -> Option<u32> {
        self.max_steps_per_advance
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Real time thrown away by the step cap so far
    pub fn dropped(&self) -> Duration {
        self.dropped
    }

    /// Fraction of a step left in the accumulator, in [0, 1)
    pub fn alpha(&self) -> f64 {
        self.accumulator.as_secs_f64() / self.fixed_delta.as_secs_f64()
    }

    /// Add `real_delta` to the accumulator and drain it into fixed ticks
    pub fn advance(&mut self, real_delta: Duration) -> Ticks {
        let fixed = self.fixed_delta.as_nanos();
        let total = self.accumulator.as_nanos() + real_delta.as_nanos();
        let available = total / fixed;
        self.accumulator = duration_from_nanos(total % fixed);

        let limit = self.max_steps_per_advance.map_or(u64::MAX, u64::from);
        let steps = u64::try_from(available).unwrap_or(u64::MAX).min(limit);

        if u128::from(steps) < available {
            let surplus = duration_from_nanos((available - u128::from(steps)) * fixed);
            log::warn!(
                "physics fell behind: dropping {} steps ({:?}) after {:?} frame",
                available - u128::from(steps),
                surplus,
                real_delta
            );
            self.dropped = self.dropped.saturating_add(surplus);
        }
        debug_assert!(self.accumulator < self.fixed_delta);

        let ticks = Ticks {
            next_index: self.total_ticks,
            remaining: steps,
            dt: self.fixed_delta_time(),
        };
        self.total_ticks = self.total_ticks.saturating_add(steps);
        ticks
    }

    /// Same as [`advance`](Self::advance) with the frame time in seconds.
    ///
    /// Negative or non-finite input counts as no time passing. Frames too long
    /// for a [`Duration`] saturate to [`Duration::MAX`].
    pub fn advance_secs(&mut self, real_delta_time: f64) -> Ticks {
        let real_delta = if real_delta_time.is_finite() && real_delta_time > 0.0 {
            Duration::try_from_secs_f64(real_delta_time).unwrap_or(Duration::MAX)
        } else {
            if real_delta_time != 0.0 {
                log::warn!("ignoring invalid frame time {}", real_delta_time);
            }
            Duration::ZERO
        };
        self.advance(real_delta)
    }

    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
        self.total_ticks = 0;
        self.dropped = Duration::ZERO;
    }
}

/// Saturates at `Duration::MAX`
fn duration_from_nanos(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    match u64::try_from(nanos / NANOS_PER_SEC) {
        Ok(secs) => Duration::new(secs, (nanos % NANOS_PER_SEC) as u32),
        Err(_) => Duration::MAX,
    }
}
