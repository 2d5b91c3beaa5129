//! Time Management
//!
//! Time-step model supporting:
//! - Wall-clock frame deltas with an upper clamp (no spiral of death)
//! - Fixed-step substep scheduling with a bounded substep count
//! - An interpolation factor for presenting between fixed steps

use std::time::{Duration, Instant};

/// Small slack so an exact multiple of the step is not lost to rounding
const ACCUMULATOR_EPSILON: f64 = 1.0e-9;

/// Fixed time step configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTimeStep {
    /// Fixed timestep in seconds
    pub step: f64,
    /// Maximum number of fixed updates per advance (to prevent spiral of death)
    pub max_updates: u32,
}

impl Default for FixedTimeStep {
    fn default() -> Self {
        Self {
            step: 1.0 / 60.0, // 60 Hz
            max_updates: 10,
        }
    }
}

impl FixedTimeStep {
    /// Create a new fixed time step with the given frequency
    pub fn from_hz(hz: f64) -> Self {
        Self {
            step: 1.0 / hz,
            ..Self::default()
        }
    }

    /// Create a new fixed time step with the given step size
    pub fn from_step(step: f64) -> Self {
        Self {
            step,
            ..Self::default()
        }
    }

    /// Set the maximum number of updates per advance
    pub fn with_max_updates(mut self, max: u32) -> Self {
        self.max_updates = max;
        self
    }
}

/// Accumulates frame time and hands out whole fixed steps
///
/// Time that exceeds `max_updates` steps in a single advance is dropped
/// rather than carried, so one long stall never forces a burst of catch-up
/// steps on the following frames.
#[derive(Debug, Clone)]
pub struct StepAccumulator {
    config: FixedTimeStep,
    accumulator: f64,
    total_steps: u64,
}

impl StepAccumulator {
    /// Create an empty accumulator
    pub fn new(config: FixedTimeStep) -> Self {
        Self {
            config,
            accumulator: 0.0,
            total_steps: 0,
        }
    }

    /// The step configuration
    pub fn config(&self) -> FixedTimeStep {
        self.config
    }

    /// Add `delta` seconds and return how many fixed steps are due now
    pub fn advance(&mut self, delta: f64) -> u32 {
        if delta > 0.0 {
            self.accumulator += delta;
        }

        let due = ((self.accumulator + ACCUMULATOR_EPSILON) / self.config.step).floor();
        let due = due.max(0.0) as u64;
        self.accumulator = (self.accumulator - due as f64 * self.config.step).max(0.0);

        let steps = due.min(self.config.max_updates as u64) as u32;
        if (steps as u64) < due {
            // Clamped: the remainder is no longer meaningful for interpolation
            self.accumulator = 0.0;
        }

        self.total_steps += steps as u64;
        steps
    }

    /// Interpolation factor between the last two fixed steps
    pub fn alpha(&self) -> f64 {
        (self.accumulator / self.config.step).clamp(0.0, 1.0)
    }

    /// Leftover time not yet consumed by a fixed step
    pub fn remainder(&self) -> f64 {
        self.accumulator
    }

    /// Fixed steps handed out since creation
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Drop any accumulated time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

impl Default for StepAccumulator {
    fn default() -> Self {
        Self::new(FixedTimeStep::default())
    }
}

/// Measures wall-clock time between ticks with an upper clamp
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_tick: Instant,
    max_delta: Duration,
    frame_count: u64,
}

impl FrameClock {
    /// Start a clock whose deltas never exceed `max_delta`
    pub fn new(max_delta: Duration) -> Self {
        Self {
            last_tick: Instant::now(),
            max_delta,
            frame_count: 0,
        }
    }

    /// Time since the previous tick, clamped to the maximum delta
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.frame_count += 1;
        elapsed.min(self.max_delta)
    }

    /// The clamp applied to every delta
    pub fn max_delta(&self) -> Duration {
        self.max_delta
    }

    /// Number of ticks so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
