//! Physics world configuration

use std::time::Duration;

use glam::Vec3;
use sable_core::FixedTimeStep;
use serde::{Deserialize, Serialize};

use crate::{PhysicsError, PhysicsResult};

const DEFAULT_MAX_FRAME_DELTA: f32 = 0.1;

/// Physics world configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity acceleration applied to every dynamic body
    pub gravity: Vec3,
    /// Internal fixed step in seconds
    pub fixed_timestep: f32,
    /// Maximum internal steps per `step` call; zero selects a variable step
    pub max_substeps: u32,
    /// Upper clamp for the simulation thread's frame delta, in seconds
    pub max_frame_delta: f32,
    /// Pause between simulation thread iterations, in milliseconds
    pub thread_sleep_ms: u64,
    /// Collect wireframe lines for the debug overlay
    pub debug_draw: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 10,
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA,
            thread_sleep_ms: 1,
            debug_draw: true,
        }
    }
}

impl PhysicsConfig {
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_fixed_timestep(mut self, step: f32) -> Self {
        self.fixed_timestep = step;
        self
    }

    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps;
        self
    }

    pub fn with_debug_draw(mut self, enabled: bool) -> Self {
        self.debug_draw = enabled;
        self
    }

    /// Check that the configuration can drive a simulation
    pub fn validate(&self) -> PhysicsResult<()> {
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "fixed_timestep must be positive, got {}",
                self.fixed_timestep
            )));
        }
        if !(self.max_frame_delta.is_finite() && self.max_frame_delta > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "max_frame_delta must be positive, got {}",
                self.max_frame_delta
            )));
        }
        Ok(())
    }

    /// Fixed-step schedule used by the world
    pub fn time_step(&self) -> FixedTimeStep {
        FixedTimeStep::from_step(self.fixed_timestep as f64).with_max_updates(self.max_substeps)
    }

    /// Frame delta clamp for the simulation thread
    ///
    /// A value that is not a positive number of seconds falls back to the
    /// default clamp.
    pub fn max_frame_delta(&self) -> Duration {
        let seconds = if self.max_frame_delta.is_finite() && self.max_frame_delta > 0.0 {
            self.max_frame_delta
        } else {
            log::warn!(
                "Ignoring max_frame_delta {}; using {}s",
                self.max_frame_delta,
                DEFAULT_MAX_FRAME_DELTA
            );
            DEFAULT_MAX_FRAME_DELTA
        };
        Duration::from_secs_f32(seconds)
    }

    /// Sleep between simulation thread iterations
    pub fn thread_sleep(&self) -> Duration {
        Duration::from_millis(self.thread_sleep_ms)
    }
}
