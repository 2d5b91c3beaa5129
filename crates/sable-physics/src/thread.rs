//! Simulation Thread
//!
//! A named background thread that steps the shared world:
//! - Measures the wall-clock delta since its previous iteration
//! - Clamps the delta so a stall never requests unbounded catch-up
//! - Steps the world under the lock and records how long the step took
//! - Sleeps briefly before the next iteration

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::atomic::AtomicCell;
use sable_core::FrameClock;

use crate::config::PhysicsConfig;
use crate::system::SharedWorld;
use crate::{PhysicsError, PhysicsResult};

const THREAD_NAME: &str = "sable-physics";

/// Background stepping loop for a shared world
pub struct SimulationThread {
    handle: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
    /// Duration of the most recent step, in milliseconds
    last_step_ms: Arc<AtomicCell<f32>>,
    max_frame_delta: Duration,
    sleep: Duration,
}

impl SimulationThread {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            handle: None,
            running: Arc::new(AtomicBool::new(false)),
            last_step_ms: Arc::new(AtomicCell::new(0.0)),
            max_frame_delta: config.max_frame_delta(),
            sleep: config.thread_sleep(),
        }
    }

    /// Spawn the loop; fails if it is already running
    pub fn start(&mut self, world: SharedWorld) -> PhysicsResult<()> {
        if self.handle.is_some() {
            return Err(PhysicsError::AlreadyRunning);
        }

        self.running.store(true, Ordering::Release);
        let running = self.running.clone();
        let last_step_ms = self.last_step_ms.clone();
        let max_frame_delta = self.max_frame_delta;
        let sleep = self.sleep;

        let spawned = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || run(world, running, last_step_ms, max_frame_delta, sleep));

        match spawned {
            Ok(handle) => {
                log::info!("Simulation thread started");
                self.handle = Some(handle);
                Ok(())
            }
            Err(err) => {
                self.running.store(false, Ordering::Release);
                Err(PhysicsError::ThreadSpawn(err))
            }
        }
    }

    /// Signal the loop to exit and wait for it
    ///
    /// Returns after at most one in-flight iteration has finished.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Simulation thread panicked");
            } else {
                log::info!("Simulation thread stopped");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Wall-clock time of the most recent step, in milliseconds
    pub fn last_step_millis(&self) -> f32 {
        self.last_step_ms.load()
    }
}

impl Drop for SimulationThread {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(
    world: SharedWorld,
    running: Arc<AtomicBool>,
    last_step_ms: Arc<AtomicCell<f32>>,
    max_frame_delta: Duration,
    sleep: Duration,
) {
    let mut clock = FrameClock::new(max_frame_delta);

    while running.load(Ordering::Acquire) {
        let delta = clock.tick();
        {
            let mut world = world.lock();
            let started = Instant::now();
            let steps = world.step(delta.as_secs_f32());
            let elapsed = started.elapsed();

            last_step_ms.store(elapsed.as_secs_f32() * 1000.0);
            tracing::trace!(
                target: "timing",
                name = "physics_step",
                steps,
                duration_us = elapsed.as_micros() as u64,
                "Timer completed"
            );
        }
        thread::sleep(sleep);
    }
}
