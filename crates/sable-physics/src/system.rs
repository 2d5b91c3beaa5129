//! Physics System
//!
//! Ties the shared world to its simulation thread and exposes the calls the
//! main loop makes each frame.

use std::sync::Arc;

use glam::Vec3;
use parking_lot::Mutex;
use sable_core::{Entity, Scene};

use crate::body::BodyHandle;
use crate::config::PhysicsConfig;
use crate::debug_draw::{CameraMatrices, LineRenderer};
use crate::raycast::RaycastHit;
use crate::rigidbody::{RigidbodyComponent, RigidbodyDescriptor};
use crate::thread::SimulationThread;
use crate::world::PhysicsWorld;
use crate::PhysicsResult;

/// World shared between the simulation thread and the main thread
pub type SharedWorld = Arc<Mutex<PhysicsWorld>>;

/// Owns the physics world and the thread that steps it
pub struct PhysicsSystem {
    world: SharedWorld,
    thread: SimulationThread,
}

impl PhysicsSystem {
    /// Create a system with an uninitialized world and a stopped thread
    pub fn new(config: PhysicsConfig) -> PhysicsResult<Self> {
        config.validate()?;
        let thread = SimulationThread::new(&config);

        Ok(Self {
            world: Arc::new(Mutex::new(PhysicsWorld::new(config))),
            thread,
        })
    }

    /// Build the dynamics world and start stepping it
    pub fn initialize(&mut self) -> PhysicsResult<()> {
        self.world.lock().initialize();
        self.thread.start(self.world.clone())
    }

    /// Stop the thread, then tear the world down
    pub fn shutdown(&mut self) {
        self.thread.stop();
        self.world.lock().shutdown();
    }

    /// Copy simulated poses into the scene's transforms
    pub fn update(&self, scene: &mut Scene) -> usize {
        self.world.lock().sync_transforms(scene)
    }

    /// Create a body for `entity` and attach the facade to it
    ///
    /// Any previous rigidbody on the entity is detached first.
    pub fn add_rigidbody(
        &self,
        scene: &mut Scene,
        entity: Entity,
        descriptor: RigidbodyDescriptor,
    ) -> Option<BodyHandle> {
        if let Some(mut previous) = scene.remove_component::<RigidbodyComponent>(entity) {
            previous.detach();
        }

        let component = RigidbodyComponent::attach(&self.world, scene, entity, descriptor);
        let body = component.body();
        scene.add_component(entity, component);
        body
    }

    /// Remove an entity's body and its facade
    pub fn remove_rigidbody(&self, scene: &mut Scene, entity: Entity) -> bool {
        scene
            .remove_component::<RigidbodyComponent>(entity)
            .is_some_and(|mut component| component.detach())
    }

    pub fn raycast(
        &self,
        start: Vec3,
        end: Vec3,
        ignored: Option<BodyHandle>,
    ) -> Option<RaycastHit> {
        self.world.lock().raycast(start, end, ignored)
    }

    /// Draw the collider wireframes collected since the last call
    pub fn render_debug(&self, camera: &CameraMatrices, renderer: &mut dyn LineRenderer) -> usize {
        self.world.lock().render_debug(camera, renderer)
    }

    /// Wall-clock time of the most recent simulation step, in milliseconds
    pub fn last_physics_execution_time(&self) -> f32 {
        self.thread.last_step_millis()
    }

    pub fn is_running(&self) -> bool {
        self.thread.is_running()
    }

    pub fn world(&self) -> &SharedWorld {
        &self.world
    }
}

impl Drop for PhysicsSystem {
    fn drop(&mut self) {
        self.shutdown();
    }
}
