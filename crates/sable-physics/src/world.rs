//! Physics World
//!
//! Owns the dynamics state and the body table:
//! - Lifecycle: created empty, brought up by `initialize`, torn down by `shutdown`
//! - Fixed-step scheduling with a bounded substep count (or a variable step)
//! - Body creation from scene components and removal through one path
//! - Per-body operations used by the rigidbody facade
//! - Synchronization of simulated poses back into scene transforms
//!
//! Every operation on an uninitialized world is a silent no-op.

use glam::Vec3;
use rapier3d::pipeline::{DebugRenderMode, DebugRenderPipeline, DebugRenderStyle};
use rapier3d::prelude::*;
use sable_core::{Entity, Scene, StepAccumulator, math};

use crate::body::{BodyHandle, BodyTable, MotionState};
use crate::collider::ColliderDescriptor;
use crate::config::PhysicsConfig;
use crate::convert;
use crate::debug_draw::{CameraMatrices, DebugDrawCollector, LineRenderer};
use crate::rigidbody::RigidbodyDescriptor;
use crate::shape;

/// Solver state that only exists while the world is initialized
pub(crate) struct Simulation {
    pipeline: PhysicsPipeline,
    pub(crate) integration_parameters: IntegrationParameters,
    islands: IslandManager,
    pub(crate) broad_phase: BroadPhaseBvh,
    pub(crate) narrow_phase: NarrowPhase,
    pub(crate) bodies: RigidBodySet,
    pub(crate) colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    gravity: Vector<Real>,
    debug_pipeline: DebugRenderPipeline,
    /// Initialization this state belongs to; handles from other epochs miss
    pub(crate) epoch: u32,
    /// Bodies were added or removed since the broad phase was last rebuilt
    pub(crate) queries_stale: bool,
}

impl Simulation {
    fn new(config: &PhysicsConfig, epoch: u32) -> Self {
        let integration_parameters = IntegrationParameters {
            dt: config.fixed_timestep,
            ..IntegrationParameters::default()
        };

        Self {
            pipeline: PhysicsPipeline::new(),
            integration_parameters,
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            gravity: convert::to_vector(config.gravity),
            debug_pipeline: DebugRenderPipeline::new(
                DebugRenderStyle::default(),
                DebugRenderMode::COLLIDER_SHAPES,
            ),
            epoch,
            queries_stale: false,
        }
    }

    fn step_once(&mut self, dt: Real) {
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
        self.queries_stale = false;
    }

    /// Solver handle for a body of this epoch
    pub(crate) fn resolve(&self, handle: BodyHandle) -> Option<RigidBodyHandle> {
        (handle.epoch() == self.epoch).then(|| handle.raw())
    }

    /// Remove a body together with its colliders and shapes
    fn destroy_body(&mut self, handle: BodyHandle) -> bool {
        let Some(raw) = self.resolve(handle) else {
            return false;
        };
        self.queries_stale = true;
        self.bodies
            .remove(
                raw,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(self.resolve(handle)?)
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        let raw = self.resolve(handle)?;
        self.bodies.get_mut(raw)
    }
}

/// The dynamics world and its body table
pub struct PhysicsWorld {
    config: PhysicsConfig,
    pub(crate) sim: Option<Simulation>,
    pub(crate) table: BodyTable,
    accumulator: StepAccumulator,
    debug_draw: DebugDrawCollector,
    /// Bodies with user forces waiting for the next completed step
    pending_forces: Vec<RigidBodyHandle>,
    step_count: u64,
    epoch: u32,
}

impl PhysicsWorld {
    /// Create an uninitialized world
    pub fn new(config: PhysicsConfig) -> Self {
        let accumulator = StepAccumulator::new(config.time_step());
        let mut debug_draw = DebugDrawCollector::new();
        debug_draw.set_enabled(config.debug_draw);

        Self {
            config,
            sim: None,
            table: BodyTable::new(),
            accumulator,
            debug_draw,
            pending_forces: Vec::new(),
            step_count: 0,
            epoch: 0,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Build the solver state; calling it twice keeps the existing state
    pub fn initialize(&mut self) {
        if self.sim.is_some() {
            log::warn!("Physics world is already initialized");
            return;
        }

        log::info!(
            "Initializing physics world (gravity {}, step {:.4}s, max substeps {})",
            self.config.gravity,
            self.config.fixed_timestep,
            self.config.max_substeps
        );
        self.epoch = self.epoch.wrapping_add(1);
        self.sim = Some(Simulation::new(&self.config, self.epoch));
        self.accumulator.reset();
    }

    /// Remove every body and drop the solver state
    pub fn shutdown(&mut self) {
        let Some(mut sim) = self.sim.take() else {
            return;
        };

        let mut removed = 0;
        for entry in self.table.drain() {
            if sim.destroy_body(entry.handle) {
                removed += 1;
            }
        }
        self.pending_forces.clear();
        self.accumulator.reset();
        self.debug_draw.clear();

        log::info!("Physics world shut down ({} bodies removed)", removed);
    }

    pub fn is_initialized(&self) -> bool {
        self.sim.is_some()
    }

    /// Create a body for `entity` from its transform and collider descriptor
    ///
    /// The shape and scale are fixed at creation. An entity owns at most one
    /// body: a body it already has is removed first. Returns `None` when the
    /// world is not initialized or the entity has no transform.
    pub fn add_body(
        &mut self,
        scene: &Scene,
        entity: Entity,
        descriptor: &RigidbodyDescriptor,
    ) -> Option<BodyHandle> {
        self.sim.as_ref()?;

        let Some(transform) = scene.transform(entity) else {
            log::warn!("Cannot create a body for {:?}: entity has no transform", entity);
            return None;
        };
        if let Some(previous) = self.table.body_of(entity) {
            log::debug!("Replacing the existing body of {:?}", entity);
            self.remove_body(previous);
        }
        let sim = self.sim.as_mut()?;
        if descriptor.mass < 0.0 {
            log::warn!(
                "Negative mass {} for {:?}; creating a static body",
                descriptor.mass,
                entity
            );
        }

        let collider = scene.get::<ColliderDescriptor>(entity);
        let shape = shape::build_shape(collider.as_ref(), transform.scale);
        let pose = convert::to_isometry(transform.position, transform.orientation());

        let body = if descriptor.is_dynamic() {
            RigidBodyBuilder::dynamic()
        } else {
            RigidBodyBuilder::fixed()
        }
        .pose(pose)
        .build();
        let raw = sim.bodies.insert(body);

        let mut builder = ColliderBuilder::new(shape);
        if descriptor.is_dynamic() {
            builder = builder.mass(descriptor.mass);
        }
        sim.colliders
            .insert_with_parent(builder.build(), raw, &mut sim.bodies);
        sim.queries_stale = true;

        let handle = BodyHandle::new(raw, sim.epoch);
        self.table.insert(entity, handle, MotionState::at_rest(pose));

        log::debug!(
            "Added {} body for {:?} (mass {}, collider {:?})",
            if descriptor.is_dynamic() { "dynamic" } else { "static" },
            entity,
            descriptor.mass,
            collider
        );
        Some(handle)
    }

    /// Remove a body and its shape; unknown handles are ignored
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        let Some(sim) = self.sim.as_mut() else {
            return false;
        };

        let destroyed = sim.destroy_body(handle);
        let unlinked = self.table.remove(handle).is_some();
        if let Some(raw) = sim.resolve(handle) {
            self.pending_forces.retain(|h| *h != raw);
        }
        destroyed || unlinked
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// With a fixed step the time is accumulated and whole steps are run, at
    /// most `max_substeps` of them; excess time is dropped. With
    /// `max_substeps == 0` one step of exactly `dt` is taken. User forces are
    /// cleared once at least one step has consumed them. Returns the number of
    /// steps taken.
    pub fn step(&mut self, dt: f32) -> u32 {
        let Some(sim) = self.sim.as_mut() else {
            return 0;
        };

        let (steps, step_dt) = if self.config.max_substeps == 0 {
            (u32::from(dt > 0.0), dt)
        } else {
            (
                self.accumulator.advance(dt as f64),
                self.config.fixed_timestep,
            )
        };

        for _ in 0..steps {
            sim.step_once(step_dt);
            for entry in self.table.iter_mut() {
                if let Some(body) = sim.body(entry.handle) {
                    entry.motion = MotionState::capture(body);
                }
            }
        }

        if steps > 0 {
            for handle in self.pending_forces.drain(..) {
                if let Some(body) = sim.bodies.get_mut(handle) {
                    body.reset_forces(false);
                    body.reset_torques(false);
                }
            }
            self.step_count += steps as u64;
        }

        steps
    }

    /// Write every body's pose into its entity's transform
    ///
    /// The pose is the one reached by the last completed step; time still
    /// waiting in the accumulator is not applied. Position and rotation are
    /// written and scale is never touched. Entities without a transform are
    /// skipped. Returns the number of transforms written.
    pub fn sync_transforms(&self, scene: &mut Scene) -> usize {
        if self.sim.is_none() {
            return 0;
        }

        let mut written = 0;
        for entry in self.table.iter() {
            let Some(transform) = scene.transform_mut(entry.entity) else {
                continue;
            };

            let pose = &entry.motion.pose;
            transform.position = convert::from_vector(&pose.translation.vector);
            transform.rotation =
                math::euler_degrees_from_quat(convert::from_rotation(&pose.rotation));
            written += 1;
        }
        written
    }

    /// Accumulate a force at a world-space point, waking the body
    pub fn apply_force(&mut self, handle: BodyHandle, force: Vec3, point: Vec3) {
        let Some(body) = self.sim.as_mut().and_then(|sim| sim.body_mut(handle)) else {
            return;
        };
        body.wake_up(true);
        body.add_force_at_point(convert::to_vector(force), convert::to_point(point), true);
        self.pending_forces.push(handle.raw());
    }

    /// Apply an instantaneous impulse at a world-space point, waking the body
    pub fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3, point: Vec3) {
        if let Some(body) = self.sim.as_mut().and_then(|sim| sim.body_mut(handle)) {
            body.wake_up(true);
            body.apply_impulse_at_point(
                convert::to_vector(impulse),
                convert::to_point(point),
                true,
            );
        }
    }

    pub fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec3) {
        if let Some(body) = self.sim.as_mut().and_then(|sim| sim.body_mut(handle)) {
            body.set_linvel(convert::to_vector(velocity), true);
        }
    }

    /// Current linear velocity; zero for unknown bodies
    pub fn linear_velocity(&self, handle: BodyHandle) -> Vec3 {
        self.sim
            .as_ref()
            .and_then(|sim| sim.body(handle))
            .map(|body| convert::from_vector(body.linvel()))
            .unwrap_or(Vec3::ZERO)
    }

    /// Allow or block rotation per axis; a zero component locks that axis
    pub fn set_angular_factor(&mut self, handle: BodyHandle, factor: Vec3) {
        if let Some(body) = self.sim.as_mut().and_then(|sim| sim.body_mut(handle)) {
            body.set_enabled_rotations(
                factor.x != 0.0,
                factor.y != 0.0,
                factor.z != 0.0,
                true,
            );
        }
    }

    /// Replace the orientation (Euler degrees), keeping the position
    pub fn set_rotation(&mut self, handle: BodyHandle, degrees: Vec3) {
        let Some(body) = self.sim.as_mut().and_then(|sim| sim.body_mut(handle)) else {
            return;
        };

        let rotation = convert::to_rotation(math::quat_from_euler_degrees(degrees));
        body.set_rotation(rotation, true);
        if let Some(entry) = self.table.get_mut(handle) {
            entry.motion.pose.rotation = rotation;
        }
    }

    /// Current world-space position of a body
    pub fn position(&self, handle: BodyHandle) -> Option<Vec3> {
        let body = self.sim.as_ref()?.body(handle)?;
        Some(convert::from_vector(&body.position().translation.vector))
    }

    pub fn is_sleeping(&self, handle: BodyHandle) -> bool {
        self.sim
            .as_ref()
            .and_then(|sim| sim.body(handle))
            .is_some_and(|body| body.is_sleeping())
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.table.contains(handle)
    }

    pub fn entity_of(&self, handle: BodyHandle) -> Option<Entity> {
        self.table.entity_of(handle)
    }

    pub fn body_of(&self, entity: Entity) -> Option<BodyHandle> {
        self.table.body_of(entity)
    }

    pub fn body_count(&self) -> usize {
        self.table.len()
    }

    /// Fixed steps completed since creation
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn debug_draw(&self) -> &DebugDrawCollector {
        &self.debug_draw
    }

    pub fn debug_draw_mut(&mut self) -> &mut DebugDrawCollector {
        &mut self.debug_draw
    }

    /// Render collider wireframes into the collector and flush them
    ///
    /// Returns the number of lines drawn.
    pub fn render_debug(
        &mut self,
        camera: &CameraMatrices,
        renderer: &mut dyn LineRenderer,
    ) -> usize {
        let Some(sim) = self.sim.as_mut() else {
            return 0;
        };

        if self.debug_draw.is_enabled() {
            sim.debug_pipeline.render(
                &mut self.debug_draw,
                &sim.bodies,
                &sim.colliders,
                &sim.impulse_joints,
                &sim.multibody_joints,
                &sim.narrow_phase,
            );
        }
        self.debug_draw.flush(camera, renderer)
    }

    #[cfg(test)]
    pub(crate) fn body_mut_for_test(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.sim.as_mut()?.body_mut(handle)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_core::TransformComponent;

    const DT: f32 = 1.0 / 60.0;

    fn initialized_world() -> PhysicsWorld {
        let mut world = PhysicsWorld::default();
        world.initialize();
        world
    }

    fn spawn_floor(scene: &mut Scene, world: &mut PhysicsWorld) -> BodyHandle {
        let floor = scene.create_entity("Floor");
        *scene.transform_mut(floor).unwrap() =
            TransformComponent::from_position(Vec3::new(0.0, -1.0, 0.0))
                .with_scale(Vec3::new(50.0, 2.0, 50.0));
        world
            .add_body(scene, floor, &RigidbodyDescriptor::fixed())
            .unwrap()
    }

    fn spawn_at(
        scene: &mut Scene,
        world: &mut PhysicsWorld,
        name: &str,
        position: Vec3,
        mass: f32,
    ) -> (Entity, BodyHandle) {
        let entity = scene.create_entity(name);
        scene.transform_mut(entity).unwrap().position = position;
        let handle = world
            .add_body(scene, entity, &RigidbodyDescriptor::dynamic(mass))
            .unwrap();
        (entity, handle)
    }

    #[test]
    fn test_uninitialized_world_is_inert() {
        let mut scene = Scene::new("Test");
        let entity = scene.create_entity("Cube");
        let mut world = PhysicsWorld::default();

        assert!(
            world
                .add_body(&scene, entity, &RigidbodyDescriptor::default())
                .is_none()
        );
        assert_eq!(world.step(1.0), 0);
        assert_eq!(world.sync_transforms(&mut scene), 0);
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_add_and_remove_body() {
        let mut scene = Scene::new("Test");
        let mut world = initialized_world();
        let (entity, handle) =
            spawn_at(&mut scene, &mut world, "Cube", Vec3::new(0.0, 10.0, 0.0), 1.0);

        assert_eq!(world.entity_of(handle), Some(entity));
        assert_eq!(world.body_of(entity), Some(handle));
        assert_eq!(world.position(handle), Some(Vec3::new(0.0, 10.0, 0.0)));

        assert!(world.remove_body(handle));
        assert!(!world.contains(handle));
        assert!(world.position(handle).is_none());
        assert!(!world.remove_body(handle));
    }

    #[test]
    fn test_entity_without_transform_gets_no_body() {
        let mut scene = Scene::new("Test");
        let entity = scene.create_entity("Ghost");
        scene.remove_component::<TransformComponent>(entity);

        let mut world = initialized_world();
        assert!(
            world
                .add_body(&scene, entity, &RigidbodyDescriptor::default())
                .is_none()
        );
    }

    #[test]
    fn test_substeps_are_bounded() {
        let mut world = initialized_world();
        assert_eq!(world.step(DT), 1);
        assert_eq!(world.step(1.0), 10);
        assert_eq!(world.step_count(), 11);

        let mut variable = PhysicsWorld::new(PhysicsConfig::default().with_max_substeps(0));
        variable.initialize();
        assert_eq!(variable.step(0.005), 1);
        assert_eq!(variable.step(0.0), 0);
    }

    #[test]
    fn test_static_body_ignores_forces() {
        let mut scene = Scene::new("Test");
        let mut world = initialized_world();
        let floor = spawn_floor(&mut scene, &mut world);

        world.apply_force(floor, Vec3::new(0.0, 1000.0, 0.0), Vec3::ZERO);
        world.apply_impulse(floor, Vec3::new(0.0, 1000.0, 0.0), Vec3::ZERO);
        for _ in 0..10 {
            world.step(DT);
        }

        assert_eq!(world.position(floor), Some(Vec3::new(0.0, -1.0, 0.0)));
        assert_eq!(world.linear_velocity(floor), Vec3::ZERO);
    }

    #[test]
    fn test_force_wakes_sleeping_body() {
        let mut scene = Scene::new("Test");
        let mut world = PhysicsWorld::new(PhysicsConfig::default().with_gravity(Vec3::ZERO));
        world.initialize();
        let (_, handle) = spawn_at(&mut scene, &mut world, "Crate", Vec3::ZERO, 1.0);

        world.step(DT);
        world.body_mut_for_test(handle).unwrap().sleep();
        assert!(world.is_sleeping(handle));

        world.apply_force(handle, Vec3::new(60.0, 0.0, 0.0), Vec3::ZERO);
        world.step(DT);

        assert!(!world.is_sleeping(handle));
        assert!(world.linear_velocity(handle).x > 0.0);
    }

    #[test]
    fn test_forces_are_cleared_after_step() {
        let mut scene = Scene::new("Test");
        let mut world = PhysicsWorld::new(PhysicsConfig::default().with_gravity(Vec3::ZERO));
        world.initialize();
        let (_, handle) = spawn_at(&mut scene, &mut world, "Crate", Vec3::ZERO, 1.0);

        world.apply_force(handle, Vec3::new(60.0, 0.0, 0.0), Vec3::ZERO);
        world.step(DT);
        let after_push = world.linear_velocity(handle).x;
        assert!(after_push > 0.0);

        world.step(DT);
        assert!((world.linear_velocity(handle).x - after_push).abs() < 1.0e-4);
    }

    #[test]
    fn test_velocity_round_trip() {
        let mut scene = Scene::new("Test");
        let mut world = initialized_world();
        let (_, handle) =
            spawn_at(&mut scene, &mut world, "Ball", Vec3::new(0.0, 5.0, 0.0), 1.0);

        world.set_linear_velocity(handle, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(world.linear_velocity(handle), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_sync_is_idempotent_and_keeps_scale() {
        let mut scene = Scene::new("Test");
        let mut world = initialized_world();
        let (entity, handle) =
            spawn_at(&mut scene, &mut world, "Cube", Vec3::new(0.0, 10.0, 0.0), 1.0);
        scene.transform_mut(entity).unwrap().scale = Vec3::splat(3.0);
        world.set_rotation(handle, Vec3::new(0.0, 45.0, 0.0));

        for _ in 0..5 {
            world.step(DT);
        }
        world.step(DT * 0.5);

        assert_eq!(world.sync_transforms(&mut scene), 1);
        let first = scene.transform(entity).unwrap();
        assert_eq!(world.sync_transforms(&mut scene), 1);
        let second = scene.transform(entity).unwrap();

        assert_eq!(first, second);
        assert_eq!(second.scale, Vec3::splat(3.0));
        assert!(second.position.y < 10.0);
        assert!((second.rotation.y - 45.0).abs() < 0.01);
    }

    #[test]
    fn test_sync_writes_last_completed_step() {
        let mut scene = Scene::new("Test");
        let mut world = initialized_world();
        let (entity, handle) =
            spawn_at(&mut scene, &mut world, "Cube", Vec3::new(0.0, 10.0, 0.0), 1.0);

        for _ in 0..30 {
            world.step(DT);
        }
        // Leaves a partial step in the accumulator
        world.step(DT * 0.9);
        world.sync_transforms(&mut scene);

        let synced = scene.transform(entity).unwrap().position;
        assert_eq!(Some(synced), world.position(handle));
        assert!(synced.y < 10.0);
    }

    #[test]
    fn test_set_rotation_is_visible_before_next_step() {
        let mut scene = Scene::new("Test");
        let mut world = initialized_world();
        let (entity, handle) =
            spawn_at(&mut scene, &mut world, "Player", Vec3::new(0.0, 2.0, 0.0), 10.0);

        world.set_rotation(handle, Vec3::new(0.0, -60.0, 0.0));
        world.sync_transforms(&mut scene);

        let t = scene.transform(entity).unwrap();
        assert!((t.rotation.y + 60.0).abs() < 0.01);
        assert_eq!(t.position, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_locked_axes_stay_upright() {
        let mut scene = Scene::new("Test");
        let mut world = initialized_world();
        let (_, handle) =
            spawn_at(&mut scene, &mut world, "Player", Vec3::new(0.0, 5.0, 0.0), 10.0);

        world.set_angular_factor(handle, Vec3::new(0.0, 1.0, 0.0));
        world.apply_force(handle, Vec3::new(100.0, 0.0, 0.0), Vec3::new(0.0, 6.0, 0.0));
        for _ in 0..30 {
            world.step(DT);
        }

        let body = world.body_mut_for_test(handle).unwrap();
        assert!(body.angvel().x.abs() < 1.0e-4);
        assert!(body.angvel().z.abs() < 1.0e-4);
    }

    #[test]
    fn test_box_settles_on_floor() {
        let mut scene = Scene::new("Test");
        let mut world = initialized_world();
        spawn_floor(&mut scene, &mut world);

        let cube = scene.create_entity("Cube");
        scene.transform_mut(cube).unwrap().position = Vec3::new(0.0, 5.0, 0.0);
        scene.add_component(cube, ColliderDescriptor::cuboid(Vec3::splat(2.0)));
        world.add_body(&scene, cube, &RigidbodyDescriptor::default()).unwrap();

        for _ in 0..300 {
            world.step(DT);
        }
        world.sync_transforms(&mut scene);

        let y = scene.transform(cube).unwrap().position.y;
        assert!((y - 1.0).abs() < 0.05, "box rests at {y}");
    }

    #[test]
    fn test_impulse_lifts_grounded_player() {
        let mut scene = Scene::new("Test");
        let mut world = initialized_world();
        spawn_floor(&mut scene, &mut world);
        let (player, handle) =
            spawn_at(&mut scene, &mut world, "Player", Vec3::new(0.0, 0.5, 0.0), 10.0);

        for _ in 0..120 {
            world.step(DT);
        }
        world.sync_transforms(&mut scene);
        let grounded = scene.transform(player).unwrap().position.y;

        world.apply_impulse(
            handle,
            Vec3::new(0.0, 100.0, 0.0),
            Vec3::new(0.0, grounded, 0.0),
        );
        world.step(DT);
        world.sync_transforms(&mut scene);

        assert!(world.linear_velocity(handle).y > 0.0);
        assert!(scene.transform(player).unwrap().position.y > grounded);
    }

    #[test]
    fn test_shutdown_removes_everything() {
        let mut scene = Scene::new("Test");
        let mut world = initialized_world();
        spawn_floor(&mut scene, &mut world);
        let (_, handle) =
            spawn_at(&mut scene, &mut world, "Cube", Vec3::new(0.0, 10.0, 0.0), 1.0);

        world.shutdown();
        assert!(!world.is_initialized());
        assert_eq!(world.body_count(), 0);
        assert!(world.position(handle).is_none());

        // Shutting down twice is harmless
        world.shutdown();
    }

    #[test]
    fn test_second_body_for_entity_replaces_first() {
        let mut scene = Scene::new("Test");
        let mut world = initialized_world();
        let (entity, first) =
            spawn_at(&mut scene, &mut world, "Cube", Vec3::new(0.0, 10.0, 0.0), 1.0);

        let second = world
            .add_body(&scene, entity, &RigidbodyDescriptor::dynamic(4.0))
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.body_of(entity), Some(second));
        assert!(!world.contains(first));
        assert!(world.position(first).is_none());
    }

    #[test]
    fn test_handles_do_not_survive_reinitialize() {
        let mut scene = Scene::new("Test");
        let mut world = initialized_world();
        let (_, stale) = spawn_at(&mut scene, &mut world, "A", Vec3::ZERO, 1.0);

        world.shutdown();
        world.initialize();
        let (b, fresh) = spawn_at(&mut scene, &mut world, "B", Vec3::new(7.0, 0.0, 0.0), 1.0);
        assert_eq!(fresh.raw(), stale.raw());

        world.set_linear_velocity(stale, Vec3::new(0.0, 5.0, 0.0));
        world.apply_impulse(stale, Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO);
        world.set_rotation(stale, Vec3::new(0.0, 90.0, 0.0));
        assert_eq!(world.entity_of(stale), None);
        assert_eq!(world.position(stale), None);
        assert_eq!(world.linear_velocity(stale), Vec3::ZERO);
        assert!(!world.remove_body(stale));

        assert_eq!(world.entity_of(fresh), Some(b));
        assert_eq!(world.linear_velocity(fresh), Vec3::ZERO);
        assert_eq!(world.position(fresh), Some(Vec3::new(7.0, 0.0, 0.0)));
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn test_render_debug_flushes_collider_lines() {
        use crate::debug_draw::DebugVertex;
        use glam::Mat4;

        struct Counter(usize);
        impl LineRenderer for Counter {
            fn draw_lines(&mut self, vertices: &[DebugVertex], _view_projection: Mat4) {
                self.0 += vertices.len() / 2;
            }
        }

        let mut scene = Scene::new("Test");
        let mut world = initialized_world();
        spawn_floor(&mut scene, &mut world);
        world.step(DT);

        let mut counter = Counter(0);
        let drawn = world.render_debug(&CameraMatrices::default(), &mut counter);
        assert!(drawn > 0);
        assert_eq!(counter.0, drawn);
        assert_eq!(world.debug_draw().line_count(), 0);
    }
}
