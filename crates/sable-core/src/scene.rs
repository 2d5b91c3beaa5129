//! Scene
//!
//! Entity storage for gameplay and the physics core:
//! - Transform records with Euler rotations in degrees
//! - Human-readable entity names
//! - A thin wrapper over a `hecs` world so systems share one entity space

use glam::{Mat4, Quat, Vec3};
use hecs::{Component, Entity, World};
use serde::{Deserialize, Serialize};

use crate::math;

/// Transform component for entities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformComponent {
    /// World position
    pub position: Vec3,
    /// Euler angles in degrees `(pitch, yaw, roll)`
    pub rotation: Vec3,
    /// Per-axis scale, expected to be non-negative
    pub scale: Vec3,
}

impl TransformComponent {
    /// Identity transform
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    /// Create a new transform with the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Replace the position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Replace the rotation (degrees)
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Replace the scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Orientation described by the Euler rotation
    pub fn orientation(&self) -> Quat {
        math::quat_from_euler_degrees(self.rotation)
    }

    /// Get the local transformation matrix
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation(), self.position)
    }

    /// Get the forward direction (negative Z in local space)
    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    /// Get the right direction (positive X in local space)
    pub fn right(&self) -> Vec3 {
        self.orientation() * Vec3::X
    }

    /// Get the up direction (positive Y in local space)
    pub fn up(&self) -> Vec3 {
        self.orientation() * Vec3::Y
    }

    /// Translate the transform
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Rotate the transform by Euler angles in degrees
    pub fn rotate(&mut self, degrees: Vec3) {
        self.rotation += degrees;
    }
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Human-readable entity name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NameComponent(pub String);

impl NameComponent {
    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A named collection of entities
pub struct Scene {
    name: String,
    world: World,
}

impl Scene {
    /// Create a new empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            world: World::new(),
        }
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Spawn an entity carrying a name and an identity transform
    pub fn create_entity(&mut self, name: impl Into<String>) -> Entity {
        let name = name.into();
        log::debug!("Scene '{}': creating entity '{}'", self.name, name);
        self.world
            .spawn((NameComponent(name), TransformComponent::IDENTITY))
    }

    /// Despawn an entity and all of its components
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        self.world.despawn(entity).is_ok()
    }

    /// Check if an entity is alive
    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.world.len() as usize
    }

    /// Attach (or replace) a component
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> bool {
        self.world.insert_one(entity, component).is_ok()
    }

    /// Detach a component, returning it
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.world.remove_one::<T>(entity).ok()
    }

    /// Check if an entity has a component
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.world
            .entity(entity)
            .is_ok_and(|entity_ref| entity_ref.has::<T>())
    }

    /// Copy a component out of an entity
    pub fn get<T: Component + Clone>(&self, entity: Entity) -> Option<T> {
        self.world.get::<&T>(entity).ok().map(|c| (*c).clone())
    }

    /// Borrow a component mutably
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.world.query_one_mut::<&mut T>(entity).ok()
    }

    /// Current transform of an entity
    pub fn transform(&self, entity: Entity) -> Option<TransformComponent> {
        self.get::<TransformComponent>(entity)
    }

    /// Mutable transform of an entity
    pub fn transform_mut(&mut self, entity: Entity) -> Option<&mut TransformComponent> {
        self.get_mut::<TransformComponent>(entity)
    }

    /// Entity name, if it has one
    pub fn entity_name(&self, entity: Entity) -> Option<String> {
        self.get::<NameComponent>(entity).map(|n| n.0)
    }

    /// Find the first entity with a given name
    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.world
            .query::<&NameComponent>()
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(entity, _)| entity)
    }

    /// Underlying ECS world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the underlying ECS world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
