//! Rigidbody Component
//!
//! The per-entity facade gameplay code uses to drive a body. Each call locks
//! the shared world for its duration, so it is safe to use from the main
//! thread while the simulation thread is stepping.

use std::fmt;

use glam::Vec3;
use sable_core::{Entity, Scene};
use serde::{Deserialize, Serialize};

use crate::body::BodyHandle;
use crate::system::SharedWorld;

/// Authoring data for a rigid body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigidbodyDescriptor {
    /// Zero (or negative) creates a static body; positive creates a dynamic one
    pub mass: f32,
    /// Recorded for authoring tools; the world applies its gravity uniformly
    pub gravity_scale: f32,
}

impl Default for RigidbodyDescriptor {
    fn default() -> Self {
        Self {
            mass: 1.0,
            gravity_scale: 1.0,
        }
    }
}

impl RigidbodyDescriptor {
    /// Immovable body
    pub fn fixed() -> Self {
        Self {
            mass: 0.0,
            ..Self::default()
        }
    }

    /// Body driven by forces with the given mass
    pub fn dynamic(mass: f32) -> Self {
        Self {
            mass,
            ..Self::default()
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.mass > 0.0
    }
}

/// Rigidbody attached to an entity
///
/// Without a body (never attached, or detached) every operation is a no-op
/// and queries return zero.
pub struct RigidbodyComponent {
    descriptor: RigidbodyDescriptor,
    body: Option<BodyHandle>,
    world: SharedWorld,
}

impl RigidbodyComponent {
    /// Create a body for `entity` from its current transform and collider
    ///
    /// A body the entity already owns is replaced.
    pub fn attach(
        world: &SharedWorld,
        scene: &Scene,
        entity: Entity,
        descriptor: RigidbodyDescriptor,
    ) -> Self {
        let body = world.lock().add_body(scene, entity, &descriptor);
        if body.is_none() {
            log::debug!("Rigidbody for {:?} has no body", entity);
        }

        Self {
            descriptor,
            body,
            world: world.clone(),
        }
    }

    /// Remove the body from the world; later calls become no-ops
    pub fn detach(&mut self) -> bool {
        match self.body.take() {
            Some(handle) => self.world.lock().remove_body(handle),
            None => false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.body.is_some()
    }

    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    pub fn descriptor(&self) -> &RigidbodyDescriptor {
        &self.descriptor
    }

    /// Push the body with a force at a world-space point
    pub fn add_force(&self, force: Vec3, point: Vec3) {
        if let Some(handle) = self.body {
            self.world.lock().apply_force(handle, force, point);
        }
    }

    /// Kick the body with an impulse at a world-space point
    pub fn add_impulse(&self, impulse: Vec3, point: Vec3) {
        if let Some(handle) = self.body {
            self.world.lock().apply_impulse(handle, impulse, point);
        }
    }

    pub fn set_linear_velocity(&self, velocity: Vec3) {
        if let Some(handle) = self.body {
            self.world.lock().set_linear_velocity(handle, velocity);
        }
    }

    pub fn linear_velocity(&self) -> Vec3 {
        match self.body {
            Some(handle) => self.world.lock().linear_velocity(handle),
            None => Vec3::ZERO,
        }
    }

    /// Per-axis rotation response; zero locks an axis
    pub fn set_angular_factor(&self, factor: Vec3) {
        if let Some(handle) = self.body {
            self.world.lock().set_angular_factor(handle, factor);
        }
    }

    /// Set the orientation from Euler angles in degrees
    pub fn set_rotation(&self, degrees: Vec3) {
        if let Some(handle) = self.body {
            self.world.lock().set_rotation(handle, degrees);
        }
    }

    pub fn position(&self) -> Option<Vec3> {
        let handle = self.body?;
        self.world.lock().position(handle)
    }
}

impl fmt::Debug for RigidbodyComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RigidbodyComponent")
            .field("descriptor", &self.descriptor)
            .field("body", &self.body)
            .finish()
    }
}
