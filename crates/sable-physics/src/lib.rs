//! # Sable Physics
//!
//! Rigid-body physics for the Sable engine.
//!
//! ## Features
//! - A dynamics world stepped on a dedicated simulation thread
//! - Box, sphere and capsule colliders with optional local offsets
//! - A per-entity rigidbody facade (forces, impulses, velocity, rotation)
//! - Transform synchronization back into the scene
//! - Raycasts with self-exclusion
//! - Debug line collection for wireframe overlays
//!
//! The world is shared between the simulation thread and the main thread
//! behind a single mutex ([`SharedWorld`]). Every public operation that
//! touches the dynamics state takes that lock for its whole duration.

mod body;
mod collider;
mod config;
mod convert;
mod debug_draw;
mod raycast;
mod rigidbody;
mod shape;
mod system;
mod thread;
mod world;

use thiserror::Error;

pub use body::{BodyHandle, BodyTable};
pub use collider::ColliderDescriptor;
pub use config::PhysicsConfig;
pub use debug_draw::{CameraMatrices, DebugDrawCollector, DebugLine, DebugVertex, LineRenderer};
pub use raycast::RaycastHit;
pub use rigidbody::{RigidbodyComponent, RigidbodyDescriptor};
pub use shape::build_shape;
pub use system::{PhysicsSystem, SharedWorld};
pub use thread::SimulationThread;
pub use world::PhysicsWorld;

/// Physics errors
#[derive(Error, Debug)]
pub enum PhysicsError {
    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),

    #[error("Simulation thread is already running")]
    AlreadyRunning,

    #[error("Failed to spawn simulation thread: {0}")]
    ThreadSpawn(#[from] std::io::Error),
}

/// Result type for physics operations
pub type PhysicsResult<T> = Result<T, PhysicsError>;
