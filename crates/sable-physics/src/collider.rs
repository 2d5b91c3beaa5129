//! Collider descriptors
//!
//! A [`ColliderDescriptor`] is the component an entity carries to say what
//! shape its body should have. It is read once, when the body is created.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Collider shape attached to an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ColliderDescriptor {
    /// Box with full edge lengths `size`
    Box {
        size: Vec3,
        #[serde(default)]
        offset: Vec3,
    },
    Sphere {
        radius: f32,
        #[serde(default)]
        offset: Vec3,
    },
    /// Y-aligned capsule; `height` is the length of the cylindrical section
    Capsule {
        radius: f32,
        height: f32,
        #[serde(default)]
        offset: Vec3,
    },
}

impl ColliderDescriptor {
    pub fn cuboid(size: Vec3) -> Self {
        Self::Box {
            size,
            offset: Vec3::ZERO,
        }
    }

    pub fn sphere(radius: f32) -> Self {
        Self::Sphere {
            radius,
            offset: Vec3::ZERO,
        }
    }

    pub fn capsule(radius: f32, height: f32) -> Self {
        Self::Capsule {
            radius,
            height,
            offset: Vec3::ZERO,
        }
    }

    /// Replace the local offset of the shape relative to the body origin
    pub fn with_offset(mut self, new_offset: Vec3) -> Self {
        match &mut self {
            Self::Box { offset, .. }
            | Self::Sphere { offset, .. }
            | Self::Capsule { offset, .. } => {
                *offset = new_offset;
            }
        }
        self
    }

    /// Local offset of the shape relative to the body origin
    pub fn offset(&self) -> Vec3 {
        match *self {
            Self::Box { offset, .. }
            | Self::Sphere { offset, .. }
            | Self::Capsule { offset, .. } => offset,
        }
    }
}
