//! Collision shape construction
//!
//! Turns an entity's collider descriptor and transform scale into a solver
//! shape:
//! - Box: half extents are `size * 0.5 * scale`
//! - Sphere: radius scaled by the largest scale component
//! - Capsule: half height scaled by `scale.y`, radius by the larger of `scale.x` and `scale.z`
//! - No descriptor: a box with half extents `0.5 * scale`
//!
//! A non-zero offset wraps the shape in a single-child compound whose child
//! sits at `offset * scale` in body space.

use glam::Vec3;
use rapier3d::prelude::{Isometry, SharedShape};

use crate::collider::ColliderDescriptor;

/// Half extent of the box used when an entity has no collider descriptor
const DEFAULT_HALF_EXTENT: f32 = 0.5;

/// Build the collision shape for a body
pub fn build_shape(collider: Option<&ColliderDescriptor>, scale: Vec3) -> SharedShape {
    let scale = scale.abs();

    let (shape, offset) = match collider {
        Some(ColliderDescriptor::Box { size, offset }) => {
            let half = *size * 0.5 * scale;
            (SharedShape::cuboid(half.x, half.y, half.z), *offset)
        }
        Some(ColliderDescriptor::Sphere { radius, offset }) => {
            (SharedShape::ball(radius * scale.max_element()), *offset)
        }
        Some(ColliderDescriptor::Capsule {
            radius,
            height,
            offset,
        }) => {
            let half_height = height * 0.5 * scale.y;
            let radius = radius * scale.x.max(scale.z);
            (SharedShape::capsule_y(half_height, radius), *offset)
        }
        None => {
            let half = Vec3::splat(DEFAULT_HALF_EXTENT) * scale;
            (SharedShape::cuboid(half.x, half.y, half.z), Vec3::ZERO)
        }
    };

    if offset == Vec3::ZERO {
        return shape;
    }

    let local = offset * scale;
    SharedShape::compound(vec![(Isometry::translation(local.x, local.y, local.z), shape)])
}
