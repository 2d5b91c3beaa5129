//! Raycasts against the physics world

use glam::Vec3;
use rapier3d::prelude::{
    ColliderHandle, QueryFilter, Ray, RayCast, RayIntersection, RigidBodyHandle,
};
use sable_core::Entity;

use crate::body::BodyHandle;
use crate::convert;
use crate::world::{PhysicsWorld, Simulation};

/// Closest hit along a ray segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// World-space contact point
    pub point: Vec3,
    /// Surface normal at the contact point
    pub normal: Vec3,
    /// Position along the segment, `0` at the start and `1` at the end
    pub fraction: f32,
    /// Body that was hit
    pub body: BodyHandle,
    /// Entity owning that body, if it is still registered
    pub entity: Option<Entity>,
}

impl PhysicsWorld {
    /// Cast a segment from `start` to `end` and return the closest hit
    ///
    /// Colliders of `ignored` are skipped. Bodies are visible as soon as
    /// `add_body` returns, before any step has run.
    pub fn raycast(
        &self,
        start: Vec3,
        end: Vec3,
        ignored: Option<BodyHandle>,
    ) -> Option<RaycastHit> {
        let sim = self.sim.as_ref()?;

        let direction = end - start;
        if direction.length_squared() <= f32::EPSILON {
            return None;
        }

        let ignored = ignored.and_then(|handle| sim.resolve(handle));
        let ray = Ray::new(convert::to_point(start), convert::to_vector(direction));
        let (collider, intersection) = if sim.queries_stale {
            cast_each_collider(sim, &ray, ignored)?
        } else {
            let mut filter = QueryFilter::default();
            if let Some(ignored) = ignored {
                filter = filter.exclude_rigid_body(ignored);
            }
            let query = sim.broad_phase.as_query_pipeline(
                sim.narrow_phase.query_dispatcher(),
                &sim.bodies,
                &sim.colliders,
                filter,
            );
            query.cast_ray_and_get_normal(&ray, 1.0, true)?
        };

        let body = BodyHandle::new(sim.colliders.get(collider)?.parent()?, sim.epoch);
        Some(RaycastHit {
            point: convert::from_point(&ray.point_at(intersection.time_of_impact)),
            normal: convert::from_vector(&intersection.normal),
            fraction: intersection.time_of_impact,
            body,
            entity: self.table.entity_of(body),
        })
    }
}

/// Test every collider directly
///
/// Used between a body insertion or removal and the next step, while the
/// broad phase still describes the previous set of colliders.
fn cast_each_collider(
    sim: &Simulation,
    ray: &Ray,
    ignored: Option<RigidBodyHandle>,
) -> Option<(ColliderHandle, RayIntersection)> {
    sim.colliders
        .iter()
        .filter(|(_, collider)| ignored.is_none() || collider.parent() != ignored)
        .filter_map(|(handle, collider)| {
            collider
                .shape()
                .cast_ray_and_get_normal(collider.position(), ray, 1.0, true)
                .map(|hit| (handle, hit))
        })
        .min_by(|(_, a), (_, b)| a.time_of_impact.total_cmp(&b.time_of_impact))
}
