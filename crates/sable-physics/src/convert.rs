//! Conversions between the engine's glam types and the solver's nalgebra types

use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::{Isometry, Point, Real, Vector};

pub(crate) fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

pub(crate) fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

pub(crate) fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub(crate) fn from_point(p: &Point<Real>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

pub(crate) fn to_rotation(q: Quat) -> UnitQuaternion<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

pub(crate) fn from_rotation(r: &UnitQuaternion<Real>) -> Quat {
    Quat::from_xyzw(r.i, r.j, r.k, r.w)
}

pub(crate) fn to_isometry(position: Vec3, rotation: Quat) -> Isometry<Real> {
    Isometry::from_parts(
        Translation3::new(position.x, position.y, position.z),
        to_rotation(rotation),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_conversion_preserves_action() {
        let q = Quat::from_rotation_y(0.7) * Quat::from_rotation_x(-0.3);
        let r = to_rotation(q);

        let v = Vec3::new(1.0, 2.0, 3.0);
        let rotated = from_vector(&(r * to_vector(v)));
        assert!((rotated - q * v).length() < 1.0e-5);
        assert!(from_rotation(&r).dot(q).abs() > 0.99999);
    }

    #[test]
    fn test_isometry_translation() {
        let iso = to_isometry(Vec3::new(1.0, -2.0, 3.0), Quat::IDENTITY);
        assert_eq!(from_vector(&iso.translation.vector), Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(from_point(&(iso * Point::origin())), Vec3::new(1.0, -2.0, 3.0));
    }
}
