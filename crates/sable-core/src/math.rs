//! Math utilities
//!
//! Re-exports from glam plus the Euler-angle conventions shared by the scene
//! and the physics core.
//!
//! Rotations are authored as Euler angles in degrees `(pitch, yaw, roll)`
//! about `(X, Y, Z)`. The orientation they describe is `Rz(roll) * Ry(yaw) *
//! Rx(pitch)`, and [`euler_degrees_from_quat`] is the exact inverse of
//! [`quat_from_euler_degrees`] away from the yaw = +-90 degree singularity.

pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

/// Tolerance used when a decomposition term degenerates
const DECOMPOSE_EPSILON: f32 = 1.0e-6;

/// Build an orientation from Euler angles in degrees `(pitch, yaw, roll)`
pub fn quat_from_euler_degrees(degrees: Vec3) -> Quat {
    let radians = Vec3::new(
        degrees.x.to_radians(),
        degrees.y.to_radians(),
        degrees.z.to_radians(),
    );
    Quat::from_euler(EulerRot::ZYX, radians.z, radians.y, radians.x)
}

/// Pitch (rotation about X) of an orientation, in radians
pub fn pitch(q: Quat) -> f32 {
    let y = 2.0 * (q.y * q.z + q.w * q.x);
    let x = q.w * q.w - q.x * q.x - q.y * q.y + q.z * q.z;

    // Gimbal lock: fall back to the half-angle form instead of atan2(0, 0)
    if x.abs() < DECOMPOSE_EPSILON && y.abs() < DECOMPOSE_EPSILON {
        return 2.0 * q.x.atan2(q.w);
    }

    y.atan2(x)
}

/// Yaw (rotation about Y) of an orientation, in radians
pub fn yaw(q: Quat) -> f32 {
    (-2.0 * (q.x * q.z - q.w * q.y)).clamp(-1.0, 1.0).asin()
}

/// Roll (rotation about Z) of an orientation, in radians
pub fn roll(q: Quat) -> f32 {
    let y = 2.0 * (q.x * q.y + q.w * q.z);
    let x = q.w * q.w + q.x * q.x - q.y * q.y - q.z * q.z;

    if x.abs() < DECOMPOSE_EPSILON && y.abs() < DECOMPOSE_EPSILON {
        return 0.0;
    }

    y.atan2(x)
}

/// Decompose an orientation into Euler angles in degrees `(pitch, yaw, roll)`
///
/// The quaternion is normalized first so slightly drifted simulation output
/// decomposes cleanly.
pub fn euler_degrees_from_quat(q: Quat) -> Vec3 {
    let q = q.normalize();
    Vec3::new(
        pitch(q).to_degrees(),
        yaw(q).to_degrees(),
        roll(q).to_degrees(),
    )
}

/// Wrap an angle in degrees into `[-180, 180]`
pub fn normalize_angle(degrees: f32) -> f32 {
    let mut angle = degrees % 360.0;
    if angle > 180.0 {
        angle -= 360.0;
    } else if angle < -180.0 {
        angle += 360.0;
    }
    angle
}

/// Interpolate between two yaw angles (degrees) along the shortest arc
pub fn interpolate_yaw(current: f32, target: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let current = normalize_angle(current);
    let diff = normalize_angle(normalize_angle(target) - current);
    current + diff * t
}

/// Yaw in degrees that faces along a planar direction, with -Z as forward
pub fn yaw_from_direction(x: f32, z: f32) -> f32 {
    (-x).atan2(-z).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec3_near(a: Vec3, b: Vec3, eps: f32) {
        assert!((a - b).abs().max_element() < eps, "{a:?} != {b:?}");
    }

    #[test]
    fn test_euler_round_trip() {
        let euler = Vec3::new(30.0, -45.0, 60.0);
        let q = quat_from_euler_degrees(euler);
        assert_vec3_near(euler_degrees_from_quat(q), euler, 1.0e-3);
    }

    #[test]
    fn test_single_axis_rotations() {
        let q = quat_from_euler_degrees(Vec3::new(0.0, 90.0, 0.0));
        let forward = q * Vec3::NEG_Z;
        assert_vec3_near(forward, Vec3::NEG_X, 1.0e-5);

        let q = quat_from_euler_degrees(Vec3::new(90.0, 0.0, 0.0));
        assert_vec3_near(q * Vec3::Y, Vec3::Z, 1.0e-5);
    }

    #[test]
    fn test_identity_decomposes_to_zero() {
        assert_vec3_near(euler_degrees_from_quat(Quat::IDENTITY), Vec3::ZERO, 1.0e-6);
    }

    #[test]
    fn test_decomposition_at_gimbal_lock() {
        let q = quat_from_euler_degrees(Vec3::new(0.0, 90.0, 0.0));
        let euler = euler_degrees_from_quat(q);
        assert!((euler.y - 90.0).abs() < 0.1);
        assert!(euler.x.is_finite() && euler.z.is_finite());

        // Whatever split is chosen, it must rebuild the same orientation
        let rebuilt = quat_from_euler_degrees(euler);
        assert!(rebuilt.dot(q).abs() > 0.999);
    }

    #[test]
    fn test_decomposition_normalizes_input() {
        let q = quat_from_euler_degrees(Vec3::new(10.0, 20.0, 30.0)) * 3.0;
        assert_vec3_near(euler_degrees_from_quat(q), Vec3::new(10.0, 20.0, 30.0), 1.0e-3);
    }

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(190.0), -170.0);
        assert_eq!(normalize_angle(-190.0), 170.0);
        assert_eq!(normalize_angle(720.0 + 45.0), 45.0);
    }

    #[test]
    fn test_interpolate_yaw_takes_short_path() {
        let yaw = interpolate_yaw(170.0, -170.0, 0.5);
        assert!((normalize_angle(yaw) - 180.0).abs() < 1.0e-3 || (yaw + 180.0).abs() < 1.0e-3);
    }

    #[test]
    fn test_yaw_from_direction() {
        assert!((yaw_from_direction(0.0, -1.0)).abs() < 1.0e-5);
        assert!((yaw_from_direction(-1.0, 0.0) - 90.0).abs() < 1.0e-4);
    }
}
