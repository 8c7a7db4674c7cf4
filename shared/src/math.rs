//! Ground-plane helpers shared by the movement controller and the camera rig.
//!
//! In Bevy: +X is right, +Y is up, -Z is forward. The arena floor is the XZ plane.

use bevy::prelude::*;

/// Distance between two points ignoring height
#[inline]
pub fn ground_distance(a: Vec3, b: Vec3) -> f32 {
    ground(a - b).length()
}

/// Project a vector onto the floor plane
#[inline]
pub fn ground(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Rotate a vector about +Y by `angle` radians
#[inline]
pub fn rotate_about_y(v: Vec3, angle: f32) -> Vec3 {
    Quat::from_rotation_y(angle) * v
}

/// Heading (radians about +Y) that faces along `v` on the floor plane.
/// Zero faces +Z.
#[inline]
pub fn heading_of(v: Vec3) -> f32 {
    v.x.atan2(v.z)
}

/// Step `from` toward `to` by at most `max_angle` radians
pub fn rotate_towards(from: Quat, to: Quat, max_angle: f32) -> Quat {
    let angle = from.angle_between(to);
    if angle <= max_angle || angle <= f32::EPSILON {
        return to;
    }
    from.slerp(to, max_angle / angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_ground_distance_ignores_height() {
        let a = Vec3::new(3.0, 10.0, 0.0);
        let b = Vec3::new(0.0, -4.0, 4.0);
        assert!((ground_distance(a, b) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_about_y_quarter_turn() {
        // +Z rotated a quarter turn about +Y lands on +X
        let v = rotate_about_y(Vec3::Z, FRAC_PI_2);
        assert!((v - Vec3::X).length() < 1e-5);
        assert!((heading_of(Vec3::X) - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_towards_is_rate_limited() {
        let from = Quat::IDENTITY;
        let to = Quat::from_rotation_y(PI * 0.5);
        let stepped = rotate_towards(from, to, 0.05);
        assert!((from.angle_between(stepped) - 0.05).abs() < 1e-4);

        // Close enough: snaps
        let near = Quat::from_rotation_y(0.01);
        assert_eq!(rotate_towards(from, near, 0.05), near);
    }
}
