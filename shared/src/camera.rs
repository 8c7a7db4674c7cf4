//! Distance-locked third-person camera rig.
//!
//! The rig follows the player by rigid translation, so orbit angle and distance survive
//! player movement untouched. The distance lock re-projects the camera onto the sphere of
//! radius `distance` around the target along its current direction; it runs whenever the
//! distance changes or the target jumps (boundary clamp).
//!
//! Orbit rotation comes from an `OrbitControl` collaborator. `PointerOrbit` is the
//! pointer-drag implementation used by the client.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::settings::{Settings, CAMERA_DISTANCE, CAMERA_FOV, RENDER_DISTANCE};
use crate::PLAYER_HEIGHT_OFFSET;

/// Initial camera height above the floor (camera starts behind the player, -Z side)
pub const INITIAL_CAMERA_HEIGHT: f32 = 2.5;

/// Distance change per scroll notch
pub const ZOOM_STEP: f32 = 1.0;

/// Orbit polar angle limits (radians from straight up). Keeps the camera above the floor.
pub const MIN_POLAR_ANGLE: f32 = 0.01;
pub const MAX_POLAR_ANGLE: f32 = FRAC_PI_2 - 0.05;

/// Near clip plane
pub const NEAR_PLANE: f32 = 0.1;

#[derive(Resource, Clone, Debug, PartialEq)]
pub struct CameraRig {
    pub position: Vec3,
    pub look_at: Vec3,
    distance: f32,
    /// Vertical field of view in degrees
    fov: f32,
    far_plane: f32,
}

impl CameraRig {
    /// Place the camera behind and above `target`, then lock it to the configured distance
    pub fn new(settings: &Settings, target: Vec3) -> Self {
        let distance = CAMERA_DISTANCE.clamp(settings.camera_distance);
        let mut rig = Self {
            position: target + Self::initial_offset(distance),
            look_at: target,
            distance,
            fov: CAMERA_FOV.clamp(settings.camera_fov),
            far_plane: RENDER_DISTANCE.clamp(settings.render_distance),
        };
        rig.recompute_distance_lock(target);
        rig
    }

    fn initial_offset(distance: f32) -> Vec3 {
        Vec3::new(0.0, INITIAL_CAMERA_HEIGHT - PLAYER_HEIGHT_OFFSET, -distance)
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov
    }

    pub fn far_plane(&self) -> f32 {
        self.far_plane
    }

    /// Actual distance between camera and target (equals `distance()` after a lock)
    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.look_at)
    }

    /// Horizontal orbit angle around the target. Zero means the camera sits on the +Z side.
    pub fn azimuthal_angle(&self) -> f32 {
        let offset = self.position - self.look_at;
        offset.x.atan2(offset.z)
    }

    /// Angle between the camera offset and straight up
    pub fn polar_angle(&self) -> f32 {
        let offset = self.position - self.look_at;
        let len = offset.length();
        if len <= f32::EPSILON {
            return FRAC_PI_2;
        }
        (offset.y / len).clamp(-1.0, 1.0).acos()
    }

    /// Shift camera and target together
    pub fn follow_translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.look_at += delta;
    }

    /// Re-project the camera to `distance` from `target` along its current direction
    pub fn recompute_distance_lock(&mut self, target: Vec3) {
        let direction = (self.position - target)
            .try_normalize()
            .unwrap_or_else(|| Self::initial_offset(self.distance).normalize());
        self.position = target + direction * self.distance;
        self.look_at = target;
    }

    /// Set the follow distance (clamped) and re-lock
    pub fn set_distance(&mut self, distance: f32, target: Vec3) {
        self.distance = CAMERA_DISTANCE.clamp(distance);
        self.recompute_distance_lock(target);
    }

    /// Scroll zoom: one step per event, positive zooms out. Returns whether it applied.
    pub fn zoom(&mut self, scroll_delta: f32, target: Vec3) -> bool {
        if scroll_delta == 0.0 || scroll_delta.is_nan() {
            return false;
        }
        self.set_distance(self.distance + scroll_delta.signum() * ZOOM_STEP, target);
        true
    }

    /// Projection parameters only; the camera does not move
    pub fn apply_projection_settings(&mut self, fov: f32, far_plane: f32) {
        self.fov = CAMERA_FOV.clamp(fov);
        self.far_plane = RENDER_DISTANCE.clamp(far_plane);
    }

    pub fn apply_settings(&mut self, settings: &Settings, target: Vec3) {
        self.apply_projection_settings(settings.camera_fov, settings.render_distance);
        self.set_distance(settings.camera_distance, target);
    }

    /// Put the camera on its orbit sphere at the given spherical angles
    pub fn set_orbit_angles(&mut self, azimuth: f32, polar: f32) {
        let polar = polar.clamp(MIN_POLAR_ANGLE, MAX_POLAR_ANGLE);
        let horizontal = self.distance * polar.sin();
        let offset = Vec3::new(
            horizontal * azimuth.sin(),
            self.distance * polar.cos(),
            horizontal * azimuth.cos(),
        );
        self.position = self.look_at + offset;
    }
}

/// External orbit input.
///
/// Per frame the loop reads `azimuthal_angle`, moves the player, then calls
/// `set_target(player)` followed by `update`. The implementation may rotate the camera
/// freely around the target but must leave it at the rig's distance.
pub trait OrbitControl {
    fn azimuthal_angle(&self) -> f32;
    fn set_target(&mut self, target: Vec3);
    fn update(&mut self, rig: &mut CameraRig);
}

/// Radians of orbit per pixel of pointer drag
pub const ORBIT_SENSITIVITY: f32 = 0.005;

/// Pointer-drag orbit (no pan, no damping, no built-in zoom)
#[derive(Resource, Clone, Debug, Default)]
pub struct PointerOrbit {
    target: Vec3,
    pending_azimuth: f32,
    pending_polar: f32,
    azimuth: f32,
}

impl PointerOrbit {
    pub fn new(rig: &CameraRig) -> Self {
        Self {
            target: rig.look_at,
            azimuth: rig.azimuthal_angle(),
            ..default()
        }
    }

    /// Queue a drag. Dragging right swings the camera left around the target; dragging
    /// down lifts it.
    pub fn drag(&mut self, delta: Vec2) {
        self.pending_azimuth -= delta.x * ORBIT_SENSITIVITY;
        self.pending_polar -= delta.y * ORBIT_SENSITIVITY;
    }
}

impl OrbitControl for PointerOrbit {
    fn azimuthal_angle(&self) -> f32 {
        self.azimuth
    }

    fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    fn update(&mut self, rig: &mut CameraRig) {
        rig.look_at = self.target;
        let azimuth = rig.azimuthal_angle() + self.pending_azimuth;
        let polar = rig.polar_angle() + self.pending_polar;
        rig.set_orbit_angles(azimuth, polar);

        self.pending_azimuth = 0.0;
        self.pending_polar = 0.0;
        self.azimuth = rig.azimuthal_angle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn rig() -> CameraRig {
        CameraRig::new(&Settings::default(), Vec3::new(0.0, 0.5, 0.0))
    }

    #[test]
    fn test_new_rig_is_locked_behind_player() {
        let r = rig();
        assert!((r.distance_to_target() - 50.0).abs() < EPS);
        assert!(r.position.z < 0.0);
        assert!(r.position.y > 0.5);
        assert!((r.azimuthal_angle().abs() - std::f32::consts::PI).abs() < EPS);
    }

    #[test]
    fn test_follow_translate_preserves_distance_and_direction() {
        let mut r = rig();
        let before = r.distance_to_target();
        let dir = (r.position - r.look_at).normalize();

        r.follow_translate(Vec3::new(7.0, 0.0, -3.0));
        assert!((r.distance_to_target() - before).abs() < EPS);
        assert!(((r.position - r.look_at).normalize() - dir).length() < EPS);
        assert_eq!(r.look_at, Vec3::new(7.0, 0.5, -3.0));
    }

    #[test]
    fn test_distance_lock_keeps_direction() {
        let mut r = rig();
        r.position = Vec3::new(3.0, 4.5, 0.0);
        r.recompute_distance_lock(Vec3::new(0.0, 0.5, 0.0));
        assert!((r.position - Vec3::new(30.0, 40.5, 0.0)).length() < EPS);
    }

    #[test]
    fn test_distance_lock_with_camera_on_target() {
        let mut r = rig();
        let target = Vec3::new(2.0, 0.5, 2.0);
        r.position = target;
        r.recompute_distance_lock(target);
        assert!((r.distance_to_target() - 50.0).abs() < EPS);
    }

    #[test]
    fn test_zoom_steps_and_clamps() {
        let mut r = rig();
        let target = r.look_at;
        assert!(r.zoom(-120.0, target));
        assert!((r.distance() - 49.0).abs() < EPS);
        assert!((r.distance_to_target() - 49.0).abs() < EPS);

        assert!(r.zoom(3.0, target));
        assert!(r.zoom(3.0, target));
        assert_eq!(r.distance(), 50.0);

        assert!(!r.zoom(0.0, target));

        r.set_distance(2.0, target);
        assert_eq!(r.distance(), 10.0);
    }

    #[test]
    fn test_projection_settings_do_not_move_camera() {
        let mut r = rig();
        let position = r.position;
        r.apply_projection_settings(200.0, 5.0);
        assert_eq!(r.fov_degrees(), 120.0);
        assert_eq!(r.far_plane(), 10.0);
        assert_eq!(r.position, position);
    }

    #[test]
    fn test_pointer_orbit_rotates_at_fixed_distance() {
        let mut r = rig();
        let mut orbit = PointerOrbit::new(&r);
        orbit.drag(Vec2::new(-100.0, 0.0));
        orbit.set_target(r.look_at);
        orbit.update(&mut r);

        assert!((r.distance_to_target() - 50.0).abs() < EPS);
        // Dragging left swings the camera around by +0.5 rad
        let expected = std::f32::consts::PI + 0.5;
        let got = orbit.azimuthal_angle().rem_euclid(std::f32::consts::TAU);
        assert!((got - expected).abs() < EPS);
    }

    #[test]
    fn test_pointer_orbit_limits_polar_angle() {
        let mut r = rig();
        let mut orbit = PointerOrbit::new(&r);
        // Drag far up: camera would sink under the floor
        orbit.drag(Vec2::new(0.0, -10_000.0));
        orbit.set_target(r.look_at);
        orbit.update(&mut r);
        assert!((r.polar_angle() - MAX_POLAR_ANGLE).abs() < EPS);
        assert!(r.position.y > r.look_at.y);

        orbit.drag(Vec2::new(0.0, 10_000.0));
        orbit.update(&mut r);
        assert!((r.polar_angle() - MIN_POLAR_ANGLE).abs() < EPS);
    }
}
