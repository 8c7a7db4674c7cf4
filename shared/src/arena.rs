//! Circular arena boundary.
//!
//! The arena is a disc centered on the origin. The player's center must stay within
//! `radius - PLAYER_RADIUS` so the avatar's edge never crosses the rim.

use bevy::prelude::*;

use crate::math::ground;
use crate::settings::CIRCLE_RADIUS;
use crate::{PLAYER_HEIGHT_OFFSET, PLAYER_RADIUS};

/// Playable circle. The render side builds the floor and markers from `radius`.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    pub radius: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(CIRCLE_RADIUS.default)
    }
}

impl Arena {
    pub fn new(radius: f32) -> Self {
        Self {
            radius: CIRCLE_RADIUS.clamp(radius),
        }
    }

    /// Largest distance from the origin the player's center may reach
    #[inline]
    pub fn walkable_radius(&self) -> f32 {
        walkable_radius(self.radius)
    }

    /// Upstream check for click-to-seek: is this ground point a legal target?
    pub fn accepts_point(&self, point: Vec3) -> bool {
        ground(point).length() <= self.walkable_radius()
    }

    pub fn clamp(&self, position: Vec3) -> (Vec3, bool) {
        clamp_to_arena(position, self.radius)
    }
}

#[inline]
pub fn walkable_radius(radius: f32) -> f32 {
    (radius - PLAYER_RADIUS).max(0.0)
}

/// Pull `position` back inside the arena.
///
/// Returns the corrected position and whether a correction happened. Only the
/// x/z components are rescaled; height is pinned to the player's fixed offset.
pub fn clamp_to_arena(position: Vec3, radius: f32) -> (Vec3, bool) {
    let limit = walkable_radius(radius);
    let distance = ground(position).length();
    if distance <= limit {
        return (position, false);
    }

    let scale = limit / distance;
    let clamped = Vec3::new(
        position.x * scale,
        PLAYER_HEIGHT_OFFSET,
        position.z * scale,
    );
    (clamped, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inside_is_untouched() {
        let p = Vec3::new(10.0, 0.5, -5.0);
        assert_eq!(clamp_to_arena(p, 40.0), (p, false));
    }

    #[test]
    fn test_on_the_limit_is_untouched() {
        let p = Vec3::new(39.5, 0.5, 0.0);
        assert_eq!(clamp_to_arena(p, 40.0), (p, false));
    }

    #[test]
    fn test_outside_is_rescaled_along_the_ray() {
        let (clamped, was_clamped) = clamp_to_arena(Vec3::new(100.0, 0.5, 0.0), 40.0);
        assert!(was_clamped);
        assert!((clamped - Vec3::new(39.5, 0.5, 0.0)).length() < 1e-5);

        let (diag, _) = clamp_to_arena(Vec3::new(30.0, 0.5, 40.0), 20.0);
        assert!((ground(diag).length() - 19.5).abs() < 1e-4);
        // Direction is preserved
        assert!((diag.x / diag.z - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_accepts_point_uses_collision_margin() {
        let arena = Arena::new(40.0);
        assert!(arena.accepts_point(Vec3::new(39.5, 0.0, 0.0)));
        assert!(!arena.accepts_point(Vec3::new(39.6, 0.0, 0.0)));
    }

    #[test]
    fn test_radius_is_clamped() {
        assert_eq!(Arena::new(5.0).radius, 10.0);
        assert_eq!(Arena::new(500.0).radius, 100.0);
    }
}
