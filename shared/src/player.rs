//! Player-related constants

/// Fixed height of the player's center above the floor
pub const PLAYER_HEIGHT_OFFSET: f32 = 0.5;

/// Player collision radius (sphere). The arena clamp keeps the avatar's edge inside.
pub const PLAYER_RADIUS: f32 = 0.5;

/// Speed settings are stored in UI units; world units per second = setting / SPEED_SCALE
pub const SPEED_SCALE: f32 = 10.0;

/// Maximum facing change per frame (radians) while walking
pub const TURN_RATE_PER_FRAME: f32 = 0.05;

/// Spawn position at the arena center
pub const SPAWN_POSITION: [f32; 3] = [0.0, PLAYER_HEIGHT_OFFSET, 0.0];
