//! Window input -> controller commands
//!
//! Keyboard, wheel and left-click become `ControlCommand`s on the queue; right-drag feeds
//! the pointer orbit directly. Pointer events over the settings panel never reach the world.

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use arena_shared::{ControlCommand, ControlQueue, MoveKey, MovementController, PointerOrbit};

use crate::camera::MainCamera;

const MOVE_BINDINGS: [(KeyCode, MoveKey); 4] = [
    (KeyCode::KeyW, MoveKey::Forward),
    (KeyCode::KeyS, MoveKey::Back),
    (KeyCode::KeyA, MoveKey::Left),
    (KeyCode::KeyD, MoveKey::Right),
];

const SKILL_AIM_KEY: KeyCode = KeyCode::Digit1;

/// Any UI node under the pointer (panel, rows, buttons)
fn pointer_over_ui(interactions: &Query<&Interaction>) -> bool {
    interactions.iter().any(|i| *i != Interaction::None)
}

/// WASD and the skill toggle
pub fn handle_keyboard_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    controller: Res<MovementController>,
    mut queue: ResMut<ControlQueue>,
) {
    let held = controller.directional_input();
    for (code, key) in MOVE_BINDINGS {
        if keyboard.just_released(code) {
            queue.push(ControlCommand::Key(key, false));
        } else if keyboard.pressed(code) && !held.is_held(key) {
            // Re-sent every frame until the controller takes it, so a key held through a
            // seek or skill aim starts walking once that ends
            queue.push(ControlCommand::Key(key, true));
        }
    }

    // just_pressed: holding the key must not keep flipping the mode
    if keyboard.just_pressed(SKILL_AIM_KEY) {
        queue.push(ControlCommand::ToggleSkillAim);
    }
}

/// Mouse wheel zoom, one step per notch
pub fn handle_scroll_zoom(
    mut wheel: MessageReader<MouseWheel>,
    interactions: Query<&Interaction>,
    mut queue: ResMut<ControlQueue>,
) {
    let over_ui = pointer_over_ui(&interactions);
    for event in wheel.read() {
        if over_ui || event.y == 0.0 {
            continue;
        }
        // Wheel up (positive y) pulls the camera in
        queue.push(ControlCommand::Zoom(-event.y));
    }
}

/// Right mouse drag orbits the camera around the player
pub fn handle_orbit_drag(
    mut mouse_motion: MessageReader<MouseMotion>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    interactions: Query<&Interaction>,
    mut orbit: ResMut<PointerOrbit>,
) {
    let mut delta = Vec2::ZERO;
    for motion in mouse_motion.read() {
        delta += motion.delta;
    }

    if delta == Vec2::ZERO || !mouse_button.pressed(MouseButton::Right) {
        return;
    }
    // Don't start an orbit from on top of the panel
    if mouse_button.just_pressed(MouseButton::Right) && pointer_over_ui(&interactions) {
        return;
    }
    orbit.drag(delta);
}

/// Left click on the floor -> seek (skill seek while aiming)
pub fn handle_ground_click(
    mouse_button: Res<ButtonInput<MouseButton>>,
    interactions: Query<&Interaction>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    controller: Res<MovementController>,
    mut queue: ResMut<ControlQueue>,
) {
    if !mouse_button.just_pressed(MouseButton::Left) || pointer_over_ui(&interactions) {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Some(point) = pick_floor(camera, camera_transform, cursor) else {
        return;
    };

    if !controller.arena().accepts_point(point) {
        debug!("Click at {:?} is outside the arena", point);
        return;
    }
    queue.push(ControlCommand::Seek(point));
}

/// Cast a ray from the cursor onto the floor plane (y = 0)
fn pick_floor(camera: &Camera, camera_transform: &GlobalTransform, cursor: Vec2) -> Option<Vec3> {
    let ray = camera.viewport_to_world(camera_transform, cursor).ok()?;
    let distance = ray.intersect_plane(Vec3::ZERO, InfinitePlane3d::new(Vec3::Y))?;
    Some(ray.get_point(distance))
}
