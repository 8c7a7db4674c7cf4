//! Frame pump: runs the shared controller/camera update once per Bevy frame

use bevy::prelude::*;

use arena_shared::{run_frame, CameraRig, ControlQueue, MovementController, PointerOrbit, Settings};

/// Drain queued commands, advance movement and move the camera rig with the player
pub fn advance_frame(
    time: Res<Time>,
    mut queue: ResMut<ControlQueue>,
    mut controller: ResMut<MovementController>,
    mut rig: ResMut<CameraRig>,
    mut orbit: ResMut<PointerOrbit>,
    mut settings: ResMut<Settings>,
) {
    let dt = time.delta_secs();

    // Only flag the settings as changed when a command actually changed them, so the
    // panel and arena visuals don't rebuild every frame
    let report = run_frame(
        &mut queue,
        &mut controller,
        &mut rig,
        &mut *orbit,
        settings.bypass_change_detection(),
        dt,
    );

    if report.settings_changed {
        settings.set_changed();
    }
    if report.step.clamped {
        debug!("Player clamped to arena edge at {:?}", report.step.position);
    }
}
