//! Per-frame update order.
//!
//! 1. Drain pending commands
//! 2. Read the orbit angle and advance the movement controller
//! 3. Translate the camera rig by the player's delta
//! 4. Re-lock the camera distance if the boundary snapped the player
//! 5. Hand the new target to the orbit collaborator and let it update
//!
//! Rendering happens after this returns.

use crate::camera::{CameraRig, OrbitControl};
use crate::commands::{ControlQueue, ControlCommand};
use crate::movement::{MovementController, MovementStep};
use crate::settings::{SettingField, Settings};

/// What happened during one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub step: MovementStep,
    /// Number of commands applied before the update
    pub commands_applied: usize,
    /// Settings changed this frame (the scene may need rebuilding)
    pub settings_changed: bool,
}

/// Apply one command. Returns whether the effective settings changed.
pub fn apply_command(
    command: ControlCommand,
    controller: &mut MovementController,
    rig: &mut CameraRig,
    settings: &mut Settings,
) -> bool {
    match command {
        ControlCommand::Seek(point) => {
            controller.handle_seek_command(point);
            false
        }
        ControlCommand::Key(key, pressed) => {
            controller.handle_directional_key(key, pressed);
            false
        }
        ControlCommand::ToggleSkillAim => {
            controller.toggle_skill_aim();
            false
        }
        ControlCommand::Zoom(scroll) => {
            if !rig.zoom(scroll, controller.position()) {
                return false;
            }
            // Keep the panel in sync with wheel zoom
            settings.set(SettingField::CameraDistance, rig.distance());
            true
        }
        ControlCommand::ApplySettings(new_settings) => {
            *settings = new_settings.clamped();
            controller.apply_settings(settings);
            rig.apply_settings(settings, controller.position());
            true
        }
    }
}

/// Run one frame of the controller/camera coupling
pub fn run_frame<O: OrbitControl>(
    queue: &mut ControlQueue,
    controller: &mut MovementController,
    rig: &mut CameraRig,
    orbit: &mut O,
    settings: &mut Settings,
    dt: f32,
) -> FrameReport {
    let mut commands_applied = 0;
    let mut settings_changed = false;
    for command in queue.drain() {
        settings_changed |= apply_command(command, controller, rig, settings);
        commands_applied += 1;
    }

    let azimuth = orbit.azimuthal_angle();
    let step = controller.update(dt, azimuth);

    rig.follow_translate(step.delta);
    if step.clamped {
        rig.recompute_distance_lock(step.position);
    }

    orbit.set_target(step.position);
    orbit.update(rig);

    FrameReport {
        step,
        commands_applied,
        settings_changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::*;
    use crate::camera::PointerOrbit;
    use crate::movement::{MoveKey, MovementMode};

    const EPS: f32 = 1e-3;

    /// Orbit double with a fixed angle that never moves the camera
    struct FixedOrbit {
        angle: f32,
        target: Vec3,
        updates: usize,
    }

    impl FixedOrbit {
        fn new(angle: f32) -> Self {
            Self {
                angle,
                target: Vec3::ZERO,
                updates: 0,
            }
        }
    }

    impl OrbitControl for FixedOrbit {
        fn azimuthal_angle(&self) -> f32 {
            self.angle
        }

        fn set_target(&mut self, target: Vec3) {
            self.target = target;
        }

        fn update(&mut self, _rig: &mut CameraRig) {
            self.updates += 1;
        }
    }

    struct Harness {
        queue: ControlQueue,
        controller: MovementController,
        rig: CameraRig,
        settings: Settings,
    }

    impl Harness {
        fn new(settings: Settings) -> Self {
            let controller = MovementController::new(&settings);
            let rig = CameraRig::new(&settings, controller.position());
            Self {
                queue: ControlQueue::new(),
                controller,
                rig,
                settings,
            }
        }

        fn frame(&mut self, orbit: &mut impl OrbitControl, dt: f32) -> FrameReport {
            run_frame(
                &mut self.queue,
                &mut self.controller,
                &mut self.rig,
                orbit,
                &mut self.settings,
                dt,
            )
        }
    }

    fn assert_camera_locked(world: &Harness) {
        assert!((world.rig.distance_to_target() - world.rig.distance()).abs() < EPS);
        assert!((world.rig.look_at - world.controller.position()).length() < EPS);
    }

    #[test]
    fn test_seek_to_rim_point() {
        let mut settings = Settings::default();
        settings.move_speed = 170.0;
        let mut world = Harness::new(settings);
        let mut orbit = FixedOrbit::new(0.0);

        world.queue.push(ControlCommand::Seek(Vec3::new(40.0, 0.5, 0.0)));
        world.frame(&mut orbit, 10.0);

        // The boundary wins over the raw target
        assert!((world.controller.position() - Vec3::new(39.5, 0.5, 0.0)).length() < EPS);
        assert!(world.controller.target().is_none());
        assert_camera_locked(&world);
    }

    #[test]
    fn test_seek_inside_arena_lands_exactly() {
        let mut world = Harness::new(Settings::default());
        let mut orbit = FixedOrbit::new(0.0);

        world.queue.push(ControlCommand::Seek(Vec3::new(39.0, 0.5, 0.0)));
        let report = world.frame(&mut orbit, 10.0);

        assert_eq!(report.commands_applied, 1);
        assert!(!report.step.clamped);
        assert_eq!(world.controller.position(), Vec3::new(39.0, 0.5, 0.0));
        assert!(world.controller.target().is_none());
        assert_eq!(orbit.target, Vec3::new(39.0, 0.5, 0.0));
        assert_camera_locked(&world);
    }

    #[test]
    fn test_skill_seek_out_of_range_is_ignored() {
        let mut settings = Settings::default();
        settings.skill_radius = 40.0;
        let mut world = Harness::new(settings);
        let mut orbit = FixedOrbit::new(0.0);

        world.queue.push(ControlCommand::ToggleSkillAim);
        world.queue.push(ControlCommand::Seek(Vec3::new(0.0, 0.5, 41.0)));
        world.frame(&mut orbit, 0.5);

        assert_eq!(world.controller.mode(), MovementMode::SkillAiming);
        assert_eq!(world.controller.position(), Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_inconsistent_seek_is_clamped_and_cancelled() {
        let mut world = Harness::new(Settings::default());
        let mut orbit = FixedOrbit::new(0.0);

        world.queue.push(ControlCommand::Seek(Vec3::new(100.0, 0.5, 0.0)));
        let report = world.frame(&mut orbit, 100.0);

        assert!(report.step.clamped);
        assert!((world.controller.position() - Vec3::new(39.5, 0.5, 0.0)).length() < EPS);
        assert!(!world.controller.mode().is_seeking());
        assert_camera_locked(&world);
    }

    #[test]
    fn test_camera_follows_rigidly_while_walking() {
        let mut world = Harness::new(Settings::default());
        let mut orbit = FixedOrbit::new(0.3);
        let offset_before = world.rig.position - world.rig.look_at;

        world.queue.push(ControlCommand::Key(MoveKey::Forward, true));
        for _ in 0..30 {
            world.frame(&mut orbit, 1.0 / 60.0);
        }

        let offset_after = world.rig.position - world.rig.look_at;
        assert!((offset_after - offset_before).length() < EPS);
        assert_camera_locked(&world);
        assert_eq!(orbit.updates, 30);
    }

    #[test]
    fn test_zoom_updates_rig_and_settings() {
        let mut world = Harness::new(Settings::default());
        let mut orbit = PointerOrbit::new(&world.rig);

        world.queue.push(ControlCommand::Zoom(-1.0));
        world.queue.push(ControlCommand::Zoom(-1.0));
        let report = world.frame(&mut orbit, 1.0 / 60.0);

        assert!(report.settings_changed);
        assert!((world.rig.distance() - 48.0).abs() < EPS);
        assert!((world.settings.camera_distance - 48.0).abs() < EPS);
        assert_camera_locked(&world);
    }

    #[test]
    fn test_apply_settings_reaches_controller_and_rig() {
        let mut world = Harness::new(Settings::default());
        let mut orbit = PointerOrbit::new(&world.rig);

        let mut next = Settings::default();
        next.camera_distance = 20.0;
        next.camera_fov = 90.0;
        next.move_speed = 100.0;
        world.queue.push(ControlCommand::ApplySettings(next));
        world.queue.push(ControlCommand::Seek(Vec3::new(5.0, 0.5, 0.0)));
        world.frame(&mut orbit, 0.0);

        assert_eq!(world.settings, next);
        assert_eq!(world.rig.fov_degrees(), 90.0);
        assert_eq!(world.controller.active_speed(), Some(10.0));
        assert_camera_locked(&world);
    }

    #[test]
    fn test_pointer_orbit_steers_walking() {
        let mut world = Harness::new(Settings::default());
        let mut orbit = PointerOrbit::new(&world.rig);
        // First frame settles the camera onto its orbit sphere
        world.frame(&mut orbit, 0.0);

        world.queue.push(ControlCommand::Key(MoveKey::Forward, true));
        let report = world.frame(&mut orbit, 0.1);

        // Camera sits on the -Z side (azimuth pi), so "forward" walks toward +Z
        assert!(report.step.delta.z > 1.6);
        assert!(report.step.delta.x.abs() < EPS);
        assert_camera_locked(&world);
    }
}
