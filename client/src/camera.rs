//! Third-person camera: mirrors the `CameraRig` onto the Bevy camera entity

use bevy::prelude::*;

use arena_shared::{CameraRig, NEAR_PLANE};

/// Marker for the single gameplay camera
#[derive(Component)]
pub struct MainCamera;

pub fn spawn_camera(mut commands: Commands, rig: Res<CameraRig>) {
    commands.spawn((
        MainCamera,
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: rig.fov_degrees().to_radians(),
            near: NEAR_PLANE,
            far: rig.far_plane(),
            ..default()
        }),
        rig_transform(&rig),
    ));
}

/// Copy rig pose and projection onto the camera (runs after the frame update)
pub fn sync_camera(
    rig: Res<CameraRig>,
    mut camera_query: Query<(&mut Transform, &mut Projection), With<MainCamera>>,
) {
    let Ok((mut transform, mut projection)) = camera_query.single_mut() else {
        return;
    };

    *transform = rig_transform(&rig);

    let Projection::Perspective(ref mut persp) = *projection else {
        return;
    };
    let fov = rig.fov_degrees().to_radians();
    if persp.fov != fov || persp.far != rig.far_plane() {
        persp.fov = fov;
        persp.far = rig.far_plane();
    }
}

fn rig_transform(rig: &CameraRig) -> Transform {
    // Keep the camera level (no roll) while looking at the player
    Transform::from_translation(rig.position).looking_at(rig.look_at, Vec3::Y)
}
