//! World systems
//!
//! Arena floor, cardinal pillars, radial guide lines and the sun. Everything here is
//! sized from `Settings::circle_radius` and refit when it changes.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_8};

use bevy::light::{CascadeShadowConfig, CascadeShadowConfigBuilder, light_consts::lux};
use bevy::prelude::*;

use arena_shared::{CAMERA_DISTANCE, Settings};

const PILLAR_RADIUS: f32 = 1.0;
const PILLAR_HEIGHT: f32 = 10.0;
/// Pillars stand just outside the floor edge
const PILLAR_OFFSET: f32 = 0.5;
const GUIDE_LINE_COUNT: usize = 8;
const GUIDE_LINE_HEIGHT: f32 = 0.01;
/// Shadow coverage relative to the arena radius
const SHADOW_MARGIN: f32 = 1.2;

// =============================================================================
// COMPONENTS
// =============================================================================

/// Unit disc scaled to the arena radius
#[derive(Component)]
pub struct ArenaFloor;

/// One of the four boundary pillars
#[derive(Component)]
pub struct ArenaPillar {
    /// Unit ground direction from the arena center
    pub direction: Vec3,
}

/// Marker for the shadow-casting directional light
#[derive(Component)]
pub struct ArenaSun;

// =============================================================================
// SPAWNING
// =============================================================================

/// Spawn the arena visuals
pub fn spawn_world(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<Settings>,
) {
    let radius = settings.circle_radius;

    let floor_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.667, 0.667, 0.667),
        perceptual_roughness: 0.9,
        double_sided: true,
        cull_mode: None,
        ..default()
    });
    commands.spawn((
        ArenaFloor,
        Mesh3d(meshes.add(Circle::new(1.0))),
        MeshMaterial3d(floor_material),
        floor_transform(radius),
    ));

    // North (+Z) is highlighted so the player can orient themselves
    let pillar_mesh = meshes.add(Cylinder::new(PILLAR_RADIUS, PILLAR_HEIGHT));
    let north_material = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 0.4, 0.0),
        ..default()
    });
    let pillar_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        ..default()
    });
    for direction in [Vec3::Z, Vec3::X, Vec3::NEG_Z, Vec3::NEG_X] {
        let material = if direction == Vec3::Z {
            north_material.clone()
        } else {
            pillar_material.clone()
        };
        commands.spawn((
            ArenaPillar { direction },
            Mesh3d(pillar_mesh.clone()),
            MeshMaterial3d(material),
            pillar_transform(direction, radius),
        ));
    }

    // Overhead sun; shadow cascade is fit to the arena
    commands.spawn((
        ArenaSun,
        DirectionalLight {
            illuminance: lux::OVERCAST_DAY,
            shadows_enabled: true,
            ..default()
        },
        sun_shadow_config(radius),
        Transform::from_xyz(0.0, 10.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z),
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 250.0,
        affects_lightmapped_meshes: true,
    });

    info!("Spawned arena with radius {}", radius);
}

// =============================================================================
// REFIT
// =============================================================================

/// Resize floor, move pillars and refit shadows when the arena radius changes
pub fn refit_arena(
    mut commands: Commands,
    settings: Res<Settings>,
    mut last_radius: Local<Option<f32>>,
    mut floors: Query<&mut Transform, (With<ArenaFloor>, Without<ArenaPillar>)>,
    mut pillars: Query<(&ArenaPillar, &mut Transform), Without<ArenaFloor>>,
    suns: Query<Entity, With<ArenaSun>>,
) {
    if !settings.is_changed() {
        return;
    }
    let radius = settings.circle_radius;
    if *last_radius == Some(radius) {
        return;
    }
    // First run only records the spawn radius
    let first_run = last_radius.is_none();
    *last_radius = Some(radius);
    if first_run {
        return;
    }

    for mut transform in floors.iter_mut() {
        *transform = floor_transform(radius);
    }
    for (pillar, mut transform) in pillars.iter_mut() {
        *transform = pillar_transform(pillar.direction, radius);
    }
    for sun in suns.iter() {
        commands.entity(sun).insert(sun_shadow_config(radius));
    }

    info!("Arena refit to radius {}", radius);
}

/// Radial guide lines from the center to the rim, offset half a sector from the axes
pub fn draw_arena_markers(settings: Res<Settings>, mut gizmos: Gizmos) {
    let radius = settings.circle_radius;
    let center = Vec3::new(0.0, GUIDE_LINE_HEIGHT, 0.0);
    for i in 0..GUIDE_LINE_COUNT {
        let angle = i as f32 * FRAC_PI_4 + FRAC_PI_8;
        let rim = Vec3::new(angle.cos() * radius, GUIDE_LINE_HEIGHT, angle.sin() * radius);
        gizmos.line(center, rim, Color::BLACK);
    }
}

fn floor_transform(radius: f32) -> Transform {
    // Circle is built in the XY plane; lay it flat and scale in-plane
    Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2))
        .with_scale(Vec3::new(radius, radius, 1.0))
}

fn pillar_transform(direction: Vec3, radius: f32) -> Transform {
    Transform::from_translation(direction * (radius + PILLAR_OFFSET) + Vec3::Y * (PILLAR_HEIGHT / 2.0))
}

fn sun_shadow_config(radius: f32) -> CascadeShadowConfig {
    let extent = radius * SHADOW_MARGIN;
    CascadeShadowConfigBuilder {
        num_cascades: 2,
        first_cascade_far_bound: extent * 0.5,
        // Measured from the camera, which can sit on the far side of the arena
        maximum_distance: extent * 2.0 + CAMERA_DISTANCE.max,
        ..default()
    }
    .build()
}
