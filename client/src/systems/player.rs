//! Player avatar and skill indicator visuals

use bevy::prelude::*;

use arena_shared::{MovementController, PLAYER_RADIUS};

/// Indicator sits just above the floor to avoid z-fighting
const INDICATOR_HEIGHT: f32 = 0.01;

// =============================================================================
// COMPONENTS
// =============================================================================

/// The avatar sphere
#[derive(Component)]
pub struct PlayerAvatar;

/// Translucent disc showing the skill seek radius while aiming
#[derive(Component)]
pub struct SkillIndicator;

// =============================================================================
// SPAWNING
// =============================================================================

pub fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    controller: Res<MovementController>,
) {
    let body_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.85, 0.85, 0.9),
        perceptual_roughness: 0.6,
        ..default()
    });
    let nose_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.15, 0.15, 0.2),
        perceptual_roughness: 0.8,
        ..default()
    });

    commands
        .spawn((
            PlayerAvatar,
            Mesh3d(meshes.add(Sphere::new(PLAYER_RADIUS))),
            MeshMaterial3d(body_material),
            Transform::from_translation(controller.position()).with_rotation(controller.facing()),
            Visibility::Inherited,
        ))
        .with_children(|parent| {
            // Small nub on the +Z side so the facing direction reads on screen
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::new(0.15, 0.15, 0.3))),
                MeshMaterial3d(nose_material),
                Transform::from_xyz(0.0, 0.1, PLAYER_RADIUS),
            ));
        });

    let indicator_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.2, 0.45, 1.0, 0.3),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        cull_mode: None,
        ..default()
    });

    commands.spawn((
        SkillIndicator,
        Mesh3d(meshes.add(Circle::new(1.0))),
        MeshMaterial3d(indicator_material),
        indicator_transform(&controller),
        Visibility::Hidden,
    ));

    info!("Spawned player at {:?}", controller.position());
}

// =============================================================================
// TRANSFORM SYNC
// =============================================================================

/// Snap the avatar to the controller; the controller already limits turn rate
pub fn sync_player_transform(
    controller: Res<MovementController>,
    mut players: Query<&mut Transform, With<PlayerAvatar>>,
) {
    for mut transform in players.iter_mut() {
        transform.translation = controller.position();
        transform.rotation = controller.facing();
    }
}

/// Show the skill radius disc under the player while aiming
pub fn sync_skill_indicator(
    controller: Res<MovementController>,
    mut indicators: Query<(&mut Transform, &mut Visibility), With<SkillIndicator>>,
) {
    let visible = controller.skill_indicator_visible();
    for (mut transform, mut visibility) in indicators.iter_mut() {
        let wanted = if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if *visibility != wanted {
            *visibility = wanted;
        }
        if visible {
            *transform = indicator_transform(&controller);
        }
    }
}

/// Unit circle laid flat on the floor, scaled to the skill radius
fn indicator_transform(controller: &MovementController) -> Transform {
    let position = controller.position();
    let radius = controller.skill_radius();
    Transform::from_xyz(position.x, INDICATOR_HEIGHT, position.z)
        .with_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2))
        .with_scale(Vec3::new(radius, radius, 1.0))
}
