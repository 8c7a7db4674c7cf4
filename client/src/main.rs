//! Arena client - renders the arena and turns window input into controller commands

mod camera;
mod input;
mod systems;
mod ui;

use arena_shared::ArenaCorePlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;

/// Scene background (neutral gray)
const BACKGROUND: Color = Color::srgb(0.369, 0.365, 0.365);

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Orbit Arena".to_string(),
            resolution: WindowResolution::new(1280, 720),
            ..default()
        }),
        ..default()
    }));

    // Settings, movement controller, camera rig, orbit input, command queue
    app.add_plugins(ArenaCorePlugin::default());
    app.add_plugins(ui::SettingsPanelPlugin);

    app.insert_resource(ClearColor(BACKGROUND));

    app.add_systems(
        Startup,
        (
            systems::spawn_world,
            systems::spawn_player,
            camera::spawn_camera,
        ),
    );

    // ORDER MATTERS: input -> frame -> visuals. Commands queued by input (and the
    // settings panel) are applied at the start of `advance_frame`.
    app.add_systems(
        Update,
        (
            (
                input::handle_keyboard_input,
                input::handle_scroll_zoom,
                input::handle_orbit_drag,
                input::handle_ground_click,
            ),
            systems::advance_frame,
            (
                systems::sync_player_transform,
                systems::sync_skill_indicator,
                systems::refit_arena,
                systems::draw_arena_markers,
                camera::sync_camera,
            ),
        )
            .chain(),
    );

    info!("Starting arena client");
    app.run();
}
