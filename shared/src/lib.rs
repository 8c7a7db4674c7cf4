//! Arena avatar controller core.
//!
//! Movement state machine, arena boundary clamp and the distance-locked camera rig,
//! plus the settings record they are configured from. Everything here is plain data
//! and functions; the Bevy client supplies input, rendering and the frame pump.

use bevy::prelude::*;

pub mod arena;
pub mod camera;
pub mod commands;
pub mod frame;
pub mod math;
pub mod movement;
pub mod player;
pub mod settings;

pub use arena::*;
pub use camera::*;
pub use commands::*;
pub use frame::*;
pub use movement::*;
pub use player::*;
pub use settings::*;

/// Inserts the controller, camera rig, orbit input, command queue and settings
/// resources, with settings loaded from `store`.
pub struct ArenaCorePlugin {
    pub store: SettingsStore,
}

impl Default for ArenaCorePlugin {
    fn default() -> Self {
        Self {
            store: SettingsStore::from_env(),
        }
    }
}

impl Plugin for ArenaCorePlugin {
    fn build(&self, app: &mut App) {
        let settings = self.store.load_or_default();
        let controller = MovementController::new(&settings);
        let rig = CameraRig::new(&settings, controller.position());
        let orbit = PointerOrbit::new(&rig);

        app.insert_resource(self.store.clone())
            .insert_resource(settings)
            .insert_resource(controller)
            .insert_resource(rig)
            .insert_resource(orbit)
            .init_resource::<ControlQueue>();
    }
}
