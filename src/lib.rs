mod core;
mod helpers;
mod terrain;

use crate::core::camera::CameraPlugin;
use crate::core::state::ViewerState;
use crate::terrain::TerrainPlugin;
use bevy::app::App;
#[cfg(debug_assertions)]
use bevy::diagnostic::LogDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;

pub struct GraphscapePlugin;

impl Plugin for GraphscapePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<ViewerState>()
            .add_plugins((EguiPlugin::default(), CameraPlugin, TerrainPlugin));

        #[cfg(debug_assertions)]
        {
            app.add_plugins(LogDiagnosticsPlugin::default());
        }
    }
}
