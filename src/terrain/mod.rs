pub mod components;
pub mod events;
pub mod export;
pub mod resources;
pub mod systems;
pub mod ui;

use crate::terrain::events::*;
use crate::terrain::resources::*;
use crate::terrain::systems::*;
use crate::terrain::ui::render_terrain_ui;
use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

pub struct TerrainPlugin;

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<GenerateTerrainEvent>()
            .add_message::<GenerateNewSeedEvent>()
            .add_message::<ToggleMarkersEvent>()
            .add_message::<ExportTexturesEvent>()
            .init_resource::<TerrainSettings>()
            .init_resource::<CurrentTerrain>()
            .add_systems(Startup, request_initial_terrain)
            .add_systems(EguiPrimaryContextPass, render_terrain_ui)
            .add_systems(
                Update,
                (
                    handle_generate_new_seed,
                    generate_terrain_on_event,
                    handle_marker_toggle,
                    export_textures_on_event,
                )
                    .chain(),
            );
    }
}
