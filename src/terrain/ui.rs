use crate::terrain::events::*;
use crate::terrain::resources::{CurrentTerrain, TerrainSettings};
use bevy::app::AppExit;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

pub fn render_terrain_ui(
    mut contexts: EguiContexts,
    mut settings: ResMut<TerrainSettings>,
    current: Res<CurrentTerrain>,
    mut generate_events: MessageWriter<GenerateTerrainEvent>,
    mut new_seed_events: MessageWriter<GenerateNewSeedEvent>,
    mut marker_events: MessageWriter<ToggleMarkersEvent>,
    mut export_events: MessageWriter<ExportTexturesEvent>,
    mut app_exit_events: MessageWriter<AppExit>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::SidePanel::right("terrain_panel")
        .default_width(300.0)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Community Terrain");
                ui.add_space(10.0);

                match settings.graph_path.clone() {
                    Some(path) => {
                        ui.label(format!("Graph file: {}", path.display()));
                    }
                    None => {
                        ui.label("Random graph");
                        ui.horizontal(|ui| {
                            ui.label(format!("Seed: {}", settings.user_seed));
                            if ui.button("New seed").clicked() {
                                new_seed_events.write(GenerateNewSeedEvent);
                            }
                        });
                        ui.add(
                            egui::Slider::new(&mut settings.communities, 2..=40).text("Communities"),
                        );
                        ui.add(
                            egui::Slider::new(&mut settings.link_probability, 0.0..=1.0)
                                .text("Link probability"),
                        );
                    }
                }

                ui.add_space(10.0);
                if ui.checkbox(&mut settings.show_markers, "Show communities").changed() {
                    marker_events.write(ToggleMarkersEvent {
                        show_markers: settings.show_markers,
                    });
                }

                ui.add_space(10.0);
                ui.separator();
                if ui
                    .button("Regenerate")
                    .on_hover_text("Reloads terraingen_config.toml and rebuilds the terrain")
                    .clicked()
                {
                    generate_events.write(GenerateTerrainEvent);
                }
                if ui.button("Export textures").clicked() {
                    export_events.write(ExportTexturesEvent);
                }

                if let Some(terrain) = &current.terrain {
                    ui.add_space(10.0);
                    ui.separator();
                    ui.label(format!("Vertices: {}", terrain.mesh.vertex_count()));
                    ui.label(format!("Triangles: {}", terrain.mesh.triangle_count()));
                    ui.label(format!("Largest community: {}", terrain.maxes.max_node_size));
                    ui.label(format!("Heaviest link: {}", terrain.maxes.max_link_weight));
                }

                if let Some(status) = &current.status {
                    ui.add_space(10.0);
                    ui.label(status);
                }

                ui.add_space(20.0);
                if ui.button("Quit").clicked() {
                    app_exit_events.write(AppExit::Success);
                }
            });
        });
}
