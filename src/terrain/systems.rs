use crate::core::state::ViewerState;
use crate::helpers::mesh::terrain_mesh;
use crate::helpers::texture::{albedo_pixels, normal_pixels, rgba_image};
use crate::terrain::components::{CommunityMarkerEntity, TerrainEntity};
use crate::terrain::events::*;
use crate::terrain::export::{GROUND_COLOR, export_textures};
use crate::terrain::resources::{CurrentTerrain, TerrainSettings};
use bevy::prelude::*;
use terraingen::error::Result as TerrainResult;
use terraingen::generator::{TerrainData, TerrainGenerator};
use terraingen::graph::{CommunityGraph, random_graph};
use terraingen::tools::generate_seed8;

pub fn request_initial_terrain(mut generate_events: MessageWriter<GenerateTerrainEvent>) {
    generate_events.write(GenerateTerrainEvent);
}

fn load_graph(settings: &TerrainSettings) -> TerrainResult<CommunityGraph> {
    match &settings.graph_path {
        Some(path) => {
            info!("Loading community graph from {}", path.display());
            CommunityGraph::load_from_file(path)
        }
        None => random_graph(settings.seed, settings.communities, settings.link_probability),
    }
}

pub fn generate_terrain_on_event(
    mut commands: Commands,
    mut events: MessageReader<GenerateTerrainEvent>,
    mut current: ResMut<CurrentTerrain>,
    mut next_state: ResMut<NextState<ViewerState>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    settings: Res<TerrainSettings>,
    terrain_entities: Query<Entity, Or<(With<TerrainEntity>, With<CommunityMarkerEntity>)>>,
) {
    // several requests in one frame still mean one rebuild
    if events.read().count() == 0 {
        return;
    }

    if let Err(err) = terraingen::reload_config() {
        warn!("Keeping previous terrain config: {}", err);
    }

    let generated = load_graph(&settings).and_then(|graph| {
        let terrain = TerrainGenerator::from_global_config().generate(&graph)?;
        Ok((graph, terrain))
    });
    let (graph, terrain) = match generated {
        Ok(result) => result,
        Err(err) => {
            error!("Terrain generation failed: {}", err);
            current.status = Some(format!("Generation failed: {}", err));
            return;
        }
    };

    for entity in terrain_entities.iter() {
        commands.entity(entity).despawn();
    }

    spawn_terrain(&mut commands, &mut meshes, &mut materials, &mut images, &terrain);
    spawn_markers(&mut commands, &mut meshes, &mut materials, &graph, &terrain, settings.show_markers);

    info!(
        "Terrain ready: {} communities, {} links, {} triangles",
        graph.nodes().len(),
        graph.links().len(),
        terrain.mesh.triangle_count()
    );
    current.status = Some(format!(
        "{} communities, {} links",
        graph.nodes().len(),
        graph.links().len()
    ));
    current.terrain = Some(terrain);
    next_state.set(ViewerState::Viewing);
}

fn spawn_terrain(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    images: &mut Assets<Image>,
    terrain: &TerrainData,
) {
    let use_normal_map = terrain.mesh_builder.use_normal_map;

    let colors = &terrain.node_color_raster;
    let albedo = rgba_image(
        colors.width(),
        colors.height(),
        albedo_pixels(colors, terrain.line_raster.as_ref(), GROUND_COLOR),
        true,
    );
    let normal_map = use_normal_map.then(|| {
        let normals = &terrain.normal_raster;
        images.add(rgba_image(
            normals.width(),
            normals.height(),
            normal_pixels(normals),
            false,
        ))
    });

    let material = materials.add(StandardMaterial {
        base_color_texture: Some(images.add(albedo)),
        normal_map_texture: normal_map,
        perceptual_roughness: 0.9,
        ..default()
    });

    commands.spawn((
        Mesh3d(meshes.add(terrain_mesh(&terrain.mesh, use_normal_map))),
        MeshMaterial3d(material),
        Transform::default(),
        TerrainEntity,
    ));
}

fn spawn_markers(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    graph: &CommunityGraph,
    terrain: &TerrainData,
    visible: bool,
) {
    let visibility = if visible {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };
    let min_radius = terrain.mesh_builder.mesh_size * 0.005;

    for marker in terrain.community_markers(graph) {
        let [r, g, b, a] = marker.color;
        commands.spawn((
            Mesh3d(meshes.add(Sphere::new((marker.radius * 0.1).max(min_radius)))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgba(r, g, b, a),
                ..default()
            })),
            Transform::from_translation(marker.position),
            visibility,
            CommunityMarkerEntity,
        ));
    }
}

pub fn handle_generate_new_seed(
    mut events: MessageReader<GenerateNewSeedEvent>,
    mut settings: ResMut<TerrainSettings>,
    mut generate_events: MessageWriter<GenerateTerrainEvent>,
) {
    for _ in events.read() {
        settings.set_user_seed(generate_seed8());
        generate_events.write(GenerateTerrainEvent);
    }
}

pub fn handle_marker_toggle(
    mut events: MessageReader<ToggleMarkersEvent>,
    mut markers: Query<&mut Visibility, With<CommunityMarkerEntity>>,
) {
    for event in events.read() {
        let visibility = if event.show_markers {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        for mut marker in markers.iter_mut() {
            *marker = visibility;
        }
    }
}

pub fn export_textures_on_event(
    mut events: MessageReader<ExportTexturesEvent>,
    mut current: ResMut<CurrentTerrain>,
    settings: Res<TerrainSettings>,
) {
    if events.read().count() == 0 {
        return;
    }
    let Some(terrain) = current.terrain.as_ref() else {
        warn!("Nothing to export yet");
        return;
    };

    let status = match export_textures(&settings.export_dir, terrain) {
        Ok(files) => {
            info!("Exported {} textures to {}", files.len(), settings.export_dir.display());
            format!("Exported textures to {}", settings.export_dir.display())
        }
        Err(err) => {
            error!("Texture export failed: {}", err);
            format!("Export failed: {}", err)
        }
    };
    current.status = Some(status);
}
