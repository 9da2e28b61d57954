use glam::Vec2;
use terraingen::bake::{height_raster, node_color_raster};
use terraingen::prelude::*;
use terraingen::raster::{field_to_texel, texel_to_field};

const GRAPH: &str = r#"
[[nodes]]
id = 1
position = [-0.4, -0.3]
size = 8.0
color = [0.9, 0.2, 0.2, 1.0]

[[nodes]]
id = 2
position = [0.4, 0.3]
size = 4.0
color = [0.2, 0.4, 0.9, 1.0]

[[nodes]]
id = 3
position = [0.3, -0.5]
size = 2.0

[[links]]
source = 1
target = 2
weight = 6.0
"#;

fn config() -> TerrainGenConfig {
    let mut config = TerrainGenConfig::default();
    config.sampling.disc_points = 600;
    config.sampling.ridge_subdivisions = 20;
    config.textures.height_resolution = 64;
    config.textures.albedo_resolution = 64;
    config
}

#[test]
fn test_graph_file_to_terrain() {
    let graph = CommunityGraph::from_toml_str(GRAPH).unwrap();
    assert!(graph.is_isolated(3));

    let terrain = TerrainGenerator::new(config()).generate(&graph).unwrap();

    let points = terrain.flat_mesh.points.len() as u32;
    assert!(terrain.mesh.indices.iter().all(|&i| i < points));
    assert!(terrain.vertex_heights.iter().all(|&h| h >= 0.0));

    let corners = [(0, 0), (63, 0), (0, 63), (63, 63)];
    for (x, y) in corners {
        assert_eq!(terrain.normal_raster.get(x, y), [0.5, 1.0, 0.5]);
    }
}

#[test]
fn test_terrain_rises_at_communities() {
    let graph = CommunityGraph::from_toml_str(GRAPH).unwrap();
    let terrain = TerrainGenerator::new(config()).generate(&graph).unwrap();

    let field = &terrain.field;
    for node in graph.nodes() {
        assert!(field.max_weight_at(node.position) >= 0.01);
    }
    assert_eq!(field.max_weight_at(Vec2::new(-0.95, 0.9)), 0.0);

    // sample the height raster at the largest community
    let big = Vec2::new(-0.4, -0.3);
    let x = field_to_texel(big.x, 64) as usize;
    let y = field_to_texel(big.y, 64) as usize;
    let corner = terrain.height_raster.get(0, 63);
    assert!(terrain.height_raster.get(x, y) > corner);
}

#[test]
fn test_rasters_agree_with_standalone_bakers() {
    let graph = CommunityGraph::from_toml_str(GRAPH).unwrap();
    let terrain = TerrainGenerator::new(config()).generate(&graph).unwrap();

    let heights = height_raster(&terrain.flat_mesh, &terrain.field, 64, 64).unwrap();
    assert_eq!(heights, terrain.height_raster);

    let colors = node_color_raster(&graph, &terrain.field, 64, 64, 0.8).unwrap();
    assert_eq!(colors, terrain.node_color_raster);

    // the smallest community gets a visible disc too
    let small = graph.node(3).unwrap().position;
    let x = field_to_texel(small.x, 64) as usize;
    let y = field_to_texel(small.y, 64) as usize;
    assert!(colors.get(x, y)[3] > 0.0);
    assert!((texel_to_field(x, 64) - small.x).abs() < 2.0 / 64.0);
}

#[test]
fn test_shipped_config_and_demo_graph_load() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");

    let config = TerrainGenConfig::load_from_file(root.join(terraingen::config::CONFIG_FILE)).unwrap();
    assert_eq!(config, TerrainGenConfig::default());

    let graph = CommunityGraph::load_from_file(root.join("assets/demo_graph.toml")).unwrap();
    assert_eq!(graph.nodes().len(), 5);
    assert!(graph.is_isolated(5));
}
