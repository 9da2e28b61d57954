use crate::bake::{link_line_raster, node_color_raster, rasterize_vertex_values, vertex_heights};
use crate::config::{TerrainGenConfig, get_config};
use crate::error::Result;
use crate::graph::CommunityGraph;
use crate::height_field::{FieldMaxes, HeightField};
use crate::mesh_data::{CurvedMeshBuilder, MeshData};
use crate::normals::synthesize_normals;
use crate::raster::Raster;
use crate::sampler::PointSampler;
use crate::triangulation::{FlatMesh, triangulate};
use glam::Vec3;
use log::debug;
use std::time::Instant;

/// Everything the renderer needs for one graph
#[derive(Debug, Clone)]
pub struct TerrainData {
    pub flat_mesh: FlatMesh,
    pub maxes: FieldMaxes,
    pub field: HeightField,
    /// Field value at every point of `flat_mesh`
    pub vertex_heights: Vec<f32>,
    pub mesh: MeshData,
    pub height_raster: Raster<f32>,
    pub normal_raster: Raster<[f32; 3]>,
    pub node_color_raster: Raster<[f32; 4]>,
    pub line_raster: Option<Raster<f32>>,
    pub mesh_builder: CurvedMeshBuilder,
}

/// Where a community sits on the finished terrain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommunityMarker {
    pub id: u32,
    pub position: Vec3,
    pub color: [f32; 4],
    /// Influence radius in world units
    pub radius: f32,
}

impl TerrainData {
    /// One marker per community, at its peak height on the curved surface
    pub fn community_markers(&self, graph: &CommunityGraph) -> Vec<CommunityMarker> {
        graph
            .nodes()
            .iter()
            .map(|node| CommunityMarker {
                id: node.id,
                position: self
                    .mesh_builder
                    .project(node.position, self.field.peak_height_for(node.size)),
                color: node.color,
                radius: self.field.radius_from_node_size(node.size) * self.mesh_builder.mesh_size,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    config: TerrainGenConfig,
}

impl TerrainGenerator {
    pub fn new(config: TerrainGenConfig) -> Self {
        Self { config }
    }

    /// Generator using the process-wide configuration
    pub fn from_global_config() -> Self {
        Self::new(get_config())
    }

    pub fn generate(&self, graph: &CommunityGraph) -> Result<TerrainData> {
        let started = Instant::now();
        let sampling = &self.config.sampling;
        let textures = &self.config.textures;

        let sampler = PointSampler::new(sampling.disc_points, sampling.ridge_subdivisions);
        let flat_mesh = triangulate(sampler.sample(graph))?;
        debug!("Sampling and triangulation took {:?}", started.elapsed());

        let maxes = FieldMaxes::from_graph(graph);
        let field = HeightField::with_maxes(&self.config.field, graph, maxes)?;
        let heights = vertex_heights(&flat_mesh, &field);

        let mesh_builder = CurvedMeshBuilder::from_config(&self.config.mesh);
        let mesh = mesh_builder.build(&flat_mesh, &heights)?;
        debug!("Field sampling and mesh took {:?}", started.elapsed());

        let resolution = textures.height_resolution;
        let height_raster = rasterize_vertex_values(&flat_mesh, &heights, resolution, resolution)?;
        let normal_raster = synthesize_normals(
            &height_raster,
            self.config.mesh.height_scale,
            textures.mesh_real_width,
            textures.normal_blur_radius,
        )?;

        let albedo = textures.albedo_resolution;
        let node_color_raster =
            node_color_raster(graph, &field, albedo, albedo, textures.node_color_radius_factor)?;
        let line_raster = if textures.bake_link_lines {
            Some(link_line_raster(
                graph,
                albedo,
                albedo,
                textures.line_intensity,
                textures.normal_blur_radius,
            )?)
        } else {
            None
        };

        debug!(
            "Generated terrain for {} communities and {} links in {:?}",
            graph.nodes().len(),
            graph.links().len(),
            started.elapsed()
        );

        Ok(TerrainData {
            flat_mesh,
            maxes,
            field,
            vertex_heights: heights,
            mesh,
            height_raster,
            normal_raster,
            node_color_raster,
            line_raster,
            mesh_builder,
        })
    }
}
