use bevy::prelude::Resource;
use std::path::PathBuf;
use terraingen::generator::TerrainData;
use terraingen::tools::{expand_seed64, generate_seed8};

pub const DEFAULT_EXPORT_DIR: &str = "terrain_export";

#[derive(Resource, Clone)]
pub struct TerrainSettings {
    /// Graph file given on the command line; a seeded random graph is used otherwise
    pub graph_path: Option<PathBuf>,
    pub user_seed: u32,
    pub seed: u64,
    pub communities: usize,
    pub link_probability: f64,
    pub show_markers: bool,
    pub export_dir: PathBuf,
}

impl TerrainSettings {
    pub fn set_user_seed(&mut self, user_seed: u32) {
        self.user_seed = user_seed;
        self.seed = expand_seed64(user_seed);
    }
}

impl Default for TerrainSettings {
    fn default() -> Self {
        let seed_8 = generate_seed8();
        Self {
            graph_path: std::env::args().nth(1).map(PathBuf::from),
            user_seed: seed_8,
            seed: expand_seed64(seed_8),
            communities: 8,
            link_probability: 0.3,
            show_markers: true,
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
        }
    }
}

#[derive(Resource, Default)]
pub struct CurrentTerrain {
    pub terrain: Option<TerrainData>,
    /// Last message worth showing in the panel, errors included
    pub status: Option<String>,
}
