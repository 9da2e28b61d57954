use crate::curve::ResponseCurve;
use crate::error::Result;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

pub const CONFIG_FILE: &str = "terraingen_config.toml";

static CONFIG: OnceLock<Mutex<TerrainGenConfig>> = OnceLock::new();

/// Get a copy of the current configuration, loading from file if not already loaded.
///
/// A missing or broken config file falls back to the defaults.
pub fn get_config() -> TerrainGenConfig {
    let config_mutex = CONFIG.get_or_init(|| Mutex::new(load_or_default(CONFIG_FILE)));
    match config_mutex.lock() {
        Ok(config) => config.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

pub fn reload_config() -> Result<()> {
    reload_config_from_file(CONFIG_FILE)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainGenConfig {
    pub sampling: SamplingConfig,
    pub field: HeightFieldConfig,
    pub mesh: MeshConfig,
    pub textures: TextureConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Points in the sunflower disc fill
    pub disc_points: usize,
    /// Ridge points per unit of link length
    pub ridge_subdivisions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightFieldConfig {
    /// Influence radius of the largest community, in field units
    pub falloff_distance: f32,
    pub falloff_shape: ResponseCurve,
    pub peak_height: ResponseCurve,
    pub slack: ResponseCurve,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    pub mesh_size: f32,
    pub height_scale: f32,
    pub curvature_radius: f32,
    pub use_normal_map: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureConfig {
    pub height_resolution: usize,
    pub albedo_resolution: usize,
    /// Real width of the terrain the normal map is baked for
    pub mesh_real_width: f32,
    pub normal_blur_radius: f32,
    /// Node colour discs are drawn at this fraction of the node's influence radius
    pub node_color_radius_factor: f32,
    pub bake_link_lines: bool,
    pub line_intensity: f32,
}

impl Default for HeightFieldConfig {
    fn default() -> Self {
        Self {
            falloff_distance: 0.3,
            falloff_shape: ResponseCurve::identity(),
            peak_height: ResponseCurve::identity(),
            slack: ResponseCurve::linear(0.0, 0.5, 1.0, 1.0),
        }
    }
}

impl Default for TerrainGenConfig {
    fn default() -> Self {
        Self {
            sampling: SamplingConfig {
                disc_points: 2000,
                ridge_subdivisions: 50,
            },
            field: HeightFieldConfig::default(),
            mesh: MeshConfig {
                mesh_size: 1.0,
                height_scale: 0.25,
                curvature_radius: 100.0,
                use_normal_map: false,
            },
            textures: TextureConfig {
                height_resolution: 480,
                albedo_resolution: 1280,
                mesh_real_width: 81.0,
                normal_blur_radius: 1.0,
                node_color_radius_factor: 0.8,
                bake_link_lines: false,
                line_intensity: 0.2,
            },
        }
    }
}

impl TerrainGenConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TerrainGenConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn load_or_default(path: &str) -> TerrainGenConfig {
    match TerrainGenConfig::load_from_file(path) {
        Ok(config) => config,
        Err(err) => {
            warn!("Could not load {}: {}. Using default terrain config", path, err);
            TerrainGenConfig::default()
        }
    }
}

fn reload_config_from_file(path: &str) -> Result<()> {
    let new_config = TerrainGenConfig::load_from_file(path)?;

    let config_mutex = CONFIG.get_or_init(|| Mutex::new(new_config.clone()));
    match config_mutex.lock() {
        Ok(mut config) => *config = new_config,
        Err(poisoned) => *poisoned.into_inner() = new_config,
    }
    Ok(())
}
