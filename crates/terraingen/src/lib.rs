pub mod bake;
pub mod blur;
pub mod config;
pub mod constants;
pub mod curve;
pub mod error;
pub mod generator;
pub mod graph;
pub mod height_field;
pub mod mesh_data;
pub mod normals;
pub mod prelude;
pub mod raster;
pub mod sampler;
pub mod tools;
pub mod triangulation;

pub use config::{get_config, reload_config};
