pub mod mesh;
pub mod texture;
