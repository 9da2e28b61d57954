use crate::helpers::texture::{albedo_pixels, height_pixels, normal_pixels};
use image::{ExtendedColorType, ImageResult};
use std::path::{Path, PathBuf};
use terraingen::generator::TerrainData;

pub const GROUND_COLOR: [f32; 3] = [0.32, 0.36, 0.3];

/// Writes the height, normal and albedo textures as PNG files into `dir`
pub fn export_textures(dir: &Path, terrain: &TerrainData) -> ImageResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let height = &terrain.height_raster;
    let normals = &terrain.normal_raster;
    let colors = &terrain.node_color_raster;

    let files = [
        (
            "height.png",
            height_pixels(height),
            height.width(),
            height.height(),
            ExtendedColorType::L8,
        ),
        (
            "normal.png",
            normal_pixels(normals),
            normals.width(),
            normals.height(),
            ExtendedColorType::Rgba8,
        ),
        (
            "albedo.png",
            albedo_pixels(colors, terrain.line_raster.as_ref(), GROUND_COLOR),
            colors.width(),
            colors.height(),
            ExtendedColorType::Rgba8,
        ),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, pixels, width, rows, color_type) in files {
        let path = dir.join(name);
        image::save_buffer(&path, &pixels, width as u32, rows as u32, color_type)?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use terraingen::config::TerrainGenConfig;
    use terraingen::generator::TerrainGenerator;
    use terraingen::graph::random_graph;

    #[test]
    fn test_export_writes_readable_pngs() {
        let mut config = TerrainGenConfig::default();
        config.sampling.disc_points = 200;
        config.textures.height_resolution = 16;
        config.textures.albedo_resolution = 24;
        let graph = random_graph(5, 4, 0.5).unwrap();
        let terrain = TerrainGenerator::new(config).generate(&graph).unwrap();

        let dir = std::env::temp_dir().join(format!("graphscape_export_{}", std::process::id()));
        let written = export_textures(&dir, &terrain).unwrap();

        assert_eq!(written.len(), 3);
        let albedo = image::open(dir.join("albedo.png")).unwrap();
        assert_eq!((albedo.width(), albedo.height()), (24, 24));
        let height = image::open(dir.join("height.png")).unwrap();
        assert_eq!((height.width(), height.height()), (16, 16));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
