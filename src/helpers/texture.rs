use bevy::asset::RenderAssetUsages;
use bevy::image::Image;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use terraingen::raster::Raster;

pub fn unit_to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Opaque RGBA8 albedo: community colours over `ground`, link lines lightening towards white
pub fn albedo_pixels(colors: &Raster<[f32; 4]>, lines: Option<&Raster<f32>>, ground: [f32; 3]) -> Vec<u8> {
    let lines = lines.filter(|l| l.width() == colors.width() && l.height() == colors.height());

    let mut pixels = Vec::with_capacity(colors.data().len() * 4);
    for (i, color) in colors.data().iter().enumerate() {
        let alpha = color[3];
        let line = lines.map_or(0.0, |l| l.data()[i].clamp(0.0, 1.0));
        for c in 0..3 {
            let base = color[c] * alpha + ground[c] * (1.0 - alpha);
            pixels.push(unit_to_byte(base + (1.0 - base) * line));
        }
        pixels.push(255);
    }
    pixels
}

pub fn normal_pixels(normals: &Raster<[f32; 3]>) -> Vec<u8> {
    normals
        .data()
        .iter()
        .flat_map(|n| [unit_to_byte(n[0]), unit_to_byte(n[1]), unit_to_byte(n[2]), 255])
        .collect()
}

pub fn height_pixels(heights: &Raster<f32>) -> Vec<u8> {
    heights.data().iter().map(|&h| unit_to_byte(h)).collect()
}

/// GPU image from tightly packed RGBA8 texels
pub fn rgba_image(width: usize, height: usize, pixels: Vec<u8>, srgb: bool) -> Image {
    let format = if srgb {
        TextureFormat::Rgba8UnormSrgb
    } else {
        TextureFormat::Rgba8Unorm
    };
    Image::new(
        Extent3d {
            width: width as u32,
            height: height as u32,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        pixels,
        format,
        RenderAssetUsages::default(),
    )
}
