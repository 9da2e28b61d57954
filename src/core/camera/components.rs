use bevy::prelude::*;

#[derive(Component, Reflect, Default)]
#[reflect(Component)]
pub struct MainCamera;

/// Free-fly tuning, scaled to the terrain so the controls feel the same at any mesh size
#[derive(Component, Reflect, Clone, Copy)]
#[reflect(Component)]
pub struct FlySettings {
    pub speed: f32,
    pub sprint_multiplier: f32,
    pub look_sensitivity: f32,
    pub zoom_step: f32,
}

impl FlySettings {
    pub fn for_terrain(mesh_size: f32) -> Self {
        Self {
            speed: mesh_size,
            sprint_multiplier: 5.0,
            look_sensitivity: 0.002,
            zoom_step: mesh_size * 0.1,
        }
    }
}

impl Default for FlySettings {
    fn default() -> Self {
        Self::for_terrain(1.0)
    }
}
