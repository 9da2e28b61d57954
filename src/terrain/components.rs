use bevy::prelude::*;

/// The terrain surface mesh
#[derive(Component)]
pub struct TerrainEntity;

/// Sphere standing on a community's peak
#[derive(Component)]
pub struct CommunityMarkerEntity;
