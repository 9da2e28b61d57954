use bevy::prelude::*;

/// Rebuild the graph from the current settings and regenerate the terrain
#[derive(Message)]
pub struct GenerateTerrainEvent;

#[derive(Message)]
pub struct GenerateNewSeedEvent;

#[derive(Message)]
pub struct ToggleMarkersEvent {
    pub show_markers: bool,
}

#[derive(Message)]
pub struct ExportTexturesEvent;
