pub use crate::config::{HeightFieldConfig, MeshConfig, SamplingConfig, TerrainGenConfig, TextureConfig};
pub use crate::curve::{Interpolation, ResponseCurve};
pub use crate::error::{Result, TerrainError};
pub use crate::generator::{CommunityMarker, TerrainData, TerrainGenerator};
pub use crate::graph::{CommunityGraph, CommunityLink, CommunityNode, GraphFile};
pub use crate::height_field::{FieldMaxes, HeightField};
pub use crate::mesh_data::{CurvedMeshBuilder, MeshData};
pub use crate::raster::Raster;
