/// Errors raised at the boundaries of the terrain pipeline stages
#[derive(thiserror::Error, Debug)]
pub enum TerrainError {
    #[error("triangulation needs at least 3 distinct points, got {0}")]
    TooFewPoints(usize),

    #[error("triangulation produced no triangles ({0} points, all collinear?)")]
    DegenerateTriangulation(usize),

    #[error("invalid community node {id}: {reason}")]
    InvalidNode { id: u32, reason: String },

    // `source` is reserved by thiserror for the error cause
    #[error("invalid link {source_id}-{target_id}: {reason}")]
    InvalidLink {
        source_id: u32,
        target_id: u32,
        reason: String,
    },

    #[error("link references unknown community node {0}")]
    UnknownNode(u32),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

impl TerrainError {
    pub fn invalid_parameter<T: ToString>(msg: T) -> Self {
        TerrainError::InvalidParameter(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TerrainError>;
