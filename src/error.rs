use thiserror::Error;

/// Everything that can go wrong between the simulation, the scene and the host.
/// None of these are fatal, systems log them and try again next frame.
#[derive(Debug, Error)]
pub enum GlobeError {
    #[error("simulation is not ready")]
    NotReady,

    #[error("no satellite instance for index {index} ({meshes} spawned)")]
    IndexMismatch { index: usize, meshes: usize },

    #[error("degenerate orbital geometry")]
    DegenerateGeometry,

    #[error("invalid link url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
