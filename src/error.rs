//! Error types for terrain generation

use thiserror::Error;

/// Errors that can occur during terrain generation or queries
///
/// Geometric trouble inside the pipeline (degenerate cells, missing corner
/// lookups, a river that stops early) is never reported here; those cases are
/// skipped locally and only show up as small gaps in the output mesh.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Generation failed due to geometry issues
    #[error("generation failed: {0}")]
    GenerationFailed(String),
    /// Requested area ID does not exist
    #[error("area not found: {0}")]
    AreaNotFound(usize),
    /// A subdivision vertex was used before identities were assigned
    #[error("vertex {0} has no identity; assign vertex ids before building areas")]
    UnstampedVertex(usize),
}

/// Result type alias for terrain operations
pub type Result<T> = std::result::Result<T, TerrainError>;
