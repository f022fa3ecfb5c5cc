use crate::surface::SurfaceSize;

/// An error type for the mesh module.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// Error when the grid resolution is zero or too large for `u32` indices.
    #[error("Mesh resolution must be between 1 and 65534, got {0}")]
    InvalidResolution(u32),

    /// Error when the render surface has a zero dimension.
    #[error("Invalid surface size: {0}")]
    InvalidSurfaceSize(SurfaceSize),
}
