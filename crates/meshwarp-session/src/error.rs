use meshwarp_deform::DeformError;
use meshwarp_mesh::MeshError;

/// An error type for the session module.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// The command needs a loaded image.
    #[error("No image loaded")]
    NoImageLoaded,

    /// The anchor index does not exist.
    #[error("Anchor index {index} out of range for {len} anchors")]
    AnchorIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of anchors.
        len: usize,
    },

    /// The loaded image has a zero dimension.
    #[error("Invalid image size: {width}x{height}")]
    InvalidImageSize {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// The session configuration is not usable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error coming from the mesh or surface description.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Error coming from the deformation pipeline.
    #[error(transparent)]
    Deform(#[from] DeformError),
}
