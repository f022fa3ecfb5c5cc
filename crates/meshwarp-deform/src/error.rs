use meshwarp_mesh::MeshError;

/// Errors that can occur while deforming a mesh.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DeformError {
    /// A transform parameter is NaN or infinite.
    #[error("Transform parameter `{name}` must be finite, got {value}")]
    NonFiniteParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// The pixel translation overflows once converted to normalized units.
    #[error("Normalized translation {0} is not finite")]
    NonFiniteTranslation(glam::Vec2),

    /// A finite transform still overflowed while moving a vertex.
    #[error("Transform overflows at vertex {index}, got {position}")]
    NonFinitePosition {
        /// Index of the first vertex that overflowed.
        index: usize,
        /// The overflowed position.
        position: glam::Vec2,
    },

    /// An anchor position is NaN or infinite in normalized units.
    #[error("Anchor {index} must be finite in normalized space, got {position}")]
    NonFiniteAnchor {
        /// Index of the anchor.
        index: usize,
        /// The rejected normalized position.
        position: glam::Vec2,
    },

    /// The falloff distance is not a positive finite number.
    #[error("Max influence distance must be finite and positive, got {0}")]
    InvalidFalloffDistance(f32),

    /// Two buffers that must be parallel have different lengths.
    #[error("Mismatched buffer lengths: {left_name} ({left_len}) != {right_name} ({right_len})")]
    LengthMismatch {
        /// Name of the first buffer.
        left_name: &'static str,
        /// Length of the first buffer.
        left_len: usize,
        /// Name of the second buffer.
        right_name: &'static str,
        /// Length of the second buffer.
        right_len: usize,
    },

    /// Error coming from the mesh or surface description.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

pub(crate) fn ensure_same_len(
    left_name: &'static str,
    left_len: usize,
    right_name: &'static str,
    right_len: usize,
) -> Result<(), DeformError> {
    if left_len != right_len {
        return Err(DeformError::LengthMismatch {
            left_name,
            left_len,
            right_name,
            right_len,
        });
    }
    Ok(())
}
