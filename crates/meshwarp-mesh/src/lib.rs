#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the mesh module.
pub mod error;

/// uniform grid mesh over the normalized image domain.
pub mod grid;

/// render surface size and pixel to normalized conversions.
pub mod surface;

pub use crate::error::MeshError;
pub use crate::grid::{GridMesh, Vertex};
pub use crate::surface::SurfaceSize;

pub use glam::Vec2;
