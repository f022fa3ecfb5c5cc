#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// global affine transform stage.
pub mod affine;

/// fixed point constraint stage.
pub mod constraint;

/// Error types for the deformation module.
pub mod error;

/// module containing parallelization utilities.
pub mod parallel;

/// deformation pipeline chaining the stages.
pub mod pipeline;

pub use crate::affine::{apply_affine, apply_affine_into, AffineStage, TransformParams};
pub use crate::constraint::{apply_constraints, nearest_vertex, Falloff};
pub use crate::error::DeformError;
pub use crate::parallel::ExecutionStrategy;
pub use crate::pipeline::{deform, Deformer};
