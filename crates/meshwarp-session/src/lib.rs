#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// fixed point anchors placed on the surface.
pub mod anchor;

/// commands accepted by the session.
pub mod command;

/// session configuration.
pub mod config;

/// Error types for the session module.
pub mod error;

/// fitting the render surface to a loaded image.
pub mod layout;

/// boundary with the rendering collaborator.
pub mod render;

/// the session state object.
pub mod session;

pub use crate::anchor::{hit_test, Anchor};
pub use crate::command::Command;
pub use crate::config::SessionConfig;
pub use crate::error::SessionError;
pub use crate::layout::{fit_surface, ImageInfo};
pub use crate::render::{Frame, MeshRenderer};
pub use crate::session::Session;
