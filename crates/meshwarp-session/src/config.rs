use meshwarp_deform::{ExecutionStrategy, Falloff};
use meshwarp_mesh::GridMesh;

use crate::error::SessionError;

/// Parameters of an interactive warp session.
///
/// Missing fields take their default value when deserialized, so a partial
/// JSON object is a valid configuration.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of grid cells per side of the mesh built on image load.
    pub mesh_resolution: u32,
    /// Rest-space distance at which an anchor stops having any influence.
    pub max_influence_distance: f32,
    /// Pointer distance in pixels within which an anchor can be grabbed.
    pub hit_radius_px: f32,
    /// How the per-vertex loops are executed.
    pub execution: ExecutionStrategy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mesh_resolution: 20,
            max_influence_distance: Falloff::DEFAULT_MAX_INFLUENCE_DISTANCE,
            hit_radius_px: 10.0,
            execution: ExecutionStrategy::Serial,
        }
    }
}

impl SessionConfig {
    /// Check every field.
    ///
    /// # Errors
    ///
    /// Fails on a zero or oversized mesh resolution, an invalid falloff
    /// distance or a negative hit radius.
    pub fn validate(&self) -> Result<(), SessionError> {
        GridMesh::validate_resolution(self.mesh_resolution)?;
        self.falloff().validate()?;
        if !self.hit_radius_px.is_finite() || self.hit_radius_px < 0.0 {
            return Err(SessionError::InvalidConfig(format!(
                "hit_radius_px must be finite and non-negative, got {}",
                self.hit_radius_px
            )));
        }
        Ok(())
    }

    /// The falloff described by this configuration.
    pub fn falloff(&self) -> Falloff {
        Falloff {
            max_influence_distance: self.max_influence_distance,
        }
    }
}
