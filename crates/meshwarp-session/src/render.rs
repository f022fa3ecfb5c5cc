use glam::Vec2;
use meshwarp_mesh::SurfaceSize;

use crate::anchor::Anchor;

/// Everything a renderer needs to draw the warped image for one pass.
///
/// The triangulation and texture coordinates never change for a loaded
/// image; the positions are rewritten on every pass.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct Frame<'a> {
    /// Size of the render surface in pixels.
    pub surface: SurfaceSize,
    /// Triangle list indices, three per triangle.
    pub indices: &'a [u32],
    /// Texture coordinates, one per vertex.
    pub tex_coords: &'a [Vec2],
    /// Deformed positions in normalized space, one per vertex.
    pub positions: &'a [Vec2],
    /// Anchors to draw as markers.
    pub anchors: &'a [Anchor],
}

impl Frame<'_> {
    /// Number of triangles to draw.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleave positions and texture coordinates as `[x, y, u, v]` per vertex.
    pub fn interleaved(&self) -> Vec<f32> {
        self.positions
            .iter()
            .zip(self.tex_coords)
            .flat_map(|(p, t)| [p.x, p.y, t.x, t.y])
            .collect()
    }

    /// Deformed positions mapped back to surface pixels.
    pub fn pixel_positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.positions
            .iter()
            .map(|p| self.surface.normalized_to_pixel(*p))
    }
}

/// A collaborator able to draw a [`Frame`].
pub trait MeshRenderer {
    /// Error reported by the renderer.
    type Error;

    /// Draw the frame.
    fn draw(&mut self, frame: &Frame<'_>) -> Result<(), Self::Error>;
}
