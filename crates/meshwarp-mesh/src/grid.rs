use glam::Vec2;

use crate::error::MeshError;

/// A single mesh vertex in its rest pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Undeformed position in normalized `[-1, 1]` space.
    pub rest: Vec2,
    /// Texture coordinate in `[0, 1]`, with `v` following image row order.
    pub tex_coord: Vec2,
}

/// Uniform triangulated grid covering the normalized `[-1, 1]` domain.
///
/// The grid has `resolution + 1` vertices per side stored row-major, so the
/// vertex at grid position `(x, y)` lives at index `y * (resolution + 1) + x`.
/// Rest positions, texture coordinates and indices are fixed at creation;
/// deformed positions are owned by whoever runs the deformation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMesh {
    resolution: u32,
    rest: Vec<Vec2>,
    tex_coords: Vec<Vec2>,
    indices: Vec<u32>,
}

impl GridMesh {
    /// Largest resolution whose vertex indices still fit in `u32`.
    pub const MAX_RESOLUTION: u32 = 65_534;

    /// Check that `resolution` is in `1..=MAX_RESOLUTION`.
    pub fn validate_resolution(resolution: u32) -> Result<(), MeshError> {
        if resolution == 0 || resolution > Self::MAX_RESOLUTION {
            return Err(MeshError::InvalidResolution(resolution));
        }
        Ok(())
    }

    /// Build the rest pose for a grid with `resolution` cells per side.
    ///
    /// For `x, y` in `[0, resolution]` the vertex rest position is
    /// `((x / r) * 2 - 1, (y / r) * 2 - 1)` and its texture coordinate is
    /// `(x / r, 1 - y / r)`. Each cell emits the triangles
    /// `(top_left, bottom_left, top_right)` and
    /// `(top_right, bottom_left, bottom_right)` in that order.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidResolution`] if `resolution` is zero or
    /// above [`GridMesh::MAX_RESOLUTION`].
    ///
    /// # Example
    ///
    /// ```
    /// use meshwarp_mesh::GridMesh;
    ///
    /// let mesh = GridMesh::new(2).unwrap();
    /// assert_eq!(mesh.num_vertices(), 9);
    /// assert_eq!(mesh.indices().len(), 24);
    /// ```
    pub fn new(resolution: u32) -> Result<Self, MeshError> {
        Self::validate_resolution(resolution)?;

        let side = resolution as usize + 1;
        let r = resolution as f32;

        let mut rest = Vec::with_capacity(side * side);
        let mut tex_coords = Vec::with_capacity(side * side);
        for y in 0..side {
            for x in 0..side {
                let u = x as f32 / r;
                let v = y as f32 / r;
                rest.push(Vec2::new(u * 2.0 - 1.0, v * 2.0 - 1.0));
                // flip v so the texture rows follow image order
                tex_coords.push(Vec2::new(u, 1.0 - v));
            }
        }

        let cells = resolution as usize;
        let mut indices = Vec::with_capacity(cells * cells * 6);
        for y in 0..cells {
            for x in 0..cells {
                let top_left = (y * side + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((y + 1) * side + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[top_left, bottom_left, top_right]);
                indices.extend_from_slice(&[top_right, bottom_left, bottom_right]);
            }
        }

        Ok(Self {
            resolution,
            rest,
            tex_coords,
            indices,
        })
    }

    /// Number of cells per side.
    #[inline]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Number of vertices per side, `resolution + 1`.
    #[inline]
    pub fn side(&self) -> usize {
        self.resolution as usize + 1
    }

    /// Total number of vertices, `(resolution + 1)^2`.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.rest.len()
    }

    /// Number of triangles, `2 * resolution^2`.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Rest positions in row-major order.
    #[inline]
    pub fn rest_positions(&self) -> &[Vec2] {
        &self.rest
    }

    /// Texture coordinates in row-major order.
    #[inline]
    pub fn tex_coords(&self) -> &[Vec2] {
        &self.tex_coords
    }

    /// Triangle list indices, three per triangle.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Flattened index of the vertex at grid position `(x, y)`.
    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        let side = self.side();
        (x < side && y < side).then(|| y * side + x)
    }

    /// Rest pose data of a single vertex.
    pub fn vertex(&self, index: usize) -> Option<Vertex> {
        Some(Vertex {
            rest: *self.rest.get(index)?,
            tex_coord: *self.tex_coords.get(index)?,
        })
    }

    /// Iterate over the triangles as index triplets.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}
