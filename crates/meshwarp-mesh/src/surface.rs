use glam::Vec2;

use crate::error::MeshError;

/// Render surface size in pixels
///
/// The surface is the pixel grid the warped mesh is drawn into. Pixel
/// coordinates have their origin at the top-left corner with `y` growing
/// downwards, while the normalized mesh space spans `[-1, 1]` with `y`
/// growing upwards.
///
/// # Examples
///
/// ```
/// use meshwarp_mesh::SurfaceSize;
///
/// let surface = SurfaceSize {
///   width: 640,
///   height: 480,
/// };
///
/// assert_eq!(surface.width, 640);
/// assert_eq!(surface.height, 480);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    /// Width of the surface in pixels
    pub width: usize,
    /// Height of the surface in pixels
    pub height: usize,
}

impl std::fmt::Display for SurfaceSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "SurfaceSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for SurfaceSize {
    fn from(size: [usize; 2]) -> Self {
        SurfaceSize {
            width: size[0],
            height: size[1],
        }
    }
}

impl SurfaceSize {
    /// Create a surface size, rejecting zero dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidSurfaceSize`] if the width or height is zero.
    pub fn new(width: usize, height: usize) -> Result<Self, MeshError> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    /// Check that both dimensions are non-zero.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.width == 0 || self.height == 0 {
            return Err(MeshError::InvalidSurfaceSize(*self));
        }
        Ok(())
    }

    /// Half of the surface extent in pixels, i.e. the number of pixels that
    /// map to one normalized unit along each axis.
    #[inline]
    pub fn half_extent(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    /// Convert a pixel position into normalized mesh coordinates.
    ///
    /// `nx = (px / w) * 2 - 1` and `ny = -((py / h) * 2 - 1)`.
    ///
    /// # Example
    ///
    /// ```
    /// use meshwarp_mesh::{SurfaceSize, Vec2};
    ///
    /// let surface = SurfaceSize { width: 100, height: 100 };
    /// let p = surface.pixel_to_normalized(Vec2::new(0.0, 0.0));
    /// assert_eq!(p, Vec2::new(-1.0, 1.0));
    /// ```
    #[inline]
    pub fn pixel_to_normalized(&self, pixel: Vec2) -> Vec2 {
        let nx = (pixel.x / self.width as f32) * 2.0 - 1.0;
        let ny = -((pixel.y / self.height as f32) * 2.0 - 1.0);
        Vec2::new(nx, ny)
    }

    /// Convert a normalized mesh position back into pixel coordinates.
    #[inline]
    pub fn normalized_to_pixel(&self, normalized: Vec2) -> Vec2 {
        let px = (normalized.x + 1.0) / 2.0 * self.width as f32;
        let py = (1.0 - normalized.y) / 2.0 * self.height as f32;
        Vec2::new(px, py)
    }

    /// Convert a pixel displacement into a normalized displacement.
    ///
    /// The vertical component flips sign since pixel rows grow downwards.
    #[inline]
    pub fn pixel_offset_to_normalized(&self, offset: Vec2) -> Vec2 {
        let half = self.half_extent();
        Vec2::new(offset.x / half.x, -offset.y / half.y)
    }
}
