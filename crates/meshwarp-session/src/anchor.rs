use glam::Vec2;
use meshwarp_mesh::SurfaceSize;

/// A fixed point pinned on the render surface.
///
/// The pixel position is the source of truth; the normalized position is
/// derived from it and refreshed whenever the pixel position or the surface
/// size changes. Anchors are only built through [`Anchor::new`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Anchor {
    pixel: Vec2,
    normalized: Vec2,
}

impl Anchor {
    /// Create an anchor at a pixel position of `surface`.
    pub fn new(pixel: Vec2, surface: SurfaceSize) -> Self {
        Self {
            pixel,
            normalized: surface.pixel_to_normalized(pixel),
        }
    }

    /// Position in surface pixels.
    #[inline]
    pub fn pixel(&self) -> Vec2 {
        self.pixel
    }

    /// Position in normalized mesh coordinates.
    #[inline]
    pub fn normalized(&self) -> Vec2 {
        self.normalized
    }

    /// Move the anchor to a new pixel position.
    pub fn set_pixel(&mut self, pixel: Vec2, surface: SurfaceSize) {
        self.pixel = pixel;
        self.resync(surface);
    }

    /// Recompute the normalized position after a surface resize.
    pub fn resync(&mut self, surface: SurfaceSize) {
        self.normalized = surface.pixel_to_normalized(self.pixel);
    }

    /// Whether `pointer` lies within `radius` pixels of the anchor.
    #[inline]
    pub fn is_hit(&self, pointer: Vec2, radius: f32) -> bool {
        self.pixel.distance(pointer) <= radius
    }

    /// Display label for the anchor at list position `index`.
    ///
    /// Numbering starts at one and pixel coordinates are rounded.
    ///
    /// # Example
    ///
    /// ```
    /// use meshwarp_mesh::{SurfaceSize, Vec2};
    /// use meshwarp_session::Anchor;
    ///
    /// let surface = SurfaceSize { width: 100, height: 100 };
    /// let anchor = Anchor::new(Vec2::new(12.4, 80.6), surface);
    /// assert_eq!(anchor.label(0), "Point 1: (12, 81)");
    /// ```
    pub fn label(&self, index: usize) -> String {
        format!(
            "Point {}: ({}, {})",
            index + 1,
            self.pixel.x.round() as i64,
            self.pixel.y.round() as i64
        )
    }
}

/// Index of the first anchor within `radius` pixels of `pointer`.
pub fn hit_test(anchors: &[Anchor], pointer: Vec2, radius: f32) -> Option<usize> {
    anchors.iter().position(|a| a.is_hit(pointer, radius))
}
