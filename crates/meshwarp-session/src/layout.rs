use meshwarp_mesh::SurfaceSize;

use crate::error::SessionError;

/// Pixel dimensions of a decoded image.
///
/// The session never touches pixel data; the dimensions are enough to size
/// the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImageInfo {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl ImageInfo {
    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Largest surface with the image aspect ratio that fits in `container`.
///
/// The surface first takes the full container width; if the resulting height
/// overflows, it takes the full height instead. Dimensions are truncated to
/// whole pixels and never drop below one.
///
/// # Errors
///
/// Fails if the image or the container has a zero dimension.
///
/// # Example
///
/// ```
/// use meshwarp_mesh::SurfaceSize;
/// use meshwarp_session::{fit_surface, ImageInfo};
///
/// let image = ImageInfo { width: 1920, height: 1080 };
/// let container = SurfaceSize { width: 800, height: 800 };
/// let surface = fit_surface(image, container).unwrap();
/// assert_eq!(surface, SurfaceSize { width: 800, height: 450 });
/// ```
pub fn fit_surface(image: ImageInfo, container: SurfaceSize) -> Result<SurfaceSize, SessionError> {
    if image.width == 0 || image.height == 0 {
        return Err(SessionError::InvalidImageSize {
            width: image.width,
            height: image.height,
        });
    }
    container.validate()?;

    let aspect = image.aspect_ratio();
    let mut width = container.width as f64;
    let mut height = width / aspect;

    if height > container.height as f64 {
        height = container.height as f64;
        width = height * aspect;
    }

    Ok(SurfaceSize {
        width: (width as usize).max(1),
        height: (height as usize).max(1),
    })
}
