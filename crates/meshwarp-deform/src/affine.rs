use std::f32::consts::PI;

use glam::Vec2;
use meshwarp_mesh::SurfaceSize;

use crate::error::{ensure_same_len, DeformError};
use crate::parallel::{self, ExecutionStrategy};

/// Global transform applied to every mesh vertex.
///
/// Rotation is in degrees, scales are unitless multipliers and translations
/// are in surface pixels (positive `translate_y` moves the image down the
/// screen).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TransformParams {
    /// Rotation angle in degrees, counter-clockwise in normalized space.
    pub rotation: f32,
    /// Horizontal scale factor.
    pub scale_x: f32,
    /// Vertical scale factor.
    pub scale_y: f32,
    /// Horizontal translation in pixels.
    pub translate_x: f32,
    /// Vertical translation in pixels.
    pub translate_y: f32,
}

impl TransformParams {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        rotation: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    /// Check that every parameter is finite.
    ///
    /// # Errors
    ///
    /// Returns [`DeformError::NonFiniteParameter`] naming the first NaN or
    /// infinite field.
    pub fn validate(&self) -> Result<(), DeformError> {
        let fields = [
            ("rotation", self.rotation),
            ("scale_x", self.scale_x),
            ("scale_y", self.scale_y),
            ("translate_x", self.translate_x),
            ("translate_y", self.translate_y),
        ];
        match fields.into_iter().find(|(_, value)| !value.is_finite()) {
            Some((name, value)) => Err(DeformError::NonFiniteParameter { name, value }),
            None => Ok(()),
        }
    }

    /// Whether the parameters leave every vertex in place.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for TransformParams {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::fmt::Display for TransformParams {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "rotation: {}°, scale: ({:.1}, {:.1}), translate: ({}px, {}px)",
            self.rotation, self.scale_x, self.scale_y, self.translate_x, self.translate_y
        )
    }
}

/// Precomputed affine stage for one set of parameters and one surface size.
///
/// Points are rotated, then scaled, then translated, always in that order so
/// that the same inputs give bit-identical outputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineStage {
    cos: f32,
    sin: f32,
    scale: Vec2,
    translation: Vec2,
}

impl AffineStage {
    /// Build the stage, converting the pixel translation into normalized units.
    ///
    /// # Errors
    ///
    /// Fails if a parameter is not finite, the surface has a zero dimension
    /// or the translation overflows in normalized units.
    ///
    /// # Example
    ///
    /// ```
    /// use meshwarp_deform::{AffineStage, TransformParams};
    /// use meshwarp_mesh::{SurfaceSize, Vec2};
    ///
    /// let params = TransformParams {
    ///     translate_x: 50.0,
    ///     ..Default::default()
    /// };
    /// let stage = AffineStage::new(&params, SurfaceSize { width: 100, height: 100 }).unwrap();
    /// assert_eq!(stage.transform_point(Vec2::ZERO), Vec2::new(1.0, 0.0));
    /// ```
    pub fn new(params: &TransformParams, surface: SurfaceSize) -> Result<Self, DeformError> {
        params.validate()?;
        surface.validate()?;

        let theta = params.rotation * PI / 180.0;
        let translation =
            surface.pixel_offset_to_normalized(Vec2::new(params.translate_x, params.translate_y));
        if !translation.is_finite() {
            return Err(DeformError::NonFiniteTranslation(translation));
        }

        Ok(Self {
            cos: theta.cos(),
            sin: theta.sin(),
            scale: Vec2::new(params.scale_x, params.scale_y),
            translation,
        })
    }

    /// Transform a single point in normalized space.
    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        let xr = p.x * self.cos - p.y * self.sin;
        let yr = p.x * self.sin + p.y * self.cos;

        let xs = xr * self.scale.x;
        let ys = yr * self.scale.y;

        Vec2::new(xs + self.translation.x, ys + self.translation.y)
    }

    /// Translation in normalized units.
    pub fn translation(&self) -> Vec2 {
        self.translation
    }
}

/// Apply the global affine transform to every rest position.
///
/// # Arguments
///
/// * `rest` - The rest positions in normalized space.
/// * `params` - The transform parameters.
/// * `surface` - The render surface used to normalize the pixel translation.
///
/// # Returns
///
/// The transformed positions, one per rest position.
///
/// # Example
///
/// ```
/// use meshwarp_deform::{apply_affine, TransformParams};
/// use meshwarp_mesh::{GridMesh, SurfaceSize};
///
/// let mesh = GridMesh::new(4).unwrap();
/// let surface = SurfaceSize { width: 320, height: 240 };
/// let out = apply_affine(mesh.rest_positions(), &TransformParams::IDENTITY, surface).unwrap();
/// assert_eq!(out, mesh.rest_positions());
/// ```
pub fn apply_affine(
    rest: &[Vec2],
    params: &TransformParams,
    surface: SurfaceSize,
) -> Result<Vec<Vec2>, DeformError> {
    let mut dst = vec![Vec2::ZERO; rest.len()];
    apply_affine_into(rest, &mut dst, params, surface, ExecutionStrategy::Serial)?;
    Ok(dst)
}

/// Apply the global affine transform writing into a pre-allocated buffer.
///
/// PRECONDITION: `dst` has the same length as `rest`.
///
/// # Errors
///
/// Besides invalid parameters, fails with [`DeformError::NonFinitePosition`]
/// when finite but huge parameters overflow a vertex. `dst` is left partially
/// written in that case.
pub fn apply_affine_into(
    rest: &[Vec2],
    dst: &mut [Vec2],
    params: &TransformParams,
    surface: SurfaceSize,
    strategy: ExecutionStrategy,
) -> Result<(), DeformError> {
    ensure_same_len("rest", rest.len(), "dst", dst.len())?;

    let stage = AffineStage::new(params, surface)?;
    parallel::for_each_vertex(strategy, rest, dst, |_, p, out| {
        *out = stage.transform_point(p);
    });

    match dst.iter().position(|p| !p.is_finite()) {
        Some(index) => Err(DeformError::NonFinitePosition {
            index,
            position: dst[index],
        }),
        None => Ok(()),
    }
}
