use glam::Vec2;
use meshwarp_mesh::{GridMesh, SurfaceSize};

use crate::affine::{apply_affine_into, TransformParams};
use crate::constraint::{apply_constraints, Falloff};
use crate::error::DeformError;
use crate::parallel::ExecutionStrategy;

/// Deform a mesh with the default falloff.
///
/// Runs the affine stage on the rest pose and, when `anchors` is not empty,
/// the constraint stage on top of it.
///
/// # Arguments
///
/// * `mesh` - The mesh providing the rest pose.
/// * `params` - The global transform parameters.
/// * `anchors` - The anchor positions in surface pixels.
/// * `surface` - The current render surface size.
///
/// # Returns
///
/// The deformed vertex positions, one per mesh vertex.
///
/// # Example
///
/// ```
/// use meshwarp_deform::{deform, TransformParams};
/// use meshwarp_mesh::{GridMesh, SurfaceSize, Vec2};
///
/// let mesh = GridMesh::new(2).unwrap();
/// let surface = SurfaceSize { width: 100, height: 100 };
/// let params = TransformParams { rotation: 30.0, ..Default::default() };
///
/// let positions = deform(&mesh, &params, &[Vec2::new(50.0, 50.0)], surface).unwrap();
/// assert_eq!(positions.len(), 9);
/// assert_eq!(positions[4], Vec2::ZERO);
/// ```
pub fn deform(
    mesh: &GridMesh,
    params: &TransformParams,
    anchors: &[Vec2],
    surface: SurfaceSize,
) -> Result<Vec<Vec2>, DeformError> {
    let mut deformer = Deformer::default();
    deformer.run(mesh, params, anchors.iter().copied(), surface)?;
    Ok(deformer.into_positions())
}

/// Reusable deformation pipeline owning its output buffers.
///
/// The positions buffer is rewritten in full on every [`Deformer::run`], so
/// repeated runs with the same inputs always give the same result.
#[derive(Debug, Clone, Default)]
pub struct Deformer {
    falloff: Falloff,
    strategy: ExecutionStrategy,
    positions: Vec<Vec2>,
    normalized_anchors: Vec<Vec2>,
    owned: Vec<usize>,
}

impl Deformer {
    /// Create a pipeline with a custom falloff and execution strategy.
    pub fn new(falloff: Falloff, strategy: ExecutionStrategy) -> Result<Self, DeformError> {
        falloff.validate()?;
        Ok(Self {
            falloff,
            strategy,
            ..Default::default()
        })
    }

    /// Run the pipeline: rest pose, affine stage, then the anchors if any.
    ///
    /// `anchors` are pixel positions on `surface`; they are converted to
    /// normalized space with the current surface size on every run.
    ///
    /// # Errors
    ///
    /// Fails on invalid parameters, on anchors that are not finite in
    /// normalized space and on transforms that overflow a vertex. The
    /// positions buffer holds no meaningful pose after an error.
    pub fn run(
        &mut self,
        mesh: &GridMesh,
        params: &TransformParams,
        anchors: impl IntoIterator<Item = Vec2>,
        surface: SurfaceSize,
    ) -> Result<&[Vec2], DeformError> {
        let rest = mesh.rest_positions();

        self.positions.clear();
        self.positions.resize(rest.len(), Vec2::ZERO);
        apply_affine_into(rest, &mut self.positions, params, surface, self.strategy)?;

        self.normalized_anchors.clear();
        self.normalized_anchors.extend(
            anchors
                .into_iter()
                .map(|pixel| surface.pixel_to_normalized(pixel)),
        );

        self.owned = if self.normalized_anchors.is_empty() {
            Vec::new()
        } else {
            apply_constraints(
                &mut self.positions,
                rest,
                &self.normalized_anchors,
                &self.falloff,
                self.strategy,
            )?
        };

        log::debug!(
            "deformed {} vertices with {} anchors ({})",
            self.positions.len(),
            self.normalized_anchors.len(),
            params
        );

        Ok(self.positions.as_slice())
    }

    /// Positions computed by the last run.
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    /// Normalized anchor positions used by the last run.
    pub fn normalized_anchors(&self) -> &[Vec2] {
        &self.normalized_anchors
    }

    /// Vertex owned by each anchor in the last run.
    pub fn owned_vertices(&self) -> &[usize] {
        &self.owned
    }

    /// The falloff used by the constraint stage.
    pub fn falloff(&self) -> Falloff {
        self.falloff
    }

    /// The execution strategy used by the stages.
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Consume the pipeline and return the last positions.
    pub fn into_positions(self) -> Vec<Vec2> {
        self.positions
    }
}
