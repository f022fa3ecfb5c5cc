use std::sync::Arc;

use glam::Vec2;
use meshwarp_deform::{DeformError, Deformer, TransformParams};
use meshwarp_mesh::{GridMesh, SurfaceSize};

use crate::anchor::{hit_test, Anchor};
use crate::command::Command;
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::layout::{fit_surface, ImageInfo};
use crate::render::{Frame, MeshRenderer};

/// State that only exists once an image is loaded.
#[derive(Debug, Clone)]
struct Canvas {
    image: ImageInfo,
    surface: SurfaceSize,
    mesh: Arc<GridMesh>,
}

/// The state a failed command rolls back to.
#[derive(Debug, Clone)]
struct Snapshot {
    params: TransformParams,
    canvas: Option<Canvas>,
    anchors: Vec<Anchor>,
    placing_anchor: bool,
    dragging: Option<usize>,
}

/// An interactive warp session.
///
/// The session owns the transform parameters, the anchors, the mesh of the
/// loaded image and the deformed positions. All mutations go through
/// [`Session::dispatch`], which ends with exactly one run of the deformation
/// pipeline whenever the geometry may have changed and a mesh is loaded.
///
/// # Example
///
/// ```
/// use meshwarp_mesh::SurfaceSize;
/// use meshwarp_session::{Command, ImageInfo, Session, SessionConfig};
///
/// let mut session = Session::new(SessionConfig::default()).unwrap();
/// session
///     .dispatch(Command::LoadImage {
///         image: ImageInfo { width: 640, height: 480 },
///         container: SurfaceSize { width: 640, height: 480 },
///     })
///     .unwrap();
/// session.dispatch(Command::AddAnchor { x: 320.0, y: 240.0 }).unwrap();
/// session.dispatch(Command::SetRotation(30.0)).unwrap();
///
/// let frame = session.frame().unwrap();
/// assert_eq!(frame.positions.len(), 21 * 21);
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    params: TransformParams,
    canvas: Option<Canvas>,
    anchors: Vec<Anchor>,
    deformer: Deformer,
    placing_anchor: bool,
    dragging: Option<usize>,
}

impl Session {
    /// Create an empty session.
    ///
    /// # Errors
    ///
    /// Fails if the configuration does not validate.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let deformer = Deformer::new(config.falloff(), config.execution)?;
        Ok(Self {
            config,
            params: TransformParams::IDENTITY,
            canvas: None,
            anchors: Vec::new(),
            deformer,
            placing_anchor: false,
            dragging: None,
        })
    }

    /// Apply a command and recompute the deformation if needed.
    ///
    /// A failing command leaves the session unchanged, including a command
    /// whose values are finite but overflow during the deformation.
    pub fn dispatch(&mut self, command: Command) -> Result<(), SessionError> {
        let snapshot = self.snapshot();
        let result = self
            .apply(command)
            .and_then(|changed| if changed { self.recompute() } else { Ok(()) });

        if let Err(e) = result {
            log::warn!("rejected {:?}: {}", command, e);
            self.restore(snapshot);
            self.recompute()?;
            return Err(e);
        }
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            params: self.params,
            canvas: self.canvas.clone(),
            anchors: self.anchors.clone(),
            placing_anchor: self.placing_anchor,
            dragging: self.dragging,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.params = snapshot.params;
        self.canvas = snapshot.canvas;
        self.anchors = snapshot.anchors;
        self.placing_anchor = snapshot.placing_anchor;
        self.dragging = snapshot.dragging;
    }

    /// Update the state; returns whether the geometry may have changed.
    fn apply(&mut self, command: Command) -> Result<bool, SessionError> {
        match command {
            Command::LoadImage { image, container } => {
                self.load_image(image, container)?;
                Ok(true)
            }
            Command::ResizeSurface(size) => {
                size.validate()?;
                let canvas = self.canvas.as_mut().ok_or(SessionError::NoImageLoaded)?;
                canvas.surface = size;
                self.anchors.iter_mut().for_each(|a| a.resync(size));
                Ok(true)
            }
            Command::SetRotation(value) => {
                self.params.rotation = finite("rotation", value)?;
                Ok(true)
            }
            Command::SetScaleX(value) => {
                self.params.scale_x = finite("scale_x", value)?;
                Ok(true)
            }
            Command::SetScaleY(value) => {
                self.params.scale_y = finite("scale_y", value)?;
                Ok(true)
            }
            Command::SetTranslateX(value) => {
                self.params.translate_x = finite("translate_x", value)?;
                Ok(true)
            }
            Command::SetTranslateY(value) => {
                self.params.translate_y = finite("translate_y", value)?;
                Ok(true)
            }
            Command::SetTransform(params) => {
                params.validate()?;
                self.params = params;
                Ok(true)
            }
            Command::ResetTransform => {
                self.params = TransformParams::IDENTITY;
                Ok(true)
            }
            Command::AddAnchor { x, y } => {
                self.add_anchor(Vec2::new(x, y))?;
                Ok(true)
            }
            Command::MoveAnchor { index, x, y } => {
                self.move_anchor(index, Vec2::new(x, y))?;
                Ok(true)
            }
            Command::RemoveAnchor(index) => {
                self.surface()?;
                self.check_index(index)?;
                self.anchors.remove(index);
                self.dragging = None;
                Ok(true)
            }
            Command::ClearAnchors => {
                self.surface()?;
                self.anchors.clear();
                self.dragging = None;
                Ok(true)
            }
            Command::ToggleAnchorPlacement => {
                self.placing_anchor = !self.placing_anchor;
                Ok(false)
            }
            Command::PointerDown { x, y } => self.pointer_down(Vec2::new(x, y)),
            Command::PointerMove { x, y } => match self.dragging {
                Some(index) => {
                    self.move_anchor(index, Vec2::new(x, y))?;
                    Ok(true)
                }
                None => Ok(false),
            },
            Command::PointerUp => {
                self.dragging = None;
                Ok(false)
            }
        }
    }

    fn load_image(&mut self, image: ImageInfo, container: SurfaceSize) -> Result<(), SessionError> {
        let surface = fit_surface(image, container)?;
        let mesh = Arc::new(GridMesh::new(self.config.mesh_resolution)?);
        log::info!(
            "loaded {}x{} image on a {}x{} surface, mesh with {} vertices",
            image.width,
            image.height,
            surface.width,
            surface.height,
            mesh.num_vertices()
        );

        self.canvas = Some(Canvas {
            image,
            surface,
            mesh,
        });
        self.anchors.clear();
        self.dragging = None;
        Ok(())
    }

    fn add_anchor(&mut self, pixel: Vec2) -> Result<(), SessionError> {
        let surface = self.surface()?;
        finite("anchor x", pixel.x)?;
        finite("anchor y", pixel.y)?;
        self.anchors.push(Anchor::new(pixel, surface));
        Ok(())
    }

    fn move_anchor(&mut self, index: usize, pixel: Vec2) -> Result<(), SessionError> {
        let surface = self.surface()?;
        self.check_index(index)?;
        finite("anchor x", pixel.x)?;
        finite("anchor y", pixel.y)?;
        self.anchors[index].set_pixel(pixel, surface);
        Ok(())
    }

    fn pointer_down(&mut self, pointer: Vec2) -> Result<bool, SessionError> {
        if self.canvas.is_none() {
            log::debug!("ignoring pointer down at {pointer} without an image");
            return Ok(false);
        }

        if self.placing_anchor {
            self.add_anchor(pointer)?;
            self.placing_anchor = false;
            return Ok(true);
        }

        self.dragging = hit_test(&self.anchors, pointer, self.config.hit_radius_px);
        Ok(false)
    }

    fn check_index(&self, index: usize) -> Result<(), SessionError> {
        if index >= self.anchors.len() {
            return Err(SessionError::AnchorIndexOutOfRange {
                index,
                len: self.anchors.len(),
            });
        }
        Ok(())
    }

    fn recompute(&mut self) -> Result<(), SessionError> {
        let Some(canvas) = &self.canvas else {
            return Ok(());
        };
        self.deformer.run(
            &canvas.mesh,
            &self.params,
            self.anchors.iter().map(Anchor::pixel),
            canvas.surface,
        )?;
        Ok(())
    }

    /// Current render surface size.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoImageLoaded`] before the first image load.
    pub fn surface(&self) -> Result<SurfaceSize, SessionError> {
        self.canvas
            .as_ref()
            .map(|c| c.surface)
            .ok_or(SessionError::NoImageLoaded)
    }

    /// Dimensions of the loaded image.
    pub fn image(&self) -> Option<ImageInfo> {
        self.canvas.as_ref().map(|c| c.image)
    }

    /// Mesh of the loaded image.
    pub fn mesh(&self) -> Option<&GridMesh> {
        self.canvas.as_ref().map(|c| c.mesh.as_ref())
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current transform parameters.
    pub fn params(&self) -> &TransformParams {
        &self.params
    }

    /// Anchors in placement order.
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Display labels of the anchors, numbered from one.
    pub fn anchor_labels(&self) -> Vec<String> {
        self.anchors
            .iter()
            .enumerate()
            .map(|(i, a)| a.label(i))
            .collect()
    }

    /// Whether the next pointer press places an anchor.
    pub fn is_placing_anchor(&self) -> bool {
        self.placing_anchor
    }

    /// Index of the anchor being dragged.
    pub fn dragged_anchor(&self) -> Option<usize> {
        self.dragging
    }

    /// Deformed positions of the last pass, empty before an image is loaded.
    pub fn positions(&self) -> &[Vec2] {
        match self.canvas {
            Some(_) => self.deformer.positions(),
            None => &[],
        }
    }

    /// Vertex owned by each anchor in the last pass.
    pub fn owned_vertices(&self) -> &[usize] {
        self.deformer.owned_vertices()
    }

    /// The data needed to draw the current state, once an image is loaded.
    pub fn frame(&self) -> Option<Frame<'_>> {
        let canvas = self.canvas.as_ref()?;
        Some(Frame {
            surface: canvas.surface,
            indices: canvas.mesh.indices(),
            tex_coords: canvas.mesh.tex_coords(),
            positions: self.deformer.positions(),
            anchors: &self.anchors,
        })
    }

    /// Hand the current frame to a renderer.
    ///
    /// Returns `Ok(false)` without calling the renderer when no image is loaded.
    pub fn render<R: MeshRenderer>(&self, renderer: &mut R) -> Result<bool, R::Error> {
        match self.frame() {
            Some(frame) => {
                renderer.draw(&frame)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

fn finite(name: &'static str, value: f32) -> Result<f32, DeformError> {
    if !value.is_finite() {
        return Err(DeformError::NonFiniteParameter { name, value });
    }
    Ok(value)
}
