use meshwarp_deform::TransformParams;
use meshwarp_mesh::SurfaceSize;

use crate::layout::ImageInfo;

/// A user interaction, decoupled from any UI toolkit.
///
/// Every command goes through [`crate::Session::dispatch`]. Pixel coordinates
/// are relative to the top-left corner of the render surface.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// A new image was decoded; size the surface inside `container`.
    LoadImage {
        /// Dimensions of the decoded image.
        image: ImageInfo,
        /// Space available for the render surface.
        container: SurfaceSize,
    },
    /// The render surface changed size.
    ResizeSurface(SurfaceSize),
    /// Set the rotation in degrees.
    SetRotation(f32),
    /// Set the horizontal scale factor.
    SetScaleX(f32),
    /// Set the vertical scale factor.
    SetScaleY(f32),
    /// Set the horizontal translation in pixels.
    SetTranslateX(f32),
    /// Set the vertical translation in pixels.
    SetTranslateY(f32),
    /// Replace every transform parameter at once.
    SetTransform(TransformParams),
    /// Go back to the identity transform.
    ResetTransform,
    /// Append an anchor at a pixel position.
    AddAnchor {
        /// Horizontal pixel position.
        x: f32,
        /// Vertical pixel position.
        y: f32,
    },
    /// Move an existing anchor.
    MoveAnchor {
        /// Index in the anchor list.
        index: usize,
        /// Horizontal pixel position.
        x: f32,
        /// Vertical pixel position.
        y: f32,
    },
    /// Remove the anchor at an index.
    RemoveAnchor(usize),
    /// Remove every anchor.
    ClearAnchors,
    /// Toggle the mode where the next pointer press places an anchor.
    ToggleAnchorPlacement,
    /// Pointer pressed on the surface.
    PointerDown {
        /// Horizontal pixel position.
        x: f32,
        /// Vertical pixel position.
        y: f32,
    },
    /// Pointer moved over the surface.
    PointerMove {
        /// Horizontal pixel position.
        x: f32,
        /// Vertical pixel position.
        y: f32,
    },
    /// Pointer released or left the surface.
    PointerUp,
}

#[cfg(test)]
mod tests {
    use super::Command;

    #[test]
    fn command_json_shape() -> Result<(), serde_json::Error> {
        let commands: Vec<Command> = serde_json::from_str(
            r#"[
                { "set_rotation": 15.0 },
                { "add_anchor": { "x": 10.0, "y": 20.0 } },
                { "remove_anchor": 0 },
                "reset_transform",
                "pointer_up"
            ]"#,
        )?;
        assert_eq!(
            commands,
            vec![
                Command::SetRotation(15.0),
                Command::AddAnchor { x: 10.0, y: 20.0 },
                Command::RemoveAnchor(0),
                Command::ResetTransform,
                Command::PointerUp,
            ]
        );
        Ok(())
    }
}
