use glam::Vec2;

use crate::error::{ensure_same_len, DeformError};
use crate::parallel::{self, ExecutionStrategy};

/// Quadratic distance falloff used to relax vertices around an anchor.
///
/// A vertex at rest distance `d` from the anchor gets the weight
/// `clamp(1 - d / max_influence_distance, 0, 1)^2`. The default distance of
/// `2.0` spans the whole diagonal half of the `[-1, 1]` domain.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Falloff {
    /// Rest-space distance at which an anchor stops having any influence.
    pub max_influence_distance: f32,
}

impl Falloff {
    /// Default rest-space distance of influence.
    pub const DEFAULT_MAX_INFLUENCE_DISTANCE: f32 = 2.0;

    /// Create a falloff with a custom reach.
    ///
    /// # Errors
    ///
    /// Returns [`DeformError::InvalidFalloffDistance`] unless the distance is
    /// finite and strictly positive.
    pub fn new(max_influence_distance: f32) -> Result<Self, DeformError> {
        let falloff = Self {
            max_influence_distance,
        };
        falloff.validate()?;
        Ok(falloff)
    }

    /// Check that the distance is finite and strictly positive.
    pub fn validate(&self) -> Result<(), DeformError> {
        let d = self.max_influence_distance;
        if !d.is_finite() || d <= 0.0 {
            return Err(DeformError::InvalidFalloffDistance(d));
        }
        Ok(())
    }

    /// Pull-back weight in `[0, 1]` for a vertex at rest distance `distance`.
    ///
    /// # Example
    ///
    /// ```
    /// use meshwarp_deform::Falloff;
    ///
    /// let falloff = Falloff::default();
    /// assert_eq!(falloff.weight(0.0), 1.0);
    /// assert_eq!(falloff.weight(1.0), 0.25);
    /// assert_eq!(falloff.weight(3.0), 0.0);
    /// ```
    #[inline]
    pub fn weight(&self, distance: f32) -> f32 {
        let influence = (1.0 - distance / self.max_influence_distance).clamp(0.0, 1.0);
        influence * influence
    }
}

impl Default for Falloff {
    fn default() -> Self {
        Self {
            max_influence_distance: Self::DEFAULT_MAX_INFLUENCE_DISTANCE,
        }
    }
}

/// Find the vertex whose rest position is closest to `target`.
///
/// Distances are compared squared; on ties the lowest index wins.
///
/// # Returns
///
/// The vertex index, or `None` when `rest` is empty or `target` is not
/// finite.
pub fn nearest_vertex(rest: &[Vec2], target: Vec2) -> Option<usize> {
    if !target.is_finite() {
        return None;
    }
    let mut closest: Option<(usize, f32)> = None;
    for (i, p) in rest.iter().enumerate() {
        // squared distances may overflow to infinity for far targets
        let distance = p.distance_squared(target);
        match closest {
            Some((_, best)) if distance >= best => {}
            _ => closest = Some((i, distance)),
        }
    }
    closest.map(|(i, _)| i)
}

/// Pin the anchors and relax the rest of the mesh toward its rest pose.
///
/// Anchors are processed one after another and every pass works on the
/// result of the previous one. For each anchor the nearest rest vertex is
/// moved exactly onto the anchor, and every other vertex is pulled back
/// toward its rest position by `falloff.weight(distance)` of its current
/// displacement. Once all passes ran, the pins are written again in order so
/// that relaxation from later anchors cannot move an earlier pin.
///
/// # Arguments
///
/// * `current` - The transformed positions, updated in place.
/// * `rest` - The rest positions of the mesh.
/// * `anchors` - The anchor positions in normalized space.
/// * `falloff` - The influence falloff.
/// * `strategy` - How the per-vertex relaxation loop is executed.
///
/// # Returns
///
/// The index of the vertex owned by each anchor, in anchor order.
///
/// # Example
///
/// ```
/// use meshwarp_deform::{apply_constraints, ExecutionStrategy, Falloff};
/// use meshwarp_mesh::{GridMesh, Vec2};
///
/// let mesh = GridMesh::new(2).unwrap();
/// let mut current = mesh
///     .rest_positions()
///     .iter()
///     .map(|p| *p + Vec2::new(0.5, 0.0))
///     .collect::<Vec<_>>();
///
/// let owned = apply_constraints(
///     &mut current,
///     mesh.rest_positions(),
///     &[Vec2::ZERO],
///     &Falloff::default(),
///     ExecutionStrategy::Serial,
/// )
/// .unwrap();
///
/// assert_eq!(owned, vec![4]);
/// assert_eq!(current[4], Vec2::ZERO);
/// ```
pub fn apply_constraints(
    current: &mut [Vec2],
    rest: &[Vec2],
    anchors: &[Vec2],
    falloff: &Falloff,
    strategy: ExecutionStrategy,
) -> Result<Vec<usize>, DeformError> {
    ensure_same_len("current", current.len(), "rest", rest.len())?;
    falloff.validate()?;
    if let Some(index) = anchors.iter().position(|a| !a.is_finite()) {
        return Err(DeformError::NonFiniteAnchor {
            index,
            position: anchors[index],
        });
    }

    let mut owned = Vec::with_capacity(anchors.len());
    for &anchor in anchors {
        let Some(pinned) = nearest_vertex(rest, anchor) else {
            break;
        };

        // hard pin
        current[pinned] = anchor;

        parallel::for_each_vertex(strategy, rest, current, |i, rest_pos, pos| {
            if i == pinned {
                return;
            }
            let weight = falloff.weight(rest_pos.distance(anchor));
            let delta = *pos - rest_pos;
            *pos -= delta * weight;
        });

        owned.push(pinned);
    }

    for (&pinned, &anchor) in owned.iter().zip(anchors) {
        current[pinned] = anchor;
    }

    Ok(owned)
}
