use glam::Vec2;
use rayon::prelude::*;

/// Controls how the per-vertex loops of a stage are executed.
///
/// Every vertex is computed from its own inputs only, so both strategies
/// produce bit-identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    ///
    /// The right choice for interactive meshes of a few thousand vertices,
    /// where thread dispatch costs more than the work itself.
    #[default]
    Serial,

    /// Use the global Rayon thread pool to process every vertex in parallel.
    ParallelElements,
}

/// Apply a function to each `(index, src, dst)` vertex triple.
///
/// PRECONDITION: `src` and `dst` have the same length.
pub(crate) fn for_each_vertex(
    strategy: ExecutionStrategy,
    src: &[Vec2],
    dst: &mut [Vec2],
    f: impl Fn(usize, Vec2, &mut Vec2) + Send + Sync,
) {
    debug_assert_eq!(src.len(), dst.len());
    match strategy {
        ExecutionStrategy::Serial => {
            src.iter()
                .zip(dst.iter_mut())
                .enumerate()
                .for_each(|(i, (s, d))| f(i, *s, d));
        }
        ExecutionStrategy::ParallelElements => {
            src.par_iter()
                .zip(dst.par_iter_mut())
                .enumerate()
                .for_each(|(i, (s, d))| f(i, *s, d));
        }
    }
}
