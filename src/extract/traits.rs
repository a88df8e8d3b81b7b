//! Traits defining isosurface extraction for dependency inversion

use crate::float_types::Real;
use crate::grid::SampleGrid;
use crate::mesh::Triangle;

/// Marching-cubes extraction over a whole [`SampleGrid`].
///
/// Implementations must emit triangles in z-slab order (all cells with
/// `z = 0`, then `z = 1`, ...) so every implementation yields the same mesh.
pub trait ExtractOps {
    fn extract(&self, grid: &SampleGrid, isovalue: Real) -> Vec<Triangle>;
}
