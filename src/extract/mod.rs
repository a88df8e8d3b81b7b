//! Marching cubes isosurface extraction.
//!
//! Each grid cell is classified by which of its eight corners are pore
//! (below the isovalue) and triangulated from a fixed 256-entry case table.
//! Edge crossings are linear interpolations between the two corner samples,
//! always taken from the lower grid node toward the upper one, so a crossing
//! shared by neighbouring cells is the same point down to the last bit.
//!
//! This module provides extraction with dependency inversion, allowing for
//! different implementations (serial/parallel).

pub mod serial;
pub mod tables;
pub mod traits;

#[cfg(feature = "parallel")]
pub mod parallel;

mod slab;

pub use serial::SerialExtractOps;
pub use traits::ExtractOps;

#[cfg(feature = "parallel")]
pub use parallel::ParallelExtractOps;

use crate::float_types::Real;
use crate::grid::SampleGrid;
use crate::mesh::Mesh;

/// Triangulate the `isovalue` level set of `grid`.
///
/// Triangles wind with their normal pointing from solid (`>= isovalue`)
/// toward pore. A grid with no crossing gives an empty mesh.
pub fn extract(grid: &SampleGrid, isovalue: Real) -> Mesh {
    #[cfg(not(feature = "parallel"))]
    let ops = SerialExtractOps::new();
    #[cfg(feature = "parallel")]
    let ops = ParallelExtractOps::new();

    extract_with(&ops, grid, isovalue)
}

pub fn extract_with<O: ExtractOps>(ops: &O, grid: &SampleGrid, isovalue: Real) -> Mesh {
    let triangles = ops.extract(grid, isovalue);
    log::debug!(
        "extracted {} triangles from {:?} cells at isovalue {isovalue:.6}",
        triangles.len(),
        grid.shape().cells()
    );
    Mesh::from_triangles(triangles)
}
