//! Serial implementation of isosurface extraction

use crate::extract::slab::extract_slab;
use crate::extract::traits::ExtractOps;
use crate::float_types::Real;
use crate::grid::SampleGrid;
use crate::mesh::Triangle;

/// Walks the slabs one after another into a single buffer
pub struct SerialExtractOps;

impl SerialExtractOps {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for SerialExtractOps {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOps for SerialExtractOps {
    fn extract(&self, grid: &SampleGrid, isovalue: Real) -> Vec<Triangle> {
        let [_, _, cz] = grid.shape().cells();
        let mut triangles = Vec::new();
        for z in 0..cz {
            extract_slab(grid, isovalue, z, &mut triangles);
        }
        triangles
    }
}
