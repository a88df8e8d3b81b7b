//! Parallel implementation of isosurface extraction

use crate::extract::slab::extract_slab;
use crate::extract::traits::ExtractOps;
use crate::float_types::Real;
use crate::grid::SampleGrid;
use crate::mesh::Triangle;
use rayon::prelude::*;

/// One z-slab per task, each with a local buffer, concatenated in slab order
pub struct ParallelExtractOps;

impl ParallelExtractOps {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for ParallelExtractOps {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOps for ParallelExtractOps {
    fn extract(&self, grid: &SampleGrid, isovalue: Real) -> Vec<Triangle> {
        let [_, _, cz] = grid.shape().cells();
        let slabs: Vec<Vec<Triangle>> = (0..cz)
            .into_par_iter()
            .map(|z| {
                let mut local = Vec::new();
                extract_slab(grid, isovalue, z, &mut local);
                local
            })
            .collect();

        let total = slabs.iter().map(Vec::len).sum();
        let mut triangles = Vec::with_capacity(total);
        for slab in slabs {
            triangles.extend(slab);
        }
        triangles
    }
}
