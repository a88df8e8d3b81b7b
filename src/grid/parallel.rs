//! Parallel implementation of grid sampling

use crate::float_types::Real;
use crate::grid::traits::SamplerOps;
use rayon::prelude::*;

/// Rayon-backed sampler; node evaluations are independent
pub struct ParallelSamplerOps;

impl ParallelSamplerOps {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for ParallelSamplerOps {
    fn default() -> Self {
        Self::new()
    }
}

impl SamplerOps for ParallelSamplerOps {
    fn sample<F>(&self, len: usize, field: F) -> Vec<Real>
    where
        F: Fn(usize) -> Real + Sync + Send,
    {
        (0..len).into_par_iter().map(field).collect()
    }

    fn remap<F>(&self, values: &mut [Real], f: F)
    where
        F: Fn(usize, Real) -> Real + Sync + Send,
    {
        values
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, value)| *value = f(i, *value));
    }
}
