//! Serial implementation of grid sampling

use crate::float_types::Real;
use crate::grid::traits::SamplerOps;

/// Single-threaded sampler
pub struct SerialSamplerOps;

impl SerialSamplerOps {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for SerialSamplerOps {
    fn default() -> Self {
        Self::new()
    }
}

impl SamplerOps for SerialSamplerOps {
    fn sample<F>(&self, len: usize, field: F) -> Vec<Real>
    where
        F: Fn(usize) -> Real + Sync + Send,
    {
        (0..len).map(field).collect()
    }

    fn remap<F>(&self, values: &mut [Real], f: F)
    where
        F: Fn(usize, Real) -> Real + Sync + Send,
    {
        values
            .iter_mut()
            .enumerate()
            .for_each(|(i, value)| *value = f(i, *value));
    }
}
