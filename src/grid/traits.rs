//! Traits defining grid sampling operations for dependency inversion

use crate::float_types::Real;

/// Per-node evaluation over a flat sample buffer.
pub trait SamplerOps {
    /// Evaluate `field` at every linear node index in `0..len`.
    fn sample<F>(&self, len: usize, field: F) -> Vec<Real>
    where
        F: Fn(usize) -> Real + Sync + Send;

    /// Replace every value with `f(index, value)`.
    fn remap<F>(&self, values: &mut [Real], f: F)
    where
        F: Fn(usize, Real) -> Real + Sync + Send;
}
