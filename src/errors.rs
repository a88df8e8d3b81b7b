//! Configuration and numerical errors

use crate::float_types::Real;
use crate::lattice::TpmsFamily;

/// Invalid lattice, domain or sampling parameters.
///
/// These are all detected before any sampling work starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// (PorosityOutOfRange) Porosity must lie strictly between 0 and 1
    #[error("(PorosityOutOfRange) porosity must lie strictly between 0 and 1, got {0}")]
    PorosityOutOfRange(Real),
    /// (NonPositiveFrequency) A spatial frequency is zero or negative
    #[error("(NonPositiveFrequency) frequency along {axis} must be positive, got {value}")]
    NonPositiveFrequency { axis: char, value: Real },
    /// (NonPositiveWavelength) A unit-cell wavelength is zero or negative
    #[error("(NonPositiveWavelength) wavelength along {axis} must be positive, got {value}")]
    NonPositiveWavelength { axis: char, value: Real },
    /// (NonFiniteParameter) A parameter is NaN or infinite
    #[error("(NonFiniteParameter) `{0}` must be finite")]
    NonFiniteParameter(&'static str),
    /// (NonPositiveStep) The sampling step is zero or negative
    #[error("(NonPositiveStep) step size must be positive, got {0}")]
    NonPositiveStep(Real),
    /// (EmptyDomain) The requested box has no extent along an axis
    #[error("(EmptyDomain) domain extent along {axis} must be positive, got {extent}")]
    EmptyDomain { axis: char, extent: Real },
    /// (Undersampled) Fewer than two samples would fall in the shortest wavelength
    #[error(
        "(Undersampled) step {step} gives {samples_per_period:.3} samples per wavelength {wavelength}; at least 2 are required"
    )]
    Undersampled {
        samples_per_period: Real,
        wavelength: Real,
        step: Real,
    },
    /// (NonOrthonormalRotation) The rotation basis is not a proper rotation
    #[error("(NonOrthonormalRotation) rotation matrix is not orthonormal with determinant 1")]
    NonOrthonormalRotation,
    /// (InvalidMargin) The sampler needs at least one margin layer
    #[error("(InvalidMargin) grid margin must be at least 1 layer")]
    InvalidMargin,
}

/// A numerical procedure could not reach its required accuracy.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NumericalError {
    /// (SolverDidNotConverge) The solved isovalue misses the requested porosity
    #[error(
        "(SolverDidNotConverge) {family} isovalue yields porosity {achieved}, requested {porosity} (tolerance {tolerance})"
    )]
    SolverDidNotConverge {
        family: TpmsFamily,
        porosity: Real,
        achieved: Real,
        tolerance: Real,
    },
    /// (NonFiniteField) Sampling the canonical cell produced NaN or infinite values
    #[error("(NonFiniteField) {family} field produced non-finite samples")]
    NonFiniteField { family: TpmsFamily },
}

/// Any failure surfaced by the mesh generation pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TpmsError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Numerical(#[from] NumericalError),
}
