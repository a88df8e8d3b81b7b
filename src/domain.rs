//! Axis-aligned box the lattice is meshed in.

use crate::errors::ConfigurationError;
use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// Closed axis-aligned box `[min, max]` with positive extent on every axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    min: Point3<Real>,
    max: Point3<Real>,
}

impl Domain {
    pub fn new(min: Point3<Real>, max: Point3<Real>) -> Result<Self, ConfigurationError> {
        if min.iter().chain(max.iter()).any(|c| !c.is_finite()) {
            return Err(ConfigurationError::NonFiniteParameter("domain bounds"));
        }
        for (axis, extent) in ['x', 'y', 'z'].into_iter().zip((max - min).iter()) {
            if *extent <= 0.0 {
                return Err(ConfigurationError::EmptyDomain {
                    axis,
                    extent: *extent,
                });
            }
        }
        Ok(Domain { min, max })
    }

    /// Box `[0, extents]`.
    pub fn from_extents(extents: Vector3<Real>) -> Result<Self, ConfigurationError> {
        Self::new(Point3::origin(), Point3::from(extents))
    }

    /// Box of the given size centred on the origin.
    pub fn centered(size: Vector3<Real>) -> Result<Self, ConfigurationError> {
        let half = size / 2.0;
        Self::new(Point3::from(-half), Point3::from(half))
    }

    /// Origin-centred box spanning `counts` unit cells of the given wavelengths.
    pub fn from_periods(
        wavelengths: Vector3<Real>,
        counts: Vector3<Real>,
    ) -> Result<Self, ConfigurationError> {
        Self::centered(wavelengths.component_mul(&counts))
    }

    pub const fn min(&self) -> &Point3<Real> {
        &self.min
    }

    pub const fn max(&self) -> &Point3<Real> {
        &self.max
    }

    pub fn size(&self) -> Vector3<Real> {
        self.max - self.min
    }

    pub fn center(&self) -> Point3<Real> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn volume(&self) -> Real {
        self.size().product()
    }

    /// `true` if `p` lies inside the box grown by `tolerance` on every side.
    pub fn contains(&self, p: &Point3<Real>, tolerance: Real) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] - tolerance && p[i] <= self.max[i] + tolerance)
    }

    /// Distance from `p` to the nearest face plane, positive inside the box
    /// and negative outside it.
    ///
    /// Outside the box this is the largest per-axis overshoot, negated, which
    /// is all the capping pass needs.
    pub fn face_distance(&self, p: &Point3<Real>) -> Real {
        (0..3)
            .map(|i| (p[i] - self.min[i]).min(self.max[i] - p[i]))
            .fold(Real::INFINITY, Real::min)
    }
}
