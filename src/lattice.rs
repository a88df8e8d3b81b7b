//! Lattice parameters: TPMS family, per-axis spatial frequency, rotation and porosity.

use crate::errors::ConfigurationError;
use crate::float_types::{PI, Real};
use nalgebra::{Matrix3, Rotation3, Vector3};
use std::fmt;
use std::str::FromStr;

/// The minimal-surface families this crate can mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TpmsFamily {
    /// Skeletal gyroid: solid on one side of the gyroid level set
    Gyroid,
    /// Double-walled shell of uniform thickness around the gyroid zero set
    SheetGyroid,
    /// Schwarz D (diamond) surface
    Diamond,
}

impl TpmsFamily {
    pub const ALL: [TpmsFamily; 3] = [
        TpmsFamily::Gyroid,
        TpmsFamily::SheetGyroid,
        TpmsFamily::Diamond,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            TpmsFamily::Gyroid => "gyroid",
            TpmsFamily::SheetGyroid => "sheet-gyroid",
            TpmsFamily::Diamond => "diamond",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            TpmsFamily::Gyroid => 0,
            TpmsFamily::SheetGyroid => 1,
            TpmsFamily::Diamond => 2,
        }
    }
}

impl fmt::Display for TpmsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a family name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown TPMS family `{0}` (expected `gyroid`, `sheet-gyroid` or `diamond`)")]
pub struct ParseFamilyError(pub String);

impl FromStr for TpmsFamily {
    type Err = ParseFamilyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "gyroid" => Ok(TpmsFamily::Gyroid),
            "sheet-gyroid" | "sheet" => Ok(TpmsFamily::SheetGyroid),
            "diamond" | "schwarz-d" => Ok(TpmsFamily::Diamond),
            _ => Err(ParseFamilyError(s.to_string())),
        }
    }
}

/// Geometry of one TPMS lattice.
///
/// Constructed through [`LatticeSpec::new`] or [`LatticeSpec::from_wavelengths`],
/// both of which reject degenerate parameters, so every value of this type
/// satisfies:
/// - each frequency is finite and `> 0` (cycles per unit length)
/// - `0 < porosity < 1`
/// - `rotation` is a proper rotation
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeSpec {
    family: TpmsFamily,
    frequency: Vector3<Real>,
    rotation: Rotation3<Real>,
    porosity: Real,
}

const AXES: [char; 3] = ['x', 'y', 'z'];

impl LatticeSpec {
    /// Unrotated lattice with the given per-axis spatial frequencies.
    pub fn new(
        family: TpmsFamily,
        frequency: Vector3<Real>,
        porosity: Real,
    ) -> Result<Self, ConfigurationError> {
        for (axis, value) in AXES.iter().zip(frequency.iter()) {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFiniteParameter("frequency"));
            }
            if *value <= 0.0 {
                return Err(ConfigurationError::NonPositiveFrequency {
                    axis: *axis,
                    value: *value,
                });
            }
        }
        validate_porosity(porosity)?;

        Ok(LatticeSpec {
            family,
            frequency,
            rotation: Rotation3::identity(),
            porosity,
        })
    }

    /// Unrotated lattice described by per-axis wavelengths (unit-cell edge lengths).
    pub fn from_wavelengths(
        family: TpmsFamily,
        wavelengths: Vector3<Real>,
        porosity: Real,
    ) -> Result<Self, ConfigurationError> {
        for (axis, value) in AXES.iter().zip(wavelengths.iter()) {
            if !value.is_finite() {
                return Err(ConfigurationError::NonFiniteParameter("wavelength"));
            }
            if *value <= 0.0 {
                return Err(ConfigurationError::NonPositiveWavelength {
                    axis: *axis,
                    value: *value,
                });
            }
        }
        Self::new(family, wavelengths.map(|w| 1.0 / w), porosity)
    }

    /// Replace the lattice orientation.
    pub fn with_rotation(mut self, rotation: Rotation3<Real>) -> Result<Self, ConfigurationError> {
        let m = rotation.matrix();
        if m.iter().any(|c| !c.is_finite()) {
            return Err(ConfigurationError::NonFiniteParameter("rotation"));
        }
        let drift = (m.transpose() * m - Matrix3::identity()).abs().max();
        if drift > 1e-6 || (m.determinant() - 1.0).abs() > 1e-6 {
            return Err(ConfigurationError::NonOrthonormalRotation);
        }
        self.rotation = rotation;
        Ok(self)
    }

    /// Orientation from rotations about the x, y and z axes (radians),
    /// composed as `Rx · Ry · Rz`.
    pub fn with_euler_angles(
        self,
        theta_x: Real,
        theta_y: Real,
        theta_z: Real,
    ) -> Result<Self, ConfigurationError> {
        if !(theta_x.is_finite() && theta_y.is_finite() && theta_z.is_finite()) {
            return Err(ConfigurationError::NonFiniteParameter("rotation angle"));
        }
        self.with_rotation(euler_xyz(theta_x, theta_y, theta_z))
    }

    /// Same as [`LatticeSpec::with_euler_angles`] with angles in degrees.
    pub fn with_rotation_degrees(
        self,
        theta_x: Real,
        theta_y: Real,
        theta_z: Real,
    ) -> Result<Self, ConfigurationError> {
        let to_rad = PI / 180.0;
        self.with_euler_angles(theta_x * to_rad, theta_y * to_rad, theta_z * to_rad)
    }

    pub const fn family(&self) -> TpmsFamily {
        self.family
    }

    pub const fn frequency(&self) -> &Vector3<Real> {
        &self.frequency
    }

    pub const fn rotation(&self) -> &Rotation3<Real> {
        &self.rotation
    }

    pub const fn porosity(&self) -> Real {
        self.porosity
    }

    /// Target solid volume fraction, `1 - porosity`.
    pub fn solid_fraction(&self) -> Real {
        1.0 - self.porosity
    }

    pub fn wavelengths(&self) -> Vector3<Real> {
        self.frequency.map(|f| 1.0 / f)
    }

    pub fn max_frequency(&self) -> Real {
        self.frequency.max()
    }

    /// Shortest period along any lattice axis.
    pub fn min_wavelength(&self) -> Real {
        1.0 / self.max_frequency()
    }
}

pub(crate) fn validate_porosity(porosity: Real) -> Result<(), ConfigurationError> {
    if !porosity.is_finite() {
        return Err(ConfigurationError::NonFiniteParameter("porosity"));
    }
    if porosity <= 0.0 || porosity >= 1.0 {
        return Err(ConfigurationError::PorosityOutOfRange(porosity));
    }
    Ok(())
}

fn euler_xyz(theta_x: Real, theta_y: Real, theta_z: Real) -> Rotation3<Real> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), theta_x)
        * Rotation3::from_axis_angle(&Vector3::y_axis(), theta_y)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), theta_z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn rejects_degenerate_porosity() {
        for porosity in [0.0, 1.0, -0.2, 1.5] {
            let err = LatticeSpec::new(TpmsFamily::Gyroid, Vector3::repeat(1.0), porosity)
                .unwrap_err();
            assert_eq!(err, ConfigurationError::PorosityOutOfRange(porosity));
        }
        assert_eq!(
            LatticeSpec::new(TpmsFamily::Gyroid, Vector3::repeat(1.0), Real::NAN).unwrap_err(),
            ConfigurationError::NonFiniteParameter("porosity")
        );
    }

    #[test]
    fn rejects_non_positive_frequency() {
        let err = LatticeSpec::new(TpmsFamily::Diamond, Vector3::new(1.0, 0.0, 1.0), 0.5)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::NonPositiveFrequency { axis: 'y', value: 0.0 }
        );

        let err = LatticeSpec::from_wavelengths(
            TpmsFamily::Diamond,
            Vector3::new(2.0, 2.0, -3.0),
            0.5,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::NonPositiveWavelength { axis: 'z', value: -3.0 }
        );
    }

    #[test]
    fn wavelengths_invert_frequencies() {
        let spec = LatticeSpec::from_wavelengths(
            TpmsFamily::Gyroid,
            Vector3::new(2.0, 4.0, 5.0),
            0.3,
        )
        .unwrap();
        assert_relative_eq!(spec.frequency().y, 0.25);
        assert_relative_eq!(spec.wavelengths().z, 5.0, epsilon = 1e-12);
        assert_relative_eq!(spec.min_wavelength(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(spec.solid_fraction(), 0.7, epsilon = 1e-12);
    }

    #[test]
    fn euler_angles_compose_x_then_y_then_z() {
        let spec = LatticeSpec::new(TpmsFamily::Gyroid, Vector3::repeat(1.0), 0.5)
            .unwrap()
            .with_rotation_degrees(90.0, 90.0, 0.0)
            .unwrap();
        // Rx(90) * Ry(90) applied to +x: Ry sends x to -z, Rx sends -z to +y
        let p = spec.rotation() * Point3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(p, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn rejects_sheared_basis() {
        let sheared = Rotation3::from_matrix_unchecked(Matrix3::new(
            1.0, 0.5, 0.0, //
            0.0, 1.0, 0.0, //
            0.0, 0.0, 1.0,
        ));
        let err = LatticeSpec::new(TpmsFamily::Gyroid, Vector3::repeat(1.0), 0.5)
            .unwrap()
            .with_rotation(sheared)
            .unwrap_err();
        assert_eq!(err, ConfigurationError::NonOrthonormalRotation);
    }

    #[test]
    fn parses_family_names() {
        assert_eq!("Gyroid".parse::<TpmsFamily>().unwrap(), TpmsFamily::Gyroid);
        assert_eq!(
            "sheet_gyroid".parse::<TpmsFamily>().unwrap(),
            TpmsFamily::SheetGyroid
        );
        assert_eq!("diamond".parse::<TpmsFamily>().unwrap(), TpmsFamily::Diamond);
        assert!("schwarz-p".parse::<TpmsFamily>().is_err());
    }
}
