//! Field evaluation for the supported TPMS families.
//!
//! All three families are closed-form trigonometric approximations of the
//! corresponding minimal surfaces. [`TpmsFamily::canonical`] evaluates the
//! formula in lattice space, where one unit cell spans `[0, 2π)` on every
//! axis; [`evaluate`] maps a world point into that space first.
//!
//! Sign convention: pore is `value < isovalue`, solid is `value >= isovalue`.

use crate::float_types::{Real, TAU};
use crate::lattice::{LatticeSpec, TpmsFamily};
use nalgebra::Point3;

impl TpmsFamily {
    /// Field value at lattice-space coordinates (radians).
    ///
    /// - Gyroid: `sin x cos y + sin y cos z + sin z cos x`, range about `[-1.5, 1.5]`.
    /// - Diamond: `sin x sin y sin z + sin x cos y cos z + cos x sin y cos z + cos x cos y sin z`,
    ///   range about `[-1.41, 1.41]`.
    /// - Sheet gyroid: `-|gyroid|`, range `[-1.5, 0]`. A threshold `t < 0` makes the shell
    ///   `|gyroid| <= -t` solid, so the solid is a wall of uniform level-set
    ///   thickness on both sides of the gyroid zero set.
    #[inline]
    pub fn canonical(self, x: Real, y: Real, z: Real) -> Real {
        let (sx, cx) = x.sin_cos();
        let (sy, cy) = y.sin_cos();
        let (sz, cz) = z.sin_cos();

        match self {
            TpmsFamily::Gyroid => sx * cy + sy * cz + sz * cx,
            TpmsFamily::SheetGyroid => -(sx * cy + sy * cz + sz * cx).abs(),
            TpmsFamily::Diamond => {
                sx * sy * sz + sx * cy * cz + cx * sy * cz + cx * cy * sz
            },
        }
    }
}

/// Evaluate the lattice field at a world-space `point`.
///
/// The point is brought into lattice-local coordinates with the inverse of the
/// lattice rotation, then each axis is scaled by `2π * frequency` before the
/// family formula is applied.
#[inline]
pub fn evaluate(point: &Point3<Real>, spec: &LatticeSpec) -> Real {
    let local = spec.rotation().inverse_transform_point(point);
    let scaled = local.coords.component_mul(spec.frequency()) * TAU;
    spec.family().canonical(scaled.x, scaled.y, scaled.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::PI;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn unit(family: TpmsFamily) -> LatticeSpec {
        LatticeSpec::new(family, Vector3::repeat(1.0), 0.5).unwrap()
    }

    #[test]
    fn gyroid_known_values() {
        let g = TpmsFamily::Gyroid;
        assert_relative_eq!(g.canonical(0.0, 0.0, 0.0), 0.0);
        // sin(π/2)cos(0) + sin(0)cos(0) + sin(0)cos(π/2)
        assert_relative_eq!(g.canonical(PI / 2.0, 0.0, 0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            g.canonical(PI / 2.0, PI / 2.0, PI / 2.0),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn diamond_known_values() {
        let d = TpmsFamily::Diamond;
        assert_relative_eq!(d.canonical(0.0, 0.0, 0.0), 0.0);
        assert_relative_eq!(d.canonical(PI / 2.0, 0.0, 0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            d.canonical(PI / 2.0, PI / 2.0, PI / 2.0),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn sheet_is_negated_gyroid_magnitude() {
        for &(x, y, z) in &[(0.3, 1.1, -2.0), (2.2, 0.4, 0.9), (-1.0, -1.0, 5.0)] {
            let g = TpmsFamily::Gyroid.canonical(x, y, z);
            let s = TpmsFamily::SheetGyroid.canonical(x, y, z);
            assert!(s <= 0.0);
            assert_relative_eq!(s, -g.abs());
        }
    }

    #[test]
    fn evaluate_is_periodic_in_wavelength() {
        let spec = LatticeSpec::from_wavelengths(
            TpmsFamily::Diamond,
            Vector3::new(2.0, 3.0, 0.5),
            0.4,
        )
        .unwrap();
        let p = Point3::new(0.37, -1.2, 0.81);
        let shifted = p + Vector3::new(2.0, -3.0, 1.5);
        assert_relative_eq!(evaluate(&p, &spec), evaluate(&shifted, &spec), epsilon = 1e-9);
    }

    #[test]
    fn evaluate_applies_inverse_rotation() {
        let plain = unit(TpmsFamily::Gyroid);
        let rotated = unit(TpmsFamily::Gyroid)
            .with_rotation_degrees(0.0, 0.0, 90.0)
            .unwrap();
        // Rz(90) sends +x to +y, so the rotated field at +y equals the plain field at +x
        let a = evaluate(&Point3::new(0.0, 0.2, 0.0), &rotated);
        let b = evaluate(&Point3::new(0.2, 0.0, 0.0), &plain);
        assert_relative_eq!(a, b, epsilon = 1e-12);
    }

    #[test]
    fn evaluate_is_continuous_under_rotation() {
        let spec = unit(TpmsFamily::SheetGyroid)
            .with_rotation_degrees(17.0, 33.0, 71.0)
            .unwrap();
        let h = 1e-7;
        for i in 0..50 {
            let t = i as Real * 0.173;
            let p = Point3::new(t.cos(), (2.0 * t).sin(), t * 0.1);
            let q = p + Vector3::repeat(h);
            // the gradient magnitude is bounded by 2π * 3 per unit of frequency
            assert!((evaluate(&p, &spec) - evaluate(&q, &spec)).abs() < 100.0 * h);
        }
    }
}
