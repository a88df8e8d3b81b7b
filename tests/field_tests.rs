use nalgebra::{Point3, Vector3};
use tpms_mesh::{
    IsovalueSolver, LatticeSpec, TpmsFamily, evaluate,
    float_types::{Real, TAU},
};

fn grid_points(n: usize, size: Real) -> impl Iterator<Item = Point3<Real>> {
    let h = size / n as Real;
    (0..n * n * n).map(move |i| {
        let (x, y, z) = (i % n, (i / n) % n, i / (n * n));
        Point3::new(x as Real + 0.5, y as Real + 0.5, z as Real + 0.5) * h
    })
}

#[test]
fn frequency_scales_space() {
    let unit = LatticeSpec::new(TpmsFamily::Gyroid, Vector3::repeat(1.0), 0.5).unwrap();
    let stretched = LatticeSpec::new(TpmsFamily::Gyroid, Vector3::new(2.0, 0.5, 4.0), 0.5).unwrap();

    for p in grid_points(6, 1.0) {
        let q = Point3::new(p.x / 2.0, p.y * 2.0, p.z / 4.0);
        assert!((evaluate(&p, &unit) - evaluate(&q, &stretched)).abs() < 1e-12);
    }
}

#[test]
fn wavelengths_and_frequencies_agree() {
    let by_frequency = LatticeSpec::new(TpmsFamily::Diamond, Vector3::new(0.5, 0.25, 2.0), 0.3).unwrap();
    let by_wavelength =
        LatticeSpec::from_wavelengths(TpmsFamily::Diamond, Vector3::new(2.0, 4.0, 0.5), 0.3).unwrap();
    for p in grid_points(5, 3.0) {
        assert_eq!(evaluate(&p, &by_frequency), evaluate(&p, &by_wavelength));
    }
}

#[test]
fn sheet_threshold_selects_a_shell_around_the_gyroid() {
    let solver = IsovalueSolver::default();
    let gyroid = LatticeSpec::new(TpmsFamily::Gyroid, Vector3::repeat(1.0), 0.5).unwrap();
    let sheet = LatticeSpec::new(TpmsFamily::SheetGyroid, Vector3::repeat(1.0), 0.7).unwrap();
    let iso = solver.solve(&sheet).unwrap();
    assert!(iso < 0.0);

    for p in grid_points(12, 1.0) {
        let g = evaluate(&p, &gyroid);
        let solid = evaluate(&p, &sheet) >= iso;
        assert_eq!(solid, g.abs() <= -iso, "{p:?}");
    }
}

#[test]
fn fields_stay_in_their_ranges() {
    let h = TAU / 40.0;
    for family in TpmsFamily::ALL {
        let (mut lo, mut hi) = (Real::INFINITY, Real::NEG_INFINITY);
        for i in 0..40 * 40 * 40 {
            let (x, y, z) = (i % 40, (i / 40) % 40, i / 1600);
            let v = family.canonical(x as Real * h, y as Real * h, z as Real * h);
            lo = lo.min(v);
            hi = hi.max(v);
        }
        assert!(lo >= -1.51 && hi <= 1.51, "{family}: [{lo}, {hi}]");
        if family == TpmsFamily::SheetGyroid {
            assert!(hi <= 0.0);
        } else {
            assert!(lo < -1.0 && hi > 1.0, "{family}: [{lo}, {hi}]");
        }
    }
}
