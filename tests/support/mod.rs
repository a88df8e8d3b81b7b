//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use nalgebra::{Point3, Vector3};
use tpms_mesh::{
    Domain, LatticeSpec, Mesh, TpmsFamily, Triangle,
    float_types::{Real, tolerance},
};

/// Unrotated lattice with unit wavelength on every axis.
pub fn unit_lattice(family: TpmsFamily, porosity: Real) -> LatticeSpec {
    LatticeSpec::new(family, Vector3::repeat(1.0), porosity).unwrap()
}

/// `[0, 1]^3`
pub fn unit_domain() -> Domain {
    Domain::from_extents(Vector3::repeat(1.0)).unwrap()
}

/// Panics with the edge report if `mesh` is not a closed, consistently
/// oriented surface.
pub fn assert_closed(mesh: &Mesh) {
    let report = mesh.analyze_manifold();
    assert!(report.is_closed(), "mesh is not closed: {report:?}");
}

/// Every vertex of `mesh` lies inside `domain` up to the clipping tolerance.
pub fn assert_within(mesh: &Mesh, domain: &Domain) {
    for tri in mesh {
        for p in &tri.vertices {
            assert!(
                domain.contains(p, tolerance()),
                "vertex {p:?} escapes [{:?}, {:?}]",
                domain.min(),
                domain.max()
            );
        }
    }
}

/// Sorted, deduplicated vertex positions quantised to `1 / scale`.
pub fn vertex_set(mesh: &Mesh, scale: Real) -> Vec<[i64; 3]> {
    let mut keys: Vec<[i64; 3]> = mesh
        .iter()
        .flat_map(|tri| tri.vertices.iter())
        .map(|p| [p.x, p.y, p.z].map(|c| (c * scale).round() as i64))
        .collect();
    keys.sort_unstable();
    keys.dedup();
    keys
}

/// Apply `f` to every vertex of `mesh`.
pub fn map_vertices(mesh: &Mesh, f: impl Fn(&Point3<Real>) -> Point3<Real>) -> Mesh {
    let mut out = mesh.clone();
    for tri in &mut out.triangles {
        tri.vertices = tri.vertices.map(|p| f(&p));
    }
    out
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Pairs of triangles that share no vertex but pierce each other.
///
/// Bounding boxes are swept along x; overlapping pairs are tested by
/// crossing every side of one triangle with the other's interior.
pub fn count_self_intersections(mesh: &Mesh) -> usize {
    let mut boxes: Vec<(Point3<Real>, Point3<Real>, &Triangle)> = mesh
        .iter()
        .map(|tri| {
            let [a, b, c] = &tri.vertices;
            (a.inf(b).inf(c), a.sup(b).sup(c), tri)
        })
        .collect();
    boxes.sort_unstable_by(|l, r| l.0.x.total_cmp(&r.0.x));

    let mut hits = 0;
    for (i, (lo, hi, tri)) in boxes.iter().enumerate() {
        for (lo2, hi2, other) in &boxes[i + 1..] {
            if lo2.x > hi.x {
                break;
            }
            if lo2.y > hi.y || lo.y > hi2.y || lo2.z > hi.z || lo.z > hi2.z {
                continue;
            }
            let shares_vertex = tri
                .vertices
                .iter()
                .any(|p| other.vertices.contains(p));
            if !shares_vertex && (pierces(tri, other) || pierces(other, tri)) {
                hits += 1;
            }
        }
    }
    hits
}

/// A side of `a` crosses the plane of `b` strictly inside `b`.
fn pierces(a: &Triangle, b: &Triangle) -> bool {
    let [b0, b1, b2] = &b.vertices;
    let normal = b.normal();
    (0..3).any(|k| {
        let p = a.vertices[k];
        let q = a.vertices[(k + 1) % 3];
        let dp = normal.dot(&(p - b0));
        let dq = normal.dot(&(q - b0));
        let scale = normal.norm() * 1e-12;
        if !((dp > scale && dq < -scale) || (dp < -scale && dq > scale)) {
            return false;
        }
        let x = p + (q - p) * (dp / (dp - dq));
        [(b0, b1), (b1, b2), (b2, b0)]
            .iter()
            .all(|(u, v)| (*v - *u).cross(&(x - *u)).dot(&normal) > 0.0)
    })
}
