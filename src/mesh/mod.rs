//! `Mesh` and `Triangle`: the triangle soup produced by extraction and clipping

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod indexed;
pub mod manifold;

pub use indexed::IndexedMesh;
pub use manifold::ManifoldReport;

/// One oriented triangle. The right-hand normal of `vertices` points from
/// solid toward pore.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3<Real>; 3],
}

impl Triangle {
    pub const fn new(a: Point3<Real>, b: Point3<Real>, c: Point3<Real>) -> Self {
        Triangle {
            vertices: [a, b, c],
        }
    }

    /// Unnormalised normal, `(b - a) x (c - a)`; its length is twice the area.
    #[inline]
    pub fn normal(&self) -> Vector3<Real> {
        let [a, b, c] = &self.vertices;
        (b - a).cross(&(c - a))
    }

    /// Unit normal, or `None` for a degenerate triangle.
    pub fn unit_normal(&self) -> Option<Vector3<Real>> {
        self.normal().try_normalize(Real::EPSILON)
    }

    pub fn area(&self) -> Real {
        self.normal().norm() * 0.5
    }

    /// Length of the shortest side.
    pub fn shortest_edge(&self) -> Real {
        let [a, b, c] = &self.vertices;
        (b - a).norm().min((c - b).norm()).min((a - c).norm())
    }

    /// Signed volume of the tetrahedron spanned by the origin and this triangle.
    #[inline]
    pub fn signed_volume(&self) -> Real {
        let [a, b, c] = &self.vertices;
        a.coords.dot(&b.coords.cross(&c.coords)) / 6.0
    }

    /// Same triangle with the opposite winding.
    pub const fn flipped(&self) -> Self {
        let [a, b, c] = self.vertices;
        Triangle::new(a, c, b)
    }
}

/// Unindexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub const fn new() -> Self {
        Mesh {
            triangles: Vec::new(),
        }
    }

    pub const fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Mesh { triangles }
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    /// Enclosed volume via the divergence theorem.
    ///
    /// Only meaningful for a closed mesh, where it is positive when the
    /// triangles wind outward from the solid.
    #[cfg(not(feature = "parallel"))]
    pub fn signed_volume(&self) -> Real {
        self.triangles.iter().map(Triangle::signed_volume).sum()
    }

    /// Enclosed volume via the divergence theorem.
    ///
    /// Only meaningful for a closed mesh, where it is positive when the
    /// triangles wind outward from the solid.
    #[cfg(feature = "parallel")]
    pub fn signed_volume(&self) -> Real {
        self.triangles.par_iter().map(Triangle::signed_volume).sum()
    }

    pub fn surface_area(&self) -> Real {
        self.triangles.iter().map(Triangle::area).sum()
    }

    /// Shortest triangle side in the mesh, `None` when empty.
    pub fn shortest_edge(&self) -> Option<Real> {
        self.triangles
            .iter()
            .map(Triangle::shortest_edge)
            .min_by(Real::total_cmp)
    }

    /// Smallest axis-aligned box holding every vertex, `None` when empty.
    pub fn bounding_box(&self) -> Option<(Point3<Real>, Point3<Real>)> {
        let mut points = self.triangles.iter().flat_map(|t| t.vertices.iter());
        let first = *points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.inf(p), hi.sup(p))))
    }

    /// Reverse the winding of every triangle.
    pub fn flip(&mut self) {
        for tri in &mut self.triangles {
            *tri = tri.flipped();
        }
    }
}

impl From<Vec<Triangle>> for Mesh {
    fn from(triangles: Vec<Triangle>) -> Self {
        Mesh::from_triangles(triangles)
    }
}

impl<'a> IntoIterator for &'a Mesh {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Outward-wound unit cube from `min` with edge `size`.
    pub(crate) fn cube(min: Point3<Real>, size: Real) -> Mesh {
        let p = |x: Real, y: Real, z: Real| min + Vector3::new(x, y, z) * size;
        let quads = [
            [p(0., 0., 0.), p(0., 1., 0.), p(1., 1., 0.), p(1., 0., 0.)],
            [p(0., 0., 1.), p(1., 0., 1.), p(1., 1., 1.), p(0., 1., 1.)],
            [p(0., 0., 0.), p(1., 0., 0.), p(1., 0., 1.), p(0., 0., 1.)],
            [p(0., 1., 0.), p(0., 1., 1.), p(1., 1., 1.), p(1., 1., 0.)],
            [p(0., 0., 0.), p(0., 0., 1.), p(0., 1., 1.), p(0., 1., 0.)],
            [p(1., 0., 0.), p(1., 1., 0.), p(1., 1., 1.), p(1., 0., 1.)],
        ];
        let mut triangles = Vec::new();
        for [a, b, c, d] in quads {
            triangles.push(Triangle::new(a, b, c));
            triangles.push(Triangle::new(a, c, d));
        }
        Mesh::from_triangles(triangles)
    }

    #[test]
    fn cube_volume_and_area() {
        let mesh = cube(Point3::new(-1.0, 2.0, 0.5), 2.0);
        assert_eq!(mesh.len(), 12);
        assert_relative_eq!(mesh.signed_volume(), 8.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.surface_area(), 24.0, epsilon = 1e-12);

        let (lo, hi) = mesh.bounding_box().unwrap();
        assert_relative_eq!(lo, Point3::new(-1.0, 2.0, 0.5));
        assert_relative_eq!(hi, Point3::new(1.0, 4.0, 2.5));
    }

    #[test]
    fn flipping_negates_volume() {
        let mut mesh = cube(Point3::origin(), 1.0);
        mesh.flip();
        assert_relative_eq!(mesh.signed_volume(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert!(mesh.bounding_box().is_none());
        assert_eq!(mesh.signed_volume(), 0.0);
    }

    #[test]
    fn degenerate_triangle_has_no_unit_normal() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let tri = Triangle::new(p, p, Point3::origin());
        assert!(tri.unit_normal().is_none());
        assert_eq!(tri.area(), 0.0);
    }
}
