//! Trimming a mesh to the domain box.
//!
//! Every triangle is clipped against the six inward-facing planes of the
//! domain in turn and the surviving polygon is fanned back into triangles.
//! Points within [`tolerance`] of a plane count as on it and are kept.

use crate::domain::Domain;
use crate::float_types::{Real, tolerance};
use crate::mesh::{Mesh, Triangle};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// Point classification against a plane
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// Plane `normal · p = w`. The side the normal points to is FRONT.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal
    pub normal: Vector3<Real>,
    pub w: Real,
}

impl Plane {
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        let length = normal.norm();
        Plane {
            normal: normal / length,
            w: w / length,
        }
    }

    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    #[inline]
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let distance = self.signed_distance(point);
        let tol = tolerance();
        if distance > tol {
            FRONT
        } else if distance < -tol {
            BACK
        } else {
            COPLANAR
        }
    }

    /// Keep the part of a convex polygon that is not BACK.
    ///
    /// Crossing points are always interpolated from the FRONT vertex toward
    /// the BACK one, so an edge shared by two polygons is cut at exactly the
    /// same point whichever way round it is traversed.
    pub fn clip_polygon(&self, polygon: &[Point3<Real>]) -> Vec<Point3<Real>> {
        let types: Vec<i8> = polygon.iter().map(|p| self.orient_point(p)).collect();
        let polygon_type = types.iter().fold(0, |acc, &t| acc | t);

        match polygon_type {
            BACK => return Vec::new(),
            COPLANAR | FRONT => return polygon.to_vec(),
            _ => {},
        }

        let mut kept = Vec::with_capacity(polygon.len() + 1);
        for i in 0..polygon.len() {
            let j = (i + 1) % polygon.len();
            let (type_i, type_j) = (types[i], types[j]);
            let (vertex_i, vertex_j) = (&polygon[i], &polygon[j]);

            if type_i != BACK {
                kept.push(*vertex_i);
            }
            if (type_i | type_j) == SPANNING {
                let (inside, outside) = if type_i == FRONT {
                    (vertex_i, vertex_j)
                } else {
                    (vertex_j, vertex_i)
                };
                kept.push(self.intersect(inside, outside));
            }
        }
        kept
    }

    #[inline]
    fn intersect(&self, inside: &Point3<Real>, outside: &Point3<Real>) -> Point3<Real> {
        let d_in = self.signed_distance(inside);
        let d_out = self.signed_distance(outside);
        let t = d_in / (d_in - d_out);
        inside + (outside - inside) * t
    }
}

/// The six planes bounding `domain`, normals pointing inward.
pub fn domain_planes(domain: &Domain) -> [Plane; 6] {
    let (min, max) = (domain.min(), domain.max());
    [
        Plane::from_normal(Vector3::x(), min.x),
        Plane::from_normal(-Vector3::x(), -max.x),
        Plane::from_normal(Vector3::y(), min.y),
        Plane::from_normal(-Vector3::y(), -max.y),
        Plane::from_normal(Vector3::z(), min.z),
        Plane::from_normal(-Vector3::z(), -max.z),
    ]
}

/// Clip `tri` to the planes and append what survives to `out`.
pub fn clip_triangle(tri: &Triangle, domain: &Domain, planes: &[Plane; 6], out: &mut Vec<Triangle>) {
    let tol = tolerance();
    if tri.vertices.iter().all(|p| domain.contains(p, tol)) {
        out.push(*tri);
        return;
    }

    let mut polygon = tri.vertices.to_vec();
    for plane in planes {
        polygon = plane.clip_polygon(&polygon);
        if polygon.len() < 3 {
            return;
        }
    }

    for i in 1..polygon.len() - 1 {
        out.push(Triangle::new(polygon[0], polygon[i], polygon[i + 1]));
    }
}

/// Trim `mesh` to `domain`, preserving triangle order and winding.
pub fn clip(mesh: Mesh, domain: &Domain) -> Mesh {
    let planes = domain_planes(domain);
    let before = mesh.len();

    #[cfg(not(feature = "parallel"))]
    let triangles = {
        let mut out = Vec::with_capacity(before);
        for tri in &mesh.triangles {
            clip_triangle(tri, domain, &planes, &mut out);
        }
        out
    };

    #[cfg(feature = "parallel")]
    let triangles = {
        let chunks: Vec<Vec<Triangle>> = mesh
            .triangles
            .par_chunks(4096)
            .map(|chunk| {
                let mut out = Vec::with_capacity(chunk.len());
                for tri in chunk {
                    clip_triangle(tri, domain, &planes, &mut out);
                }
                out
            })
            .collect();
        chunks.concat()
    };

    log::debug!("clipped {before} triangles to {}", triangles.len());
    Mesh::from_triangles(triangles)
}
