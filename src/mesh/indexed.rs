//! Vertex welding into a shared-vertex (indexed) mesh.

use crate::float_types::Real;
use crate::mesh::{Mesh, Triangle};
use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;

/// Shared-vertex form of a [`Mesh`]; `faces` index into `vertices`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    pub vertices: Vec<Point3<Real>>,
    pub faces: Vec<[usize; 3]>,
}

/// Exact-bit key for a point. `+ 0.0` folds `-0.0` onto `0.0`.
pub(crate) type PointKey = [u64; 3];

#[inline]
pub(crate) fn point_key(p: &Point3<Real>) -> PointKey {
    #[allow(clippy::unnecessary_cast)]
    [p.x, p.y, p.z].map(|c| ((c + 0.0) as f64).to_bits())
}

impl Mesh {
    /// Weld vertices with bitwise-identical coordinates.
    ///
    /// Extraction interpolates every shared cell edge in the same direction,
    /// so vertices that belong together are exactly equal and no distance
    /// threshold is needed.
    pub fn to_indexed(&self) -> IndexedMesh {
        let mut lookup: HashMap<PointKey, usize> = HashMap::with_capacity(self.len() / 2);
        let mut vertices = Vec::with_capacity(self.len() / 2);
        let mut faces = Vec::with_capacity(self.len());

        for tri in &self.triangles {
            let face = tri.vertices.map(|p| {
                *lookup.entry(point_key(&p)).or_insert_with(|| {
                    vertices.push(p);
                    vertices.len() - 1
                })
            });
            faces.push(face);
        }

        IndexedMesh { vertices, faces }
    }
}

impl IndexedMesh {
    /// Expand back into a triangle list.
    pub fn to_mesh(&self) -> Mesh {
        Mesh::from_triangles(
            self.faces
                .iter()
                .map(|&[a, b, c]| {
                    Triangle::new(self.vertices[a], self.vertices[b], self.vertices[c])
                })
                .collect(),
        )
    }

    /// Euler characteristic `V - E + F`; 2 for a closed genus-0 surface.
    pub fn euler_characteristic(&self) -> i64 {
        let mut edges = HashSet::with_capacity(self.faces.len() * 3 / 2);
        for &[a, b, c] in &self.faces {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                edges.insert((u.min(v), u.max(v)));
            }
        }
        self.vertices.len() as i64 - edges.len() as i64 + self.faces.len() as i64
    }
}
