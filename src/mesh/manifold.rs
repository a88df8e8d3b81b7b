use crate::mesh::Mesh;
use crate::mesh::indexed::IndexedMesh;
use hashbrown::HashMap;

/// Edge statistics of a welded mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManifoldReport {
    /// Edges used by exactly one triangle
    pub boundary_edges: usize,
    /// Edges shared by more than two triangles
    pub non_manifold_edges: usize,
    /// Edges whose two triangles traverse them in the same direction
    pub inconsistent_edges: usize,
    /// Triangles with two welded corners
    pub degenerate_faces: usize,
}

impl ManifoldReport {
    /// Every edge is shared by exactly two oppositely wound triangles.
    pub const fn is_closed(&self) -> bool {
        self.boundary_edges == 0 && self.non_manifold_edges == 0 && self.inconsistent_edges == 0
    }
}

impl IndexedMesh {
    pub fn analyze_manifold(&self) -> ManifoldReport {
        let mut report = ManifoldReport::default();
        let mut directed: HashMap<(usize, usize), u32> = HashMap::with_capacity(self.faces.len() * 3);

        for &[a, b, c] in &self.faces {
            if a == b || b == c || c == a {
                report.degenerate_faces += 1;
            }
            for edge in [(a, b), (b, c), (c, a)] {
                *directed.entry(edge).or_insert(0) += 1;
            }
        }

        for (&(u, v), &forward) in &directed {
            // visit each undirected edge once
            if u > v && directed.contains_key(&(v, u)) {
                continue;
            }
            let backward = directed.get(&(v, u)).copied().unwrap_or(0);
            match forward + backward {
                1 => report.boundary_edges += 1,
                2 if forward == 1 => {},
                2 => report.inconsistent_edges += 1,
                _ => report.non_manifold_edges += 1,
            }
        }

        report
    }
}

impl Mesh {
    /// Weld the mesh and count boundary, non-manifold and inconsistently
    /// oriented edges.
    ///
    /// ```rust
    /// # use tpms_mesh::mesh::Mesh;
    /// assert!(Mesh::new().analyze_manifold().is_closed());
    /// ```
    pub fn analyze_manifold(&self) -> ManifoldReport {
        self.to_indexed().analyze_manifold()
    }

    /// Shorthand for `analyze_manifold().is_closed()`.
    pub fn is_manifold(&self) -> bool {
        self.analyze_manifold().is_closed()
    }
}
