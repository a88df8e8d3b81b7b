//! End-to-end mesh generation: solve, sample, extract, clip.

use crate::clip::clip;
use crate::domain::Domain;
use crate::errors::{ConfigurationError, TpmsError};
use crate::extract::extract;
use crate::float_types::Real;
use crate::grid::{DEFAULT_MARGIN, SampleGrid, check_sampling};
use crate::isovalue::{IsovalueSolver, SolverConfig};
use crate::lattice::LatticeSpec;
use crate::mesh::Mesh;

/// Default sampling step in world units.
pub const DEFAULT_STEP: Real = 0.2;

/// How the lattice is terminated at the domain faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Boundary {
    /// Close the solid with planar caps on the domain faces; the result is a
    /// watertight solid.
    #[default]
    Capped,
    /// Mesh only the lattice surface and trim it at the domain faces,
    /// leaving an open sheet.
    Open,
}

/// Everything one pipeline run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRequest {
    pub lattice: LatticeSpec,
    pub domain: Domain,
    pub step: Real,
    pub boundary: Boundary,
    pub margin: usize,
}

impl MeshRequest {
    /// Capped request at [`DEFAULT_STEP`] with the default margin.
    pub fn new(lattice: LatticeSpec, domain: Domain) -> Self {
        MeshRequest {
            lattice,
            domain,
            step: DEFAULT_STEP,
            boundary: Boundary::default(),
            margin: DEFAULT_MARGIN,
        }
    }

    pub fn with_step(mut self, step: Real) -> Self {
        self.step = step;
        self
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }

    /// Check step, margin and sampling density without doing any work.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        check_sampling(self.step, &self.lattice, self.margin)
    }
}

/// Runs mesh generation requests, reusing solved isovalues between runs.
#[derive(Debug, Default)]
pub struct Pipeline {
    solver: IsovalueSolver,
}

impl Pipeline {
    pub fn new(config: SolverConfig) -> Self {
        Pipeline {
            solver: IsovalueSolver::new(config),
        }
    }

    pub const fn solver(&self) -> &IsovalueSolver {
        &self.solver
    }

    /// Generate the mesh for `request`.
    ///
    /// An empty mesh is a valid result: it means the isovalue falls outside
    /// the sampled value range, so the domain is entirely pore or solid.
    pub fn generate(&self, request: &MeshRequest) -> Result<Mesh, TpmsError> {
        request.validate()?;
        let lattice = &request.lattice;

        let isovalue = self.solver.solve(lattice)?;
        let mut grid =
            SampleGrid::sample_with_margin(&request.domain, request.step, lattice, request.margin)?;
        if request.boundary == Boundary::Capped {
            grid.cap_to_domain(isovalue);
        }

        let mesh = clip(extract(&grid, isovalue), &request.domain);

        let (min, max) = (request.domain.min(), request.domain.max());
        log::info!(
            "{} lattice, porosity {}, isovalue {isovalue:.6}: bounds [{:.3}, {:.3}, {:.3}] to [{:.3}, {:.3}, {:.3}], step {}, {} triangles",
            lattice.family(),
            lattice.porosity(),
            min.x,
            min.y,
            min.z,
            max.x,
            max.y,
            max.z,
            request.step,
            mesh.len()
        );
        if mesh.is_empty() {
            log::warn!("no isosurface crossing found; the domain is entirely pore or solid");
        }

        Ok(mesh)
    }
}

/// One-shot generation with a fresh default solver.
pub fn generate(request: &MeshRequest) -> Result<Mesh, TpmsError> {
    Pipeline::default().generate(request)
}
