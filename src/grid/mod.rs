//! Regular sampling of a lattice field over a domain.
//!
//! Each axis of the domain is split into `ceil(extent / step)` cells of equal
//! spacing, never wider than `step`. Nodes sit at the cell centres, so every
//! domain face lies halfway between two node layers, and `margin` extra
//! layers are added outside each face. Node `(i, j, k)` is at
//! `domain.min + ((i, j, k) - margin + 0.5) * spacing`.
//!
//! Sampling is dispatched through [`SamplerOps`], with a rayon
//! implementation under the `parallel` feature.

pub mod serial;
pub mod traits;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use serial::SerialSamplerOps;
pub use traits::SamplerOps;

#[cfg(feature = "parallel")]
pub use parallel::ParallelSamplerOps;

use crate::domain::Domain;
use crate::errors::ConfigurationError;
use crate::field::evaluate;
use crate::float_types::{ISO_OFFSET_FRACTION, Real, TAU};
use crate::lattice::LatticeSpec;
use nalgebra::{Point3, Vector3};

/// Node layers added around the domain when no margin is given.
pub const DEFAULT_MARGIN: usize = 1;

/// Absorbs rounding in `extent / step` so exact multiples do not gain a cell.
const CELL_ROUNDING: Real = 1e-9;

/// Node counts along each axis of a sample grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl GridShape {
    pub const fn new(nx: usize, ny: usize, nz: usize) -> Self {
        GridShape { nx, ny, nz }
    }

    /// Total number of nodes.
    pub const fn len(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub const fn linearize(&self, [x, y, z]: [usize; 3]) -> usize {
        (z * self.ny + y) * self.nx + x
    }

    #[inline]
    pub const fn delinearize(&self, i: usize) -> [usize; 3] {
        let x = i % self.nx;
        let yz = i / self.nx;
        [x, yz % self.ny, yz / self.ny]
    }

    /// Cell counts along each axis.
    pub const fn cells(&self) -> [usize; 3] {
        [
            self.nx.saturating_sub(1),
            self.ny.saturating_sub(1),
            self.nz.saturating_sub(1),
        ]
    }
}

#[inline]
fn node_position(
    origin: &Point3<Real>,
    spacing: &Vector3<Real>,
    [i, j, k]: [usize; 3],
) -> Point3<Real> {
    Point3::new(
        origin.x + i as Real * spacing.x,
        origin.y + j as Real * spacing.y,
        origin.z + k as Real * spacing.z,
    )
}

/// Reject a sampling request before any work is done.
///
/// The shortest lattice wavelength must hold at least two steps, otherwise
/// the surface would alias.
pub fn check_sampling(
    step: Real,
    spec: &LatticeSpec,
    margin: usize,
) -> Result<(), ConfigurationError> {
    if !step.is_finite() {
        return Err(ConfigurationError::NonFiniteParameter("step"));
    }
    if step <= 0.0 {
        return Err(ConfigurationError::NonPositiveStep(step));
    }
    if margin == 0 {
        return Err(ConfigurationError::InvalidMargin);
    }
    let wavelength = spec.min_wavelength();
    let samples_per_period = wavelength / step;
    if samples_per_period < 2.0 {
        return Err(ConfigurationError::Undersampled {
            samples_per_period,
            wavelength,
            step,
        });
    }
    Ok(())
}

/// Cells the domain is split into along each axis at `step`.
pub fn cells_for(domain: &Domain, step: Real) -> [usize; 3] {
    let cells = |extent: Real| (extent / step - CELL_ROUNDING).ceil().max(1.0) as usize;
    let size = domain.size();
    [cells(size.x), cells(size.y), cells(size.z)]
}

/// Node counts covering `domain` at `step` with `margin` layers on each side.
pub fn shape_for(domain: &Domain, step: Real, margin: usize) -> GridShape {
    let [cx, cy, cz] = cells_for(domain, step);
    GridShape::new(cx + 2 * margin, cy + 2 * margin, cz + 2 * margin)
}

/// Per-axis node spacing: the domain extent over its cell count.
pub fn spacing_for(domain: &Domain, step: Real) -> Vector3<Real> {
    let [cx, cy, cz] = cells_for(domain, step);
    domain
        .size()
        .component_div(&Vector3::new(cx as Real, cy as Real, cz as Real))
}

/// Field values at the nodes of a regular grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleGrid {
    shape: GridShape,
    origin: Point3<Real>,
    step: Real,
    spacing: Vector3<Real>,
    margin: usize,
    domain: Domain,
    lattice: LatticeSpec,
    values: Vec<Real>,
}

impl SampleGrid {
    /// Sample the raw field with [`DEFAULT_MARGIN`] layers around `domain`.
    pub fn sample(
        domain: &Domain,
        step: Real,
        spec: &LatticeSpec,
    ) -> Result<Self, ConfigurationError> {
        Self::sample_with_margin(domain, step, spec, DEFAULT_MARGIN)
    }

    pub fn sample_with_margin(
        domain: &Domain,
        step: Real,
        spec: &LatticeSpec,
        margin: usize,
    ) -> Result<Self, ConfigurationError> {
        #[cfg(not(feature = "parallel"))]
        let ops = SerialSamplerOps::new();
        #[cfg(feature = "parallel")]
        let ops = ParallelSamplerOps::new();

        Self::sample_with(&ops, domain, step, spec, margin)
    }

    /// Sample using an explicit [`SamplerOps`] implementation.
    pub fn sample_with<O: SamplerOps>(
        ops: &O,
        domain: &Domain,
        step: Real,
        spec: &LatticeSpec,
        margin: usize,
    ) -> Result<Self, ConfigurationError> {
        check_sampling(step, spec, margin)?;

        let shape = shape_for(domain, step, margin);
        let spacing = spacing_for(domain, step);
        let origin = domain.min() - spacing * (margin as Real - 0.5);
        let values = ops.sample(shape.len(), |i| {
            evaluate(&node_position(&origin, &spacing, shape.delinearize(i)), spec)
        });

        log::debug!(
            "sampled {}x{}x{} nodes at spacing [{:.4}, {:.4}, {:.4}] from origin [{:.4}, {:.4}, {:.4}]",
            shape.nx,
            shape.ny,
            shape.nz,
            spacing.x,
            spacing.y,
            spacing.z,
            origin.x,
            origin.y,
            origin.z
        );

        Ok(SampleGrid {
            shape,
            origin,
            step,
            spacing,
            margin,
            domain: *domain,
            lattice: spec.clone(),
            values,
        })
    }

    /// Close the solid at the domain faces.
    ///
    /// Each value becomes `isovalue + min(value - isovalue, k * d)`, where `d`
    /// is the node's signed distance to the nearest domain face (positive
    /// inside) and `k = 2π * max_frequency` matches the field's steepest
    /// slope. Nodes outside the domain turn into pore, and solid regions
    /// reaching a face get a planar cap lying on that face.
    ///
    /// Faces sit halfway between node layers, so capped nodes stay at least
    /// `k * spacing / 2` away from the isovalue and never produce crossings
    /// at a node.
    pub fn cap_to_domain(&mut self, isovalue: Real) {
        #[cfg(not(feature = "parallel"))]
        let ops = SerialSamplerOps::new();
        #[cfg(feature = "parallel")]
        let ops = ParallelSamplerOps::new();

        self.cap_to_domain_with(&ops, isovalue);
    }

    pub fn cap_to_domain_with<O: SamplerOps>(&mut self, ops: &O, isovalue: Real) {
        let slope = TAU * self.lattice.max_frequency();
        let (origin, spacing, shape, domain) = (self.origin, self.spacing, self.shape, self.domain);

        ops.remap(&mut self.values, |i, value| {
            let p = node_position(&origin, &spacing, shape.delinearize(i));
            isovalue + (value - isovalue).min(slope * domain.face_distance(&p))
        });
    }

    /// Sample at node `(x, y, z)`.
    #[inline]
    pub fn value(&self, x: usize, y: usize, z: usize) -> Real {
        self.values[self.shape.linearize([x, y, z])]
    }

    /// World position of node `(x, y, z)`.
    #[inline]
    pub fn point(&self, x: usize, y: usize, z: usize) -> Point3<Real> {
        node_position(&self.origin, &self.spacing, [x, y, z])
    }

    /// Samples within this distance of an isovalue are read as lying on its
    /// solid side: [`ISO_OFFSET_FRACTION`] of the field's steepest change
    /// across the narrowest cell.
    pub fn iso_offset(&self) -> Real {
        ISO_OFFSET_FRACTION * TAU * self.lattice.max_frequency() * self.spacing.min()
    }

    pub const fn shape(&self) -> GridShape {
        self.shape
    }

    pub const fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Requested sampling step, an upper bound of [`Self::spacing`].
    pub const fn step(&self) -> Real {
        self.step
    }

    /// Node spacing along each axis.
    pub const fn spacing(&self) -> &Vector3<Real> {
        &self.spacing
    }

    pub const fn origin(&self) -> &Point3<Real> {
        &self.origin
    }

    pub const fn margin(&self) -> usize {
        self.margin
    }

    pub const fn lattice(&self) -> &LatticeSpec {
        &self.lattice
    }

    /// Node values in `linearize` order.
    pub fn values(&self) -> &[Real] {
        &self.values
    }

    /// Smallest and largest sampled value.
    pub fn value_range(&self) -> (Real, Real) {
        self.values
            .iter()
            .fold((Real::INFINITY, Real::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            })
    }
}
