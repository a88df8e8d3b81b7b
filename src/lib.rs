//! Watertight triangle meshes of **triply periodic minimal surface (TPMS)**
//! lattices: gyroid, sheet gyroid and diamond.
//!
//! A [`LatticeSpec`](lattice::LatticeSpec) fixes the family, per-axis spatial
//! frequency, orientation and porosity. The [`Pipeline`](pipeline::Pipeline)
//! turns it into a mesh over a [`Domain`](domain::Domain):
//! 1. the [isovalue solver](isovalue) finds the threshold whose pore volume
//!    fraction equals the porosity,
//! 2. the [grid sampler](grid) evaluates the [field](field) on a regular grid,
//! 3. the [extractor](extract) runs marching cubes over the grid,
//! 4. the [clipper](clip) trims the result to the domain.
//!
//! ```rust
//! use nalgebra::Vector3;
//! use tpms_mesh::{Domain, LatticeSpec, MeshRequest, Pipeline, TpmsFamily};
//!
//! let lattice = LatticeSpec::new(TpmsFamily::Gyroid, Vector3::repeat(1.0), 0.5)?;
//! let domain = Domain::from_extents(Vector3::repeat(1.0))?;
//! let mesh = Pipeline::default().generate(&MeshRequest::new(lattice, domain).with_step(0.1))?;
//! assert!(mesh.analyze_manifold().is_closed());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - **parallel**: use rayon for multithreaded sampling, extraction and clipping
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` export
//! - **cli**: the `tpms-mesh` command line tool
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod clip;
pub mod domain;
pub mod errors;
pub mod extract;
pub mod field;
pub mod float_types;
pub mod grid;
pub mod io;
pub mod isovalue;
pub mod lattice;
pub mod mesh;
pub mod pipeline;

#[cfg(any(
    all(feature = "f64", feature = "f32"),
    not(any(feature = "f64", feature = "f32"))
))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use domain::Domain;
pub use errors::{ConfigurationError, NumericalError, TpmsError};
pub use field::evaluate;
pub use isovalue::{IsovalueSolver, SolverConfig};
pub use lattice::{LatticeSpec, TpmsFamily};
pub use mesh::{Mesh, Triangle};
pub use pipeline::{Boundary, MeshRequest, Pipeline, generate};
