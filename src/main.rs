//! `tpms-mesh`: write a TPMS lattice block to an STL file.
//!
//! ```text
//! tpms-mesh part.stl gyroid 2 2 2 0 45 0 0.6 --step-size 0.1 --num-periods 5
//! ```

use clap::{ArgGroup, Parser};
use nalgebra::Vector3;
use std::error::Error;
use std::path::PathBuf;
use tpms_mesh::float_types::Real;
use tpms_mesh::io::stl::{StlFormat, write_stl};
use tpms_mesh::pipeline::DEFAULT_STEP;
use tpms_mesh::{Boundary, Domain, LatticeSpec, MeshRequest, Pipeline, TpmsFamily};

/// Unit-cell count used when no size option is given.
const DEFAULT_PERIODS: u32 = 4;

#[derive(Parser, Debug)]
#[command(name = "tpms-mesh", version, about = "Generate STL files of gyroid, sheet-gyroid or diamond TPMS lattices", long_about = None)]
#[command(allow_negative_numbers = true)]
#[command(group(ArgGroup::new("size").args(["num_periods", "periods", "box_size"])))]
struct Cli {
    /// Name of the STL file to write
    filename: PathBuf,

    /// Lattice family (`gyroid`, `sheet-gyroid` or `diamond`)
    tpms: TpmsFamily,

    /// Wavelength (unit-cell size) along x
    lambda_x: Real,
    /// Wavelength along y
    lambda_y: Real,
    /// Wavelength along z
    lambda_z: Real,

    /// Lattice rotation about the x axis, degrees in [0, 90]
    theta_x: Real,
    /// Lattice rotation about the y axis, degrees in [0, 90]
    theta_y: Real,
    /// Lattice rotation about the z axis, degrees in [0, 90]
    theta_z: Real,

    /// Pore volume fraction, strictly between 0 and 1
    porosity: Real,

    /// Sampling step, in the same units as the wavelengths
    #[arg(short = 's', long = "step-size", visible_alias = "step_size", default_value_t = DEFAULT_STEP)]
    step_size: Real,

    /// Size of the block in unit cells along every axis [default: 4]
    #[arg(short = 'n', long = "num-periods", visible_alias = "num_periods")]
    num_periods: Option<u32>,

    /// Size of the block in unit cells per axis
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"])]
    periods: Option<Vec<Real>>,

    /// Size of the block in millimetres per axis
    #[arg(long = "box", num_args = 3, value_names = ["X", "Y", "Z"])]
    box_size: Option<Vec<Real>>,

    /// Leave the lattice surface open at the block faces instead of capping it
    #[arg(long)]
    open: bool,

    /// Write ASCII instead of binary STL
    #[arg(long)]
    ascii: bool,

    /// Log progress (same as RUST_LOG=info)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn wavelengths(&self) -> Vector3<Real> {
        Vector3::new(self.lambda_x, self.lambda_y, self.lambda_z)
    }

    fn check_angles(&self) -> Result<(), String> {
        for (name, value) in [
            ("theta_x", self.theta_x),
            ("theta_y", self.theta_y),
            ("theta_z", self.theta_z),
        ] {
            if !(0.0..=90.0).contains(&value) {
                return Err(format!(
                    "the `{name}` argument must be between 0 and 90 -- you provided {value}"
                ));
            }
        }
        Ok(())
    }

    fn domain(&self) -> Result<Domain, Box<dyn Error>> {
        let domain = if let Some(size) = &self.box_size {
            Domain::centered(Vector3::from_column_slice(size))?
        } else if let Some(counts) = &self.periods {
            Domain::from_periods(self.wavelengths(), Vector3::from_column_slice(counts))?
        } else {
            let n = self.num_periods.unwrap_or(DEFAULT_PERIODS) as Real;
            Domain::from_periods(self.wavelengths(), Vector3::repeat(n))?
        };
        Ok(domain)
    }

    fn lattice(&self) -> Result<LatticeSpec, Box<dyn Error>> {
        self.check_angles()?;
        let lattice = LatticeSpec::from_wavelengths(self.tpms, self.wavelengths(), self.porosity)?
            .with_rotation_degrees(self.theta_x, self.theta_y, self.theta_z)?;
        Ok(lattice)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let boundary = if cli.open {
        Boundary::Open
    } else {
        Boundary::Capped
    };
    let request = MeshRequest::new(cli.lattice()?, cli.domain()?)
        .with_step(cli.step_size)
        .with_boundary(boundary);

    let mesh = Pipeline::default().generate(&request)?;

    let format = if cli.ascii {
        StlFormat::Ascii
    } else {
        StlFormat::Binary
    };
    let name = cli
        .filename
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("tpms");
    write_stl(&mesh, &cli.filename, name, format)?;

    log::info!("wrote {} triangles to {}", mesh.len(), cli.filename.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_positional_parameters() {
        let cli = Cli::try_parse_from([
            "tpms-mesh", "out.stl", "diamond", "2", "2", "3", "0", "45", "90", "0.7", "-s", "0.1",
        ])
        .unwrap();
        assert_eq!(cli.tpms, TpmsFamily::Diamond);
        assert_eq!(cli.step_size, 0.1);
        let domain = cli.domain().unwrap();
        assert_eq!(domain.size(), Vector3::new(8.0, 8.0, 12.0));
        assert!(cli.lattice().is_ok());
    }

    #[test]
    fn size_options_are_exclusive() {
        let args = [
            "tpms-mesh", "out.stl", "gyroid", "1", "1", "1", "0", "0", "0", "0.5", "-n", "2",
            "--box", "5", "5", "5",
        ];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn rejects_out_of_range_angles() {
        let cli = Cli::try_parse_from([
            "tpms-mesh", "out.stl", "gyroid", "1", "1", "1", "-5", "0", "0", "0.5",
        ])
        .unwrap();
        assert!(cli.lattice().is_err());
    }
}
