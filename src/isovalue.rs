//! Porosity to isovalue conversion.
//!
//! The value distribution of a TPMS field over one full unit cell does not
//! depend on frequency or rotation, so every family is sampled once on a
//! canonical cell and the isovalue for a porosity is read off the sorted
//! samples as an empirical quantile.
//!
//! Each family keeps two sample sets on differently offset grids. The
//! isovalue is read from the first and its porosity is measured on the
//! second, so a bias in either set shows up as a miss instead of passing
//! unnoticed.

use crate::errors::{NumericalError, TpmsError};
use crate::float_types::{Real, TAU};
use crate::lattice::{LatticeSpec, TpmsFamily, validate_porosity};
use hashbrown::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Per-axis offset of the solve grid, in units of its spacing.
///
/// Cell midpoints (0.5) line up with the symmetry planes of the sheet gyroid
/// and bias its quantiles by a few 1e-3.
const SOLVE_OFFSET: [Real; 3] = [0.31, 0.31, 0.31];
/// Per-axis offset of the check grid.
const CHECK_OFFSET: [Real; 3] = [0.71, 0.23, 0.57];

/// Knobs of the canonical-cell solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Samples per axis of the grid the isovalue is read from (`resolution^3` in total).
    pub resolution: usize,
    /// Samples per axis of the independent grid the result is checked on.
    pub check_resolution: usize,
    /// Largest accepted difference between requested and achieved porosity.
    pub tolerance: Real,
    /// Number of solved isovalues kept before the cache is flushed.
    pub cache_capacity: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            resolution: 96,
            check_resolution: 89,
            tolerance: 1e-3,
            cache_capacity: 256,
        }
    }
}

type CacheKey = (TpmsFamily, i64);

/// Sorted canonical-cell samples of one family.
#[derive(Debug)]
struct Distribution {
    solve: Vec<Real>,
    check: Vec<Real>,
}

/// Maps `(family, porosity)` to the isovalue whose sublevel set has that
/// volume fraction.
///
/// Shareable across threads by reference: the per-family distributions are
/// built at most once and solved isovalues are memoised behind an `RwLock`.
#[derive(Debug)]
pub struct IsovalueSolver {
    config: SolverConfig,
    distributions: [OnceLock<Result<Distribution, NumericalError>>; 3],
    cache: RwLock<HashMap<CacheKey, Real>>,
}

impl Default for IsovalueSolver {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl IsovalueSolver {
    pub fn new(config: SolverConfig) -> Self {
        let config = SolverConfig {
            resolution: config.resolution.max(2),
            check_resolution: config.check_resolution.max(2),
            tolerance: if config.tolerance > 0.0 { config.tolerance } else { 1e-3 },
            cache_capacity: config.cache_capacity,
        };
        IsovalueSolver {
            config,
            distributions: [OnceLock::new(), OnceLock::new(), OnceLock::new()],
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Isovalue for `spec.family()` at `spec.porosity()`.
    pub fn solve(&self, spec: &LatticeSpec) -> Result<Real, TpmsError> {
        self.solve_family(spec.family(), spec.porosity())
    }

    /// Isovalue `t` such that the fraction of the unit cell where
    /// `field < t` equals `porosity` within the configured tolerance.
    ///
    /// The porosity actually achieved is measured on the check grid; a miss
    /// larger than the tolerance is [`NumericalError::SolverDidNotConverge`].
    pub fn solve_family(&self, family: TpmsFamily, porosity: Real) -> Result<Real, TpmsError> {
        validate_porosity(porosity)?;

        let key = self.cache_key(family, porosity);
        if let Some(iso) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(*iso);
        }

        let distribution = self.distribution(family)?;
        let iso = quantile(&distribution.solve, porosity);

        let achieved = fraction_below(&distribution.check, iso);
        if (achieved - porosity).abs() > self.config.tolerance {
            return Err(NumericalError::SolverDidNotConverge {
                family,
                porosity,
                achieved,
                tolerance: self.config.tolerance,
            }
            .into());
        }
        log::debug!(
            "solved {family} isovalue {iso:.6} for porosity {porosity} (achieved {achieved:.6})"
        );

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if cache.len() >= self.config.cache_capacity {
            cache.clear();
        }
        if self.config.cache_capacity > 0 {
            cache.insert(key, iso);
        }
        Ok(iso)
    }

    /// Fraction of the canonical unit cell where the field is below
    /// `isovalue`, measured on the check grid.
    pub fn volume_fraction_below(
        &self,
        family: TpmsFamily,
        isovalue: Real,
    ) -> Result<Real, NumericalError> {
        Ok(fraction_below(&self.distribution(family)?.check, isovalue))
    }

    /// Number of isovalues currently memoised.
    pub fn cached_entries(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn cache_key(&self, family: TpmsFamily, porosity: Real) -> CacheKey {
        let quantum = self.config.tolerance / 10.0;
        (family, (porosity / quantum).round() as i64)
    }

    fn distribution(&self, family: TpmsFamily) -> Result<&Distribution, NumericalError> {
        self.distributions[family.index()]
            .get_or_init(|| {
                Ok(Distribution {
                    solve: sample_canonical_cell(family, self.config.resolution, SOLVE_OFFSET)?,
                    check: sample_canonical_cell(
                        family,
                        self.config.check_resolution,
                        CHECK_OFFSET,
                    )?,
                })
            })
            .as_ref()
            .map_err(Clone::clone)
    }
}

/// Sorted field values on a `resolution^3` grid over `[0, 2π)^3`, shifted
/// by `offset` sample spacings per axis.
pub fn sample_canonical_cell(
    family: TpmsFamily,
    resolution: usize,
    offset: [Real; 3],
) -> Result<Vec<Real>, NumericalError> {
    let n = resolution;
    let axis = |o: Real| -> Vec<Real> {
        (0..n)
            .map(|i| (i as Real + o) / n as Real * TAU)
            .collect()
    };
    let (xs, ys, zs) = (axis(offset[0]), axis(offset[1]), axis(offset[2]));
    let value_at = |index: usize| {
        let x = xs[index % n];
        let y = ys[(index / n) % n];
        let z = zs[index / (n * n)];
        family.canonical(x, y, z)
    };

    #[cfg(feature = "parallel")]
    let mut samples: Vec<Real> = (0..n * n * n).into_par_iter().map(value_at).collect();
    #[cfg(not(feature = "parallel"))]
    let mut samples: Vec<Real> = (0..n * n * n).map(value_at).collect();

    if samples.iter().any(|v| !v.is_finite()) {
        return Err(NumericalError::NonFiniteField { family });
    }

    #[cfg(feature = "parallel")]
    samples.par_sort_unstable_by(Real::total_cmp);
    #[cfg(not(feature = "parallel"))]
    samples.sort_unstable_by(Real::total_cmp);

    log::debug!(
        "sampled canonical {family} cell: {} values in [{:.4}, {:.4}]",
        samples.len(),
        samples[0],
        samples[samples.len() - 1]
    );
    Ok(samples)
}

/// Linearly interpolated empirical quantile of sorted `samples`.
///
/// Sample `i` is taken to sit at cumulative fraction `(i + 0.5) / n`.
fn quantile(samples: &[Real], p: Real) -> Real {
    let n = samples.len();
    let pos = p * n as Real - 0.5;
    let i = (pos.floor().max(0.0) as usize).min(n - 2);
    let frac = (pos - i as Real).clamp(0.0, 1.0);
    samples[i] + (samples[i + 1] - samples[i]) * frac
}

/// Fraction of sorted `samples` strictly below `isovalue`.
pub fn fraction_below(samples: &[Real], isovalue: Real) -> Real {
    samples.partition_point(|v| *v < isovalue) as Real / samples.len() as Real
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConfigurationError;
    use approx::assert_relative_eq;

    fn small() -> IsovalueSolver {
        IsovalueSolver::new(SolverConfig {
            resolution: 32,
            tolerance: 1e-2,
            ..SolverConfig::default()
        })
    }

    #[test]
    fn quantile_interpolates_between_order_statistics() {
        let s = [0.0, 1.0, 2.0, 3.0];
        assert_relative_eq!(quantile(&s, 0.5), 1.5);
        assert_relative_eq!(quantile(&s, 0.125), 0.0);
        assert_relative_eq!(quantile(&s, 0.01), 0.0);
        assert_relative_eq!(quantile(&s, 0.99), 3.0);
    }

    #[test]
    fn half_porosity_is_zero_for_odd_fields() {
        let solver = small();
        for family in [TpmsFamily::Gyroid, TpmsFamily::Diamond] {
            let iso = solver.solve_family(family, 0.5).unwrap();
            assert!(iso.abs() < 1e-2, "{family} isovalue {iso}");
        }
    }

    #[test]
    fn sheet_isovalues_are_negative() {
        let solver = small();
        for p in [0.1, 0.5, 0.9] {
            assert!(solver.solve_family(TpmsFamily::SheetGyroid, p).unwrap() < 0.0);
        }
    }

    #[test]
    fn isovalue_increases_with_porosity() {
        let solver = small();
        for family in TpmsFamily::ALL {
            let lo = solver.solve_family(family, 0.2).unwrap();
            let hi = solver.solve_family(family, 0.8).unwrap();
            assert!(lo < hi);
        }
    }

    #[test]
    fn cache_reuses_nearby_porosities() {
        let solver = small();
        let a = solver.solve_family(TpmsFamily::Gyroid, 0.3).unwrap();
        let b = solver.solve_family(TpmsFamily::Gyroid, 0.300_01).unwrap();
        assert_eq!(a, b);
        assert_eq!(solver.cached_entries(), 1);
        solver.solve_family(TpmsFamily::Diamond, 0.3).unwrap();
        assert_eq!(solver.cached_entries(), 2);
    }

    #[test]
    fn cache_is_bounded() {
        let solver = IsovalueSolver::new(SolverConfig {
            resolution: 16,
            tolerance: 2e-2,
            cache_capacity: 3,
            ..SolverConfig::default()
        });
        for p in [0.1, 0.2, 0.3, 0.4, 0.5] {
            solver.solve_family(TpmsFamily::Gyroid, p).unwrap();
            assert!(solver.cached_entries() <= 3);
        }
    }

    #[test]
    fn rejects_degenerate_porosity() {
        let err = small().solve_family(TpmsFamily::Gyroid, 1.0).unwrap_err();
        assert_eq!(
            err,
            TpmsError::Configuration(ConfigurationError::PorosityOutOfRange(1.0))
        );
    }

    #[test]
    fn unreachable_tolerance_is_reported() {
        // 8 samples per cell cannot resolve porosity to 1e-6
        let solver = IsovalueSolver::new(SolverConfig {
            resolution: 2,
            tolerance: 1e-6,
            cache_capacity: 4,
            ..SolverConfig::default()
        });
        let err = solver.solve_family(TpmsFamily::Diamond, 0.33).unwrap_err();
        assert!(matches!(
            err,
            TpmsError::Numerical(NumericalError::SolverDidNotConverge { .. })
        ));
        assert_eq!(solver.cached_entries(), 0);
    }

    #[test]
    fn coarse_solve_grid_misses_on_the_check_grid() {
        // 2^3 samples put the diamond isovalue far from its true quantile,
        // which only the independent check grid can see
        let solver = IsovalueSolver::new(SolverConfig {
            resolution: 2,
            tolerance: 0.05,
            ..SolverConfig::default()
        });
        match solver.solve_family(TpmsFamily::Diamond, 0.33) {
            Err(TpmsError::Numerical(NumericalError::SolverDidNotConverge {
                achieved, ..
            })) => assert!((achieved - 0.33).abs() > 0.05),
            other => panic!("expected a miss, got {other:?}"),
        }
    }

    #[test]
    fn solve_and_check_grids_are_distinct() {
        let solve = sample_canonical_cell(TpmsFamily::SheetGyroid, 8, SOLVE_OFFSET).unwrap();
        let check = sample_canonical_cell(TpmsFamily::SheetGyroid, 8, CHECK_OFFSET).unwrap();
        assert_eq!(solve.len(), 512);
        assert_ne!(solve, check);
        assert!(solve.windows(2).all(|w| w[0] <= w[1]));
    }
}
