//! Forward Euler in pseudo-time.

use tracing::warn;

use crate::grid::Grid;
use crate::stepping::{boundary_values, Scheme, TimeStepper};
use zcb_core::{Price, Real, Result, Size};
use zcb_models::{DiscountBondPricer, ShortRateModel, Vasicek};

/// Explicit scheme: `Q^{n+1}_i = Q^n_i + dτ · (L Q^n)_i`.
///
/// No linear solve. Stable only while the diffusion number
/// `½σ² dτ / dr²` stays below ½ and the central advection stencil keeps
/// non-negative weights; see [`ExplicitScheme::is_stable`]. A violation is
/// logged, not refused: the run proceeds, and a row that grows past
/// [`DIVERGENCE_BOUND`](crate::stepping::DIVERGENCE_BOUND) or turns
/// non-finite is rejected by [`march`](crate::stepping::march). A run that
/// stays bounded outside the region is returned with its verdict available
/// from [`Scheme::is_stable_on`].
pub struct ExplicitScheme<'a, P: ?Sized> {
    grid: &'a Grid,
    model: Vasicek,
    pricer: &'a P,
}

impl<'a, P> ExplicitScheme<'a, P>
where
    P: DiscountBondPricer + ?Sized,
{
    /// Create the scheme; warns when the grid violates the stability bound.
    pub fn new(grid: &'a Grid, model: Vasicek, pricer: &'a P) -> Self {
        let scheme = Self {
            grid,
            model,
            pricer,
        };
        if !scheme.is_stable() {
            warn!(
                stability_ratio = scheme.stability_ratio(),
                dtau = grid.dtau(),
                dr = grid.dr(),
                "explicit scheme outside its stability region"
            );
        }
        scheme
    }

    /// Diffusion number `½σ² dτ / dr²`.
    pub fn stability_ratio(&self) -> Real {
        stability_ratio(self.grid, &self.model)
    }

    /// Whether every interior update is a non-negative combination of the
    /// previous row: diffusion number ≤ ½ and `κ|γ − r_i| dr ≤ σ²`.
    pub fn is_stable(&self) -> bool {
        is_stable(self.grid, &self.model)
    }
}

pub(crate) fn stability_ratio(grid: &Grid, model: &Vasicek) -> Real {
    let sigma = model.sigma;
    let dr = grid.dr();
    0.5 * sigma * sigma * grid.dtau() / (dr * dr)
}

pub(crate) fn is_stable(grid: &Grid, model: &Vasicek) -> bool {
    let sigma2 = model.sigma * model.sigma;
    let dr = grid.dr();
    let dtau = grid.dtau();
    let rates = grid.rates();
    stability_ratio(grid, model) <= 0.5
        && rates[1..rates.len() - 1].iter().all(|&r| {
            model.drift(r).abs() * dr <= sigma2 && 1.0 - dtau * (sigma2 / (dr * dr) + r) >= 0.0
        })
}

impl<P> TimeStepper for ExplicitScheme<'_, P>
where
    P: DiscountBondPricer + ?Sized,
{
    fn name(&self) -> &'static str {
        Scheme::Explicit.name()
    }

    fn grid(&self) -> &Grid {
        self.grid
    }

    fn step(&self, n: Size, previous: &[Price]) -> Result<Vec<Price>> {
        let rates = self.grid.rates();
        let m = rates.len() - 1;
        let dr = self.grid.dr();
        let dtau = self.grid.dtau();

        let mut next = vec![0.0; m + 1];
        for i in 1..m {
            let r = rates[i];
            let sigma = self.model.diffusion(r);
            let dq = (previous[i + 1] - previous[i - 1]) / (2.0 * dr);
            let d2q = (previous[i + 1] - 2.0 * previous[i] + previous[i - 1]) / (dr * dr);
            let l = self.model.drift(r) * dq + 0.5 * sigma * sigma * d2q - r * previous[i];
            next[i] = previous[i] + dtau * l;
        }

        let (left, right) = boundary_values(self.pricer, self.grid, n + 1);
        next[0] = left;
        next[m] = right;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stepping::march;
    use zcb_core::{errors::Error, DiscretizationParameters, ModelParameters, RunConfig};
    use zcb_models::AnalyticalSolver;

    fn setup(time_steps: Size, space_steps: Size) -> (Grid, Vasicek, AnalyticalSolver) {
        let config = RunConfig {
            discretization: DiscretizationParameters::new(time_steps, space_steps, 0.0, 0.15),
            ..RunConfig::default()
        };
        let grid = Grid::new(&config).unwrap();
        let pricer = AnalyticalSolver::from_parameters(&config.model).unwrap();
        (grid, *pricer.model(), pricer)
    }

    #[test]
    fn default_grid_is_stable() {
        let (grid, model, pricer) = setup(100, 50);
        let scheme = ExplicitScheme::new(&grid, model, &pricer);
        assert!(scheme.is_stable());
        assert!((scheme.stability_ratio() - 0.5 * 1e-4 * 0.01 / 9e-6).abs() < 1e-12);
    }

    #[test]
    fn fine_space_grid_is_unstable_and_diverges() {
        let (grid, model, pricer) = setup(100, 10_000);
        let scheme = ExplicitScheme::new(&grid, model, &pricer);
        assert!(!scheme.is_stable());
        match march(&scheme) {
            Err(Error::NumericalInstability { scheme, step, .. }) => {
                assert_eq!(scheme, "explicit");
                assert!(step > 1 && step <= 100, "step {step}");
            }
            other => panic!("expected instability, got {other:?}"),
        }
    }

    #[test]
    fn bounded_run_outside_the_region_is_flagged() {
        // σ = 0.001 breaks the advection condition κ|γ − r| dr ≤ σ² yet the
        // run stays bounded and close to the closed form.
        let config = RunConfig {
            model: ModelParameters::new(0.1, 0.05, 0.001, 1.0),
            ..RunConfig::default()
        };
        let grid = Grid::new(&config).unwrap();
        let pricer = AnalyticalSolver::from_parameters(&config.model).unwrap();
        let scheme = ExplicitScheme::new(&grid, *pricer.model(), &pricer);
        assert!(!scheme.is_stable());
        assert!(scheme.stability_ratio() < 0.5);
        assert!(!Scheme::Explicit.is_stable_on(&grid, pricer.model()));
        assert!(march(&scheme).is_ok());
    }

    #[test]
    fn one_step_matches_hand_computation() {
        let (grid, model, pricer) = setup(10, 4);
        let scheme = ExplicitScheme::new(&grid, model, &pricer);
        let next = scheme.step(0, &[1.0; 5]).unwrap();
        // Constant row: only the discount term acts.
        for i in 1..4 {
            let expected = 1.0 - grid.dtau() * grid.rates()[i];
            assert!((next[i] - expected).abs() < 1e-15);
        }
        let t = grid.calendar_time_at_step(1);
        assert_eq!(next[0], pricer.price(t, 0.0));
        assert_eq!(next[4], pricer.price(t, 0.15));
    }

    #[test]
    fn single_interval_writes_only_boundaries() {
        let (grid, model, pricer) = setup(10, 1);
        let field = march(&ExplicitScheme::new(&grid, model, &pricer)).unwrap();
        assert_eq!(field.shape(), (11, 2));
        assert_eq!(field[(0, 0)], pricer.price(0.0, 0.0));
        assert_eq!(field[(0, 1)], pricer.price(0.0, 0.15));
    }
}
