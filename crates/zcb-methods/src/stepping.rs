//! Pseudo-time marching.
//!
//! Every scheme is a pure map from the row at step `n` to the row at step
//! `n + 1`; [`march`] owns the loop, seeds the terminal payoff, rejects
//! diverged rows, and reverses the result onto calendar time.
//!
//! A row is diverged when it holds a non-finite value or a value whose
//! magnitude exceeds [`DIVERGENCE_BOUND`]. A bond price is at most
//! `exp(−r_min · T)`; the bound assumes `r_min · T > −ln 10⁶ ≈ −13.8`, which
//! covers every realistic rate range and maturity.

use std::fmt;

use tracing::{debug, info};

use crate::field::PriceField;
use crate::finite_differences::{self, CrankNicolsonScheme, ExplicitScheme, ImplicitScheme};
use crate::finite_elements::FiniteElementScheme;
use crate::grid::Grid;
use zcb_core::{errors::Error, Price, Real, Result, RunConfig, Size};
use zcb_models::{DiscountBondPricer, Vasicek};

/// Largest price magnitude [`march`] accepts in a row.
pub const DIVERGENCE_BOUND: Real = 1e6;

/// One time-stepping scheme on a fixed grid.
pub trait TimeStepper {
    /// Short scheme name used in logs and errors.
    fn name(&self) -> &'static str;

    /// The grid this scheme steps on.
    fn grid(&self) -> &Grid;

    /// Compute the full row (boundaries included) at pseudo-time step
    /// `n + 1` from the row at step `n`.
    fn step(&self, n: Size, previous: &[Price]) -> Result<Vec<Price>>;
}

/// Run `stepper` from `Q(0, ·) = 1` to maturity.
///
/// A row containing a non-finite value or a value beyond
/// [`DIVERGENCE_BOUND`], or a solver breakdown, aborts the run with
/// [`Error::NumericalInstability`] tagged with the offending step.
pub fn march<S>(stepper: &S) -> Result<PriceField>
where
    S: TimeStepper + ?Sized,
{
    let grid = stepper.grid();
    let name = stepper.name();
    let (rows, cols) = grid.shape();
    info!(
        scheme = name,
        time_steps = grid.time_steps(),
        space_steps = grid.space_steps(),
        "marching"
    );

    let mut history: Vec<Vec<Price>> = Vec::with_capacity(rows);
    history.push(vec![1.0; cols]);
    for n in 0..grid.time_steps() {
        let step = n + 1;
        let next = stepper
            .step(n, &history[n])
            .map_err(|e| e.at_step(name, step))?;
        if next.len() != cols {
            return Err(Error::ShapeMismatch {
                expected: (1, cols),
                found: (1, next.len()),
            });
        }
        if let Some(i) = next.iter().position(|v| !v.is_finite()) {
            return Err(Error::NumericalInstability {
                scheme: name,
                step,
                reason: format!("non-finite value {} at rate index {i}", next[i]),
            });
        }
        if let Some(i) = next.iter().position(|v| v.abs() > DIVERGENCE_BOUND) {
            return Err(Error::NumericalInstability {
                scheme: name,
                step,
                reason: format!(
                    "value {:e} at rate index {i} exceeds the divergence bound {DIVERGENCE_BOUND:e}",
                    next[i]
                ),
            });
        }
        history.push(next);
    }
    debug!(scheme = name, "marching complete");

    PriceField::from_pseudo_time_rows(history)
}

/// Closed-form prices at `(r_min, r_max)` after `step` pseudo-time steps.
pub(crate) fn boundary_values<P>(pricer: &P, grid: &Grid, step: Size) -> (Price, Price)
where
    P: DiscountBondPricer + ?Sized,
{
    let t = grid.calendar_time_at_step(step);
    (pricer.price(t, grid.r_min()), pricer.price(t, grid.r_max()))
}

/// Interior slice of a full row.
pub(crate) fn interior(row: &[Real]) -> &[Real] {
    &row[1..row.len() - 1]
}

// ── Scheme selection ─────────────────────────────────────────────────────────

/// The four discretizations of the bond PDE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Forward Euler in pseudo-time with central differences.
    Explicit,
    /// Backward Euler in pseudo-time.
    Implicit,
    /// Trapezoidal blend of the two (θ = ½).
    CrankNicolson,
    /// Galerkin finite elements with trapezoidal time stepping.
    FiniteElement,
}

impl Scheme {
    /// Every scheme, in reporting order.
    pub const ALL: [Scheme; 4] = [
        Scheme::Explicit,
        Scheme::Implicit,
        Scheme::CrankNicolson,
        Scheme::FiniteElement,
    ];

    /// Short name used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            Scheme::Explicit => "explicit",
            Scheme::Implicit => "implicit",
            Scheme::CrankNicolson => "crank-nicolson",
            Scheme::FiniteElement => "finite-element",
        }
    }

    /// Validate `config`, build the grid, and run this scheme with boundary
    /// values from `pricer`.
    pub fn solve<P>(self, config: &RunConfig, pricer: &P) -> Result<PriceField>
    where
        P: DiscountBondPricer,
    {
        let grid = Grid::new(config)?;
        let model = Vasicek::from_parameters(&config.model);
        self.solve_on(&grid, model, pricer)
    }

    /// Whether this scheme is inside its stability region on `grid`.
    ///
    /// Only the explicit scheme is conditionally stable; see
    /// [`ExplicitScheme::is_stable`].
    pub fn is_stable_on(self, grid: &Grid, model: &Vasicek) -> bool {
        match self {
            Scheme::Explicit => finite_differences::explicit_is_stable(grid, model),
            Scheme::Implicit | Scheme::CrankNicolson | Scheme::FiniteElement => true,
        }
    }

    /// Run this scheme on an existing grid.
    pub fn solve_on<P>(self, grid: &Grid, model: Vasicek, pricer: &P) -> Result<PriceField>
    where
        P: DiscountBondPricer,
    {
        match self {
            Scheme::Explicit => march(&ExplicitScheme::new(grid, model, pricer)),
            Scheme::Implicit => march(&ImplicitScheme::new(grid, model, pricer)),
            Scheme::CrankNicolson => march(&CrankNicolsonScheme::new(grid, model, pricer)),
            Scheme::FiniteElement => march(&FiniteElementScheme::new(grid, model, pricer)?),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zcb_core::DiscretizationParameters;

    struct Doubling<'a> {
        grid: &'a Grid,
    }

    impl TimeStepper for Doubling<'_> {
        fn name(&self) -> &'static str {
            "doubling"
        }

        fn grid(&self) -> &Grid {
            self.grid
        }

        fn step(&self, _n: Size, previous: &[Price]) -> Result<Vec<Price>> {
            Ok(previous.iter().map(|v| v * 2.0).collect())
        }
    }

    struct Failing<'a> {
        grid: &'a Grid,
    }

    impl TimeStepper for Failing<'_> {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn grid(&self) -> &Grid {
            self.grid
        }

        fn step(&self, n: Size, previous: &[Price]) -> Result<Vec<Price>> {
            if n == 2 {
                return Err(Error::SingularMatrix { pivot_index: 1 });
            }
            Ok(previous.to_vec())
        }
    }

    fn small_grid(time_steps: Size) -> Grid {
        let config = RunConfig {
            discretization: DiscretizationParameters::new(time_steps, 4, 0.0, 0.1),
            ..RunConfig::default()
        };
        Grid::new(&config).unwrap()
    }

    #[test]
    fn driver_seeds_payoff_and_reverses() {
        let grid = small_grid(3);
        let field = march(&Doubling { grid: &grid }).unwrap();
        assert_eq!(field.shape(), (4, 5));
        assert!(field.row(3).iter().all(|&v| v == 1.0));
        assert!(field.row(0).iter().all(|&v| v == 8.0));
    }

    struct Poisoned<'a> {
        grid: &'a Grid,
    }

    impl TimeStepper for Poisoned<'_> {
        fn name(&self) -> &'static str {
            "poisoned"
        }

        fn grid(&self) -> &Grid {
            self.grid
        }

        fn step(&self, n: Size, previous: &[Price]) -> Result<Vec<Price>> {
            let mut next = previous.to_vec();
            if n == 1 {
                next[2] = Real::NAN;
            }
            Ok(next)
        }
    }

    #[test]
    fn growth_past_the_bound_is_reported_with_step() {
        // 2^19 < 1e6 < 2^20
        let grid = small_grid(1100);
        match march(&Doubling { grid: &grid }) {
            Err(Error::NumericalInstability {
                scheme,
                step,
                reason,
            }) => {
                assert_eq!(scheme, "doubling");
                assert_eq!(step, 20);
                assert!(reason.contains("divergence bound"), "{reason}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn growth_below_the_bound_is_accepted() {
        let grid = small_grid(19);
        let field = march(&Doubling { grid: &grid }).unwrap();
        assert_eq!(field.row(0)[0], 524_288.0);
    }

    #[test]
    fn non_finite_value_is_reported_with_index() {
        let grid = small_grid(5);
        match march(&Poisoned { grid: &grid }) {
            Err(Error::NumericalInstability {
                scheme,
                step,
                reason,
            }) => {
                assert_eq!(scheme, "poisoned");
                assert_eq!(step, 2);
                assert!(reason.contains("non-finite value NaN at rate index 2"), "{reason}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn solver_breakdown_is_retagged() {
        let grid = small_grid(5);
        match march(&Failing { grid: &grid }) {
            Err(Error::NumericalInstability { scheme, step, .. }) => {
                assert_eq!(scheme, "failing");
                assert_eq!(step, 3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn scheme_names_are_distinct() {
        let names: Vec<_> = Scheme::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            ["explicit", "implicit", "crank-nicolson", "finite-element"]
        );
        assert_eq!(Scheme::CrankNicolson.to_string(), "crank-nicolson");
    }
}
