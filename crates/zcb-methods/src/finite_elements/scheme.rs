//! Trapezoidal time stepping of the Galerkin system.

use tracing::debug;

use crate::finite_elements::assembly::{assemble, GalerkinMatrices};
use crate::grid::Grid;
use crate::stepping::{boundary_values, Scheme, TimeStepper};
use zcb_core::{Price, Result, Size};
use zcb_math::{GaussLegendreIntegral, Integrator, Matrix};
use zcb_models::{DiscountBondPricer, Vasicek};

/// Finite-element scheme: `(M − ½dτ B) Q^{n+1} = (M + ½dτ B) Q^n`.
///
/// The solve runs over every node. Boundary values are imposed by moving
/// the first and last columns to the right-hand side for the interior rows
/// and replacing the first and last rows with identity rows.
pub struct FiniteElementScheme<'a, P: ?Sized> {
    grid: &'a Grid,
    matrices: GalerkinMatrices,
    lhs: Matrix,
    rhs: Matrix,
    pricer: &'a P,
}

impl<'a, P> FiniteElementScheme<'a, P>
where
    P: DiscountBondPricer + ?Sized,
{
    /// Assemble with three-point Gauss-Legendre quadrature.
    pub fn new(grid: &'a Grid, model: Vasicek, pricer: &'a P) -> Result<Self> {
        Self::with_integrator(grid, model, pricer, &GaussLegendreIntegral::default())
    }

    /// Assemble with the given quadrature rule.
    pub fn with_integrator<I>(
        grid: &'a Grid,
        model: Vasicek,
        pricer: &'a P,
        integrator: &I,
    ) -> Result<Self>
    where
        I: Integrator + Sync,
    {
        let matrices = assemble(grid, &model, integrator)?;
        let half_step = matrices.operator.scale(0.5 * grid.dtau());
        let lhs = &matrices.mass - &half_step;
        let rhs = &matrices.mass + &half_step;
        debug!(nodes = lhs.rows(), "finite-element system ready");
        Ok(Self {
            grid,
            matrices,
            lhs,
            rhs,
            pricer,
        })
    }

    /// The assembled mass and operator matrices.
    pub fn matrices(&self) -> &GalerkinMatrices {
        &self.matrices
    }
}

impl<P> TimeStepper for FiniteElementScheme<'_, P>
where
    P: DiscountBondPricer + ?Sized,
{
    fn name(&self) -> &'static str {
        Scheme::FiniteElement.name()
    }

    fn grid(&self) -> &Grid {
        self.grid
    }

    fn step(&self, n: Size, previous: &[Price]) -> Result<Vec<Price>> {
        let (left, right) = boundary_values(self.pricer, self.grid, n + 1);
        let last = previous.len() - 1;

        let mut b = self.rhs.mul_vec(previous)?;
        let mut a = self.lhs.clone();
        for row in 1..last {
            b[row] -= a[(row, 0)] * left + a[(row, last)] * right;
            a[(row, 0)] = 0.0;
            a[(row, last)] = 0.0;
        }
        a.set_identity_row(0);
        a.set_identity_row(last);
        b[0] = left;
        b[last] = right;

        a.solve(&b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{analytical_field, error_field};
    use crate::stepping::march;
    use zcb_core::{DiscretizationParameters, RunConfig};
    use zcb_models::AnalyticalSolver;

    fn setup(time_steps: Size, space_steps: Size) -> (Grid, AnalyticalSolver) {
        let config = RunConfig {
            discretization: DiscretizationParameters::new(time_steps, space_steps, 0.0, 0.15),
            ..RunConfig::default()
        };
        let grid = Grid::new(&config).unwrap();
        let pricer = AnalyticalSolver::from_parameters(&config.model).unwrap();
        (grid, pricer)
    }

    #[test]
    fn close_to_closed_form() {
        let (grid, pricer) = setup(100, 50);
        let scheme = FiniteElementScheme::new(&grid, *pricer.model(), &pricer).unwrap();
        let field = march(&scheme).unwrap();
        let err = error_field(&field, &analytical_field(&grid, &pricer)).unwrap();
        assert!(err.max_abs_error() < 5e-6, "{}", err.max_abs_error());
    }

    #[test]
    fn boundary_rows_are_exact() {
        let (grid, pricer) = setup(10, 8);
        let scheme = FiniteElementScheme::new(&grid, *pricer.model(), &pricer).unwrap();
        let next = scheme.step(3, &[1.0; 9]).unwrap();
        let t = grid.calendar_time_at_step(4);
        assert!((next[0] - pricer.price(t, 0.0)).abs() < 1e-14);
        assert!((next[8] - pricer.price(t, 0.15)).abs() < 1e-14);
    }

    #[test]
    fn single_element() {
        let (grid, pricer) = setup(5, 1);
        let field = march(&FiniteElementScheme::new(&grid, *pricer.model(), &pricer).unwrap())
            .unwrap();
        assert_eq!(field.shape(), (6, 2));
        assert!((field[(0, 1)] - pricer.price(0.0, 0.15)).abs() < 1e-14);
    }
}
