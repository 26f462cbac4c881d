//! Crank-Nicolson (θ = ½) in pseudo-time.

use crate::finite_differences::{shifted, spatial_operator, SpatialOperator};
use crate::grid::Grid;
use crate::stepping::{boundary_values, interior, Scheme, TimeStepper};
use zcb_core::{Price, Result, Size};
use zcb_math::TridiagonalOperator;
use zcb_models::{DiscountBondPricer, Vasicek};

/// Crank-Nicolson scheme:
/// `(1 − ½dτ L) Q^{n+1} = (1 + ½dτ L) Q^n` on the interior nodes.
///
/// Both sides are built once; the boundary couplings bring in the old
/// boundary values on the explicit side and the new ones on the implicit
/// side.
pub struct CrankNicolsonScheme<'a, P: ?Sized> {
    grid: &'a Grid,
    operator: SpatialOperator,
    implicit_side: TridiagonalOperator,
    explicit_side: TridiagonalOperator,
    pricer: &'a P,
}

impl<'a, P> CrankNicolsonScheme<'a, P>
where
    P: DiscountBondPricer + ?Sized,
{
    /// Create the scheme.
    pub fn new(grid: &'a Grid, model: Vasicek, pricer: &'a P) -> Self {
        let operator = spatial_operator(grid, &model);
        let half = 0.5 * grid.dtau();
        Self {
            grid,
            implicit_side: shifted(&operator.bands, -half),
            explicit_side: shifted(&operator.bands, half),
            operator,
            pricer,
        }
    }
}

impl<P> TimeStepper for CrankNicolsonScheme<'_, P>
where
    P: DiscountBondPricer + ?Sized,
{
    fn name(&self) -> &'static str {
        Scheme::CrankNicolson.name()
    }

    fn grid(&self) -> &Grid {
        self.grid
    }

    fn step(&self, n: Size, previous: &[Price]) -> Result<Vec<Price>> {
        let (left, right) = boundary_values(self.pricer, self.grid, n + 1);
        let mut next = Vec::with_capacity(previous.len());
        next.push(left);

        if self.operator.size() > 0 {
            let (old_left, old_right) = (previous[0], previous[previous.len() - 1]);
            let half = 0.5 * self.grid.dtau();
            let mut rhs = self.explicit_side.apply(interior(previous))?;
            self.operator.boundary_terms(&mut rhs, half, old_left + left, old_right + right);
            next.extend(self.implicit_side.solve(&rhs)?);
        }

        next.push(right);
        Ok(next)
    }
}
