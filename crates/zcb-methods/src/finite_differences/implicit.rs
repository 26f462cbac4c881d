//! Backward Euler in pseudo-time.

use crate::finite_differences::{spatial_operator, SpatialOperator};
use crate::grid::Grid;
use crate::stepping::{boundary_values, interior, Scheme, TimeStepper};
use zcb_core::{Price, Result, Size};
use zcb_math::TridiagonalSystem;
use zcb_models::{DiscountBondPricer, Vasicek};

/// Implicit scheme: `(1 − dτ L) Q^{n+1} = Q^n` on the interior nodes.
///
/// Unconditionally stable. The new boundary values enter the first and last
/// right-hand-side entries through the operator's boundary couplings; the
/// system itself keeps `lower[0]` and `upper[last]` at zero.
pub struct ImplicitScheme<'a, P: ?Sized> {
    grid: &'a Grid,
    operator: SpatialOperator,
    pricer: &'a P,
}

impl<'a, P> ImplicitScheme<'a, P>
where
    P: DiscountBondPricer + ?Sized,
{
    /// Create the scheme.
    pub fn new(grid: &'a Grid, model: Vasicek, pricer: &'a P) -> Self {
        Self {
            grid,
            operator: spatial_operator(grid, &model),
            pricer,
        }
    }

    fn system(&self, previous: &[Price], left: Price, right: Price) -> TridiagonalSystem {
        let dtau = self.grid.dtau();
        let op = &self.operator.bands;
        let mut rhs = interior(previous).to_vec();
        self.operator.boundary_terms(&mut rhs, dtau, left, right);
        TridiagonalSystem {
            lower: op.lower.iter().map(|l| -dtau * l).collect(),
            diag: op.diag.iter().map(|d| 1.0 - dtau * d).collect(),
            upper: op.upper.iter().map(|u| -dtau * u).collect(),
            rhs,
        }
    }
}

impl<P> TimeStepper for ImplicitScheme<'_, P>
where
    P: DiscountBondPricer + ?Sized,
{
    fn name(&self) -> &'static str {
        Scheme::Implicit.name()
    }

    fn grid(&self) -> &Grid {
        self.grid
    }

    fn step(&self, n: Size, previous: &[Price]) -> Result<Vec<Price>> {
        let (left, right) = boundary_values(self.pricer, self.grid, n + 1);
        let mut next = Vec::with_capacity(previous.len());
        next.push(left);
        if self.operator.size() > 0 {
            next.extend(self.system(previous, left, right).solve()?);
        }
        next.push(right);
        Ok(next)
    }
}
