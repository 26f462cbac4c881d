//! Galerkin assembly of the mass and operator matrices.
//!
//! ```text
//! M_ij = ∫ φ_i φ_j
//! B_ij = ∫ κ(γ − r) φ_j′ φ_i − ½σ² φ_j′ φ_i′ − r φ_j φ_i
//! ```
//!
//! Each entry is integrated element by element over the overlap of the two
//! supports, so the integrands seen by the quadrature are polynomials.

use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::finite_elements::basis::HatFunction;
use crate::grid::Grid;
use zcb_core::{Real, Result, Size};
use zcb_math::{Integrator, Matrix};
use zcb_models::{ShortRateModel, Vasicek};

/// The assembled semi-discrete system `M dQ/dτ = B Q`.
#[derive(Debug, Clone)]
pub struct GalerkinMatrices {
    /// Mass matrix, symmetric and tridiagonal.
    pub mass: Matrix,
    /// Operator matrix, tridiagonal but not symmetric.
    pub operator: Matrix,
}

/// `(j, M_ij, B_ij)` for each neighbour `j` of node `i`.
type RowEntries = Vec<(Size, Real, Real)>;

/// Assemble both matrices on the rate nodes of `grid`.
pub fn assemble<I>(grid: &Grid, model: &Vasicek, integrator: &I) -> Result<GalerkinMatrices>
where
    I: Integrator + Sync,
{
    let nodes = grid.rates();
    let size = nodes.len();
    debug!(nodes = size, "assembling Galerkin matrices");

    let row = |i: Size| assemble_row(i, nodes, model, integrator);
    #[cfg(feature = "parallel")]
    let rows: Vec<RowEntries> = (0..size).into_par_iter().map(row).collect::<Result<_>>()?;
    #[cfg(not(feature = "parallel"))]
    let rows: Vec<RowEntries> = (0..size).map(row).collect::<Result<_>>()?;

    let mut mass = Matrix::zeros(size, size);
    let mut operator = Matrix::zeros(size, size);
    for (i, entries) in rows.into_iter().enumerate() {
        for (j, m, b) in entries {
            mass[(i, j)] = m;
            operator[(i, j)] = b;
        }
    }
    Ok(GalerkinMatrices { mass, operator })
}

fn assemble_row<I>(i: Size, nodes: &[Real], model: &Vasicek, integrator: &I) -> Result<RowEntries>
where
    I: Integrator,
{
    let last = nodes.len() - 1;
    let phi_i = HatFunction::new(i, nodes);
    let mut entries = Vec::with_capacity(3);
    for j in i.saturating_sub(1)..=(i + 1).min(last) {
        let phi_j = HatFunction::new(j, nodes);
        let mut m = 0.0;
        let mut b = 0.0;
        for (a, z) in overlap(i, j, nodes) {
            m += integrator.integrate(|x| phi_i.value(x) * phi_j.value(x), a, z)?;
            b += integrator.integrate(
                |x| {
                    let sigma = model.diffusion(x);
                    model.drift(x) * phi_j.derivative(x) * phi_i.value(x)
                        - 0.5 * sigma * sigma * phi_j.derivative(x) * phi_i.derivative(x)
                        - x * phi_j.value(x) * phi_i.value(x)
                },
                a,
                z,
            )?;
        }
        entries.push((j, m, b));
    }
    Ok(entries)
}

/// Mesh elements `[x_e, x_{e+1}]` shared by the supports of nodes `i` and `j`.
fn overlap(i: Size, j: Size, nodes: &[Real]) -> impl Iterator<Item = (Real, Real)> + '_ {
    let first = i.max(j).saturating_sub(1);
    let last = i.min(j).min(nodes.len() - 2);
    (first..=last).map(move |e| (nodes[e], nodes[e + 1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use zcb_core::RunConfig;
    use zcb_math::{GaussKronrodAdaptive, GaussLegendreIntegral};

    fn default_matrices() -> (Grid, GalerkinMatrices) {
        let config = RunConfig::default();
        let grid = Grid::new(&config).unwrap();
        let model = Vasicek::from_parameters(&config.model);
        let matrices = assemble(&grid, &model, &GaussLegendreIntegral::default()).unwrap();
        (grid, matrices)
    }

    #[test]
    fn overlapping_elements() {
        let nodes = [0.0, 1.0, 2.0, 3.0];
        let pairs = |i, j| overlap(i, j, &nodes).collect::<Vec<_>>();
        assert_eq!(pairs(0, 0), vec![(0.0, 1.0)]);
        assert_eq!(pairs(1, 1), vec![(0.0, 1.0), (1.0, 2.0)]);
        assert_eq!(pairs(1, 2), vec![(1.0, 2.0)]);
        assert_eq!(pairs(2, 1), vec![(1.0, 2.0)]);
        assert_eq!(pairs(3, 3), vec![(2.0, 3.0)]);
    }

    #[test]
    fn mass_matrix_identities() {
        let (grid, g) = default_matrices();
        let dr = grid.dr();
        assert_abs_diff_eq!(g.mass[(10, 10)], 2.0 * dr / 3.0, epsilon = 1e-15);
        assert_abs_diff_eq!(g.mass[(10, 11)], dr / 6.0, epsilon = 1e-15);
        assert_abs_diff_eq!(g.mass[(0, 0)], dr / 3.0, epsilon = 1e-15);
        assert_eq!(g.mass[(10, 12)], 0.0);
        assert!(g.mass.is_symmetric(1e-15));
        assert_eq!(g.mass.bandwidth(), 1);
    }

    #[test]
    fn operator_is_banded_and_asymmetric() {
        let (_, g) = default_matrices();
        assert_eq!(g.operator.bandwidth(), 1);
        assert!(!g.operator.is_symmetric(1e-12));
    }

    #[test]
    fn operator_row_against_closed_form() {
        // Interior node on a uniform mesh:
        // B_ii = κ dr/3 − σ²/dr − 2 r_i dr/3 and B·1 = −r_i dr.
        let (grid, g) = default_matrices();
        let dr = grid.dr();
        let i = 20;
        let r = grid.rates()[i];
        let expected = 0.1 * dr / 3.0 - 1e-4 / dr - 2.0 * r * dr / 3.0;
        assert_abs_diff_eq!(g.operator[(i, i)], expected, epsilon = 1e-12);
        let row_sum: Real = (i - 1..=i + 1).map(|j| g.operator[(i, j)]).sum();
        assert_abs_diff_eq!(row_sum, -r * dr, epsilon = 1e-14);
    }

    #[test]
    fn adaptive_integrator_agrees() {
        let config = RunConfig::default();
        let grid = Grid::new(&config).unwrap();
        let model = Vasicek::from_parameters(&config.model);
        let fixed = assemble(&grid, &model, &GaussLegendreIntegral::default()).unwrap();
        let adaptive = assemble(&grid, &model, &GaussKronrodAdaptive::default()).unwrap();
        let diff = &fixed.operator - &adaptive.operator;
        assert!(diff.inner().amax() < 1e-12);
    }
}
