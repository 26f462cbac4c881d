//! Finite-difference schemes for the bond PDE.
//!
//! Central differences on the interior rate nodes give, at `r_i`,
//!
//! ```text
//! L Q_i = (d − a_i) Q_{i−1} + (−2d − r_i) Q_i + (d + a_i) Q_{i+1}
//! a_i = κ(γ − r_i) / (2 dr),   d = σ² / (2 dr²)
//! ```
//!
//! The two boundary nodes are Dirichlet: every scheme overwrites them with
//! the closed-form price at the new calendar time.
//!
//! * [`ExplicitScheme`]: forward Euler, conditionally stable
//! * [`ImplicitScheme`]: backward Euler, one tridiagonal solve per step
//! * [`CrankNicolsonScheme`]: θ = ½ blend, second order in time

mod crank_nicolson;
mod explicit;
mod implicit;

pub use crank_nicolson::CrankNicolsonScheme;
pub use explicit::ExplicitScheme;
pub use implicit::ImplicitScheme;

pub(crate) use explicit::is_stable as explicit_is_stable;

use crate::grid::Grid;
use zcb_core::{Price, Real};
use zcb_math::TridiagonalOperator;
use zcb_models::{ShortRateModel, Vasicek};

/// The discrete operator `L` on the interior nodes `r_1..r_{M−1}`.
///
/// `bands` follows the tridiagonal convention (`lower[0]` and `upper[last]`
/// are zero). The couplings of `r_1` to `r_0` and of `r_{M−1}` to `r_M` are
/// kept apart and enter through [`boundary_terms`](Self::boundary_terms).
#[derive(Debug, Clone)]
pub(crate) struct SpatialOperator {
    pub bands: TridiagonalOperator,
    pub left_coupling: Real,
    pub right_coupling: Real,
}

impl SpatialOperator {
    pub fn size(&self) -> usize {
        self.bands.size()
    }

    /// `scale · L` restricted to the boundary columns, added onto `rhs`.
    ///
    /// With a single interior node both terms land on `rhs[0]`.
    pub fn boundary_terms(&self, rhs: &mut [Real], scale: Real, left: Price, right: Price) {
        let last = rhs.len() - 1;
        rhs[0] += scale * self.left_coupling * left;
        rhs[last] += scale * self.right_coupling * right;
    }
}

pub(crate) fn spatial_operator(grid: &Grid, model: &Vasicek) -> SpatialOperator {
    let rates = grid.rates();
    let interior = rates.len().saturating_sub(2);
    let dr = grid.dr();
    let mut bands = TridiagonalOperator::new(interior);
    let (mut left_coupling, mut right_coupling) = (0.0, 0.0);
    for k in 0..interior {
        let r = rates[k + 1];
        let sigma = model.diffusion(r);
        let diffusion = 0.5 * sigma * sigma / (dr * dr);
        let advection = model.drift(r) / (2.0 * dr);
        if k == 0 {
            left_coupling = diffusion - advection;
        } else {
            bands.lower[k] = diffusion - advection;
        }
        bands.diag[k] = -2.0 * diffusion - r;
        if k + 1 == interior {
            right_coupling = diffusion + advection;
        } else {
            bands.upper[k] = diffusion + advection;
        }
    }
    SpatialOperator {
        bands,
        left_coupling,
        right_coupling,
    }
}

/// `1 + scale · L` as a tridiagonal operator.
pub(crate) fn shifted(op: &TridiagonalOperator, scale: Real) -> TridiagonalOperator {
    TridiagonalOperator {
        lower: op.lower.iter().map(|l| scale * l).collect(),
        diag: op.diag.iter().map(|d| 1.0 + scale * d).collect(),
        upper: op.upper.iter().map(|u| scale * u).collect(),
    }
}
