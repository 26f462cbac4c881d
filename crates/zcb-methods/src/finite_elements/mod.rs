//! Galerkin finite elements on piecewise-linear hat functions.
//!
//! * [`HatFunction`]: basis function of one node of the rate mesh
//! * [`assemble`]: mass and operator matrices by element-wise quadrature
//! * [`FiniteElementScheme`]: trapezoidal (θ = ½) time stepping with
//!   Dirichlet rows enforced by elimination

mod assembly;
mod basis;
mod scheme;

pub use assembly::{assemble, GalerkinMatrices};
pub use basis::HatFunction;
pub use scheme::FiniteElementScheme;
