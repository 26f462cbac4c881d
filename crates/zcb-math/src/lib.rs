//! # zcb-math
//!
//! Mathematical utilities: the tridiagonal (Thomas) solver shared by the
//! implicit finite-difference schemes, a dense matrix newtype over nalgebra
//! with an LU solve, and numerical integration rules used to assemble
//! finite-element matrices.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Pivot checks for the linear solvers.
pub mod comparison;

/// Numerical integration.
pub mod integrals;

/// Dense matrix newtype over nalgebra.
pub mod matrix;

/// Tridiagonal linear systems.
pub mod tridiagonal;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use comparison::is_usable_pivot;
pub use integrals::{GaussKronrodAdaptive, GaussLegendreIntegral, Integrator};
pub use matrix::Matrix;
pub use tridiagonal::{solve_tridiagonal, TridiagonalOperator, TridiagonalSystem};
