//! # zcb-methods
//!
//! Numerical methods for the zero-coupon bond pricing PDE
//!
//! ```text
//! ∂Q/∂τ = κ(γ − r) ∂Q/∂r + ½σ² ∂²Q/∂r² − rQ,   Q(0, r) = 1
//! ```
//!
//! written in pseudo-time `τ = T − t`. Every scheme marches forward in `τ`
//! from the terminal payoff, takes its Dirichlet boundary values from the
//! closed-form price, and returns its field reversed onto calendar time.
//!
//! # Modules
//!
//! * [`grid`]: pseudo-time, calendar-time and short-rate grids
//! * [`field`]: price fields, analytical reference field, error evaluation
//! * [`stepping`]: the [`TimeStepper`] contract and the marching driver
//! * [`finite_differences`]: explicit, implicit and Crank-Nicolson schemes
//! * [`finite_elements`]: hat-function basis, Galerkin assembly, θ = ½ scheme

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Price fields and error evaluation.
pub mod field;

/// Finite-difference schemes.
pub mod finite_differences;

/// Galerkin finite elements on piecewise-linear hat functions.
pub mod finite_elements;

/// Discrete time and rate grids.
pub mod grid;

/// Time-stepping contract, driver, and scheme selection.
pub mod stepping;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use field::{analytical_field, error_field, ErrorField, PriceField};
pub use finite_differences::{CrankNicolsonScheme, ExplicitScheme, ImplicitScheme};
pub use finite_elements::{FiniteElementScheme, HatFunction};
pub use grid::Grid;
pub use stepping::{march, Scheme, TimeStepper, DIVERGENCE_BOUND};
