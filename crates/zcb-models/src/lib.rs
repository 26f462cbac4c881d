//! # zcb-models
//!
//! Short-rate models and their closed-form zero-coupon bond prices.
//!
//! ## Trait hierarchy
//!
//! ```text
//! ShortRateModel          → Vasicek
//! DiscountBondPricer      → AnalyticalSolver, Fn(Time, Rate) -> Price
//! ```
//!
//! The [`AnalyticalSolver`] is both the error baseline and the source of the
//! Dirichlet boundary values for every numerical scheme.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod short_rate_model;
pub mod vasicek;

pub use short_rate_model::{DiscountBondPricer, ShortRateModel};
pub use vasicek::{AnalyticalSolver, Vasicek};
