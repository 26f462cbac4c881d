//! # zcbond
//!
//! Prices a zero-coupon bond under the Vasicek short-rate model by solving
//! its pricing PDE four ways (explicit, implicit, Crank-Nicolson, Galerkin
//! finite elements) and compares each against the closed-form price.
//!
//! This crate is a **façade** that re-exports the workspace crates and adds
//! the end-to-end [`compare_schemes`] run. It produces every field a plotting
//! front end needs: the grids, the analytical field, each scheme's price
//! field and its error field.
//!
//! ## Quick start
//!
//! ```rust
//! use zcbond::{compare_schemes, RunConfig};
//!
//! let report = compare_schemes(&RunConfig::default()).unwrap();
//! assert_eq!(report.analytical.shape(), (101, 51));
//! for result in &report.results {
//!     assert!(result.stable);
//!     assert!(result.max_error < 1e-3);
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

use tracing::{info, warn};

/// Core types, run configuration, and error definitions.
pub use zcb_core as core;

/// Tridiagonal and dense solvers, numerical integration.
pub use zcb_math as math;

/// Short-rate models and the closed-form bond price.
pub use zcb_models as models;

/// Grids, fields, and the four numerical schemes.
pub use zcb_methods as methods;

pub use zcb_core::{
    DiscretizationParameters, Error, ModelParameters, Price, Rate, Real, Result, RunConfig, Time,
};
pub use zcb_methods::{analytical_field, error_field, ErrorField, Grid, PriceField, Scheme};
pub use zcb_models::{AnalyticalSolver, DiscountBondPricer, Vasicek};

/// One scheme's output on the shared grid.
#[derive(Debug, Clone)]
pub struct SchemeResult {
    /// Which scheme produced it.
    pub scheme: Scheme,
    /// Prices indexed `[calendar time, rate]`.
    pub field: PriceField,
    /// `|field − analytical|`.
    pub error: ErrorField,
    /// Largest entry of `error`.
    pub max_error: Real,
    /// Whether the grid lies inside the scheme's stability region.
    ///
    /// Always `true` for the implicit, Crank-Nicolson and finite-element
    /// schemes. An explicit run outside the region that stayed below the
    /// divergence bound is reported with `false`; its field may still be
    /// inaccurate.
    pub stable: bool,
}

/// Everything produced by one comparison run.
#[derive(Debug, Clone)]
pub struct SchemeComparison {
    /// The grid shared by every field.
    pub grid: Grid,
    /// Closed-form prices on the grid.
    pub analytical: PriceField,
    /// One entry per scheme, in [`Scheme::ALL`] order.
    pub results: Vec<SchemeResult>,
}

impl SchemeComparison {
    /// The result of `scheme`, if it was run.
    pub fn result(&self, scheme: Scheme) -> Option<&SchemeResult> {
        self.results.iter().find(|r| r.scheme == scheme)
    }
}

/// Run every scheme on `config` and compare against the closed form.
///
/// The configuration is validated first. The first scheme that fails aborts
/// the run; no partial report is returned.
pub fn compare_schemes(config: &RunConfig) -> Result<SchemeComparison> {
    compare(config, &Scheme::ALL)
}

/// Like [`compare_schemes`], restricted to `schemes`.
pub fn compare(config: &RunConfig, schemes: &[Scheme]) -> Result<SchemeComparison> {
    config.validate()?;
    let grid = Grid::new(config)?;
    let pricer = AnalyticalSolver::from_parameters(&config.model)?;
    let analytical = analytical_field(&grid, &pricer);
    info!(
        time_steps = grid.time_steps(),
        space_steps = grid.space_steps(),
        schemes = schemes.len(),
        "comparing schemes"
    );

    let mut results = Vec::with_capacity(schemes.len());
    for &scheme in schemes {
        let stable = scheme.is_stable_on(&grid, pricer.model());
        let field = scheme.solve_on(&grid, *pricer.model(), &pricer)?;
        let error = error_field(&field, &analytical)?;
        let max_error = error.max_abs_error();
        info!(
            scheme = scheme.name(),
            max_error,
            rms_error = error.rms_error(),
            "scheme finished"
        );
        if !stable {
            warn!(
                scheme = scheme.name(),
                max_error,
                "bounded run outside the stability region"
            );
        }
        results.push(SchemeResult {
            scheme,
            field,
            error,
            max_error,
            stable,
        });
    }

    Ok(SchemeComparison {
        grid,
        analytical,
        results,
    })
}
