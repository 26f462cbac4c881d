//! Numerical integration.
//!
//! Provides a fixed-order Gauss-Legendre integrator, exact for the
//! polynomial integrands produced by piecewise-linear finite elements, and
//! an adaptive Gauss-Kronrod integrator for general smooth integrands.

pub mod gaussianquadratures;

pub use gaussianquadratures::GaussianQuadrature;

use zcb_core::{
    errors::{Error, Result},
    Real,
};

/// A numerical integrator.
pub trait Integrator {
    /// Integrate `f` on `[a, b]`.
    fn integrate<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Result<Real>;
}

// ── Gauss-Legendre ───────────────────────────────────────────────────────────

/// Fixed-order Gauss-Legendre integration on `[a, b]`.
#[derive(Debug, Clone)]
pub struct GaussLegendreIntegral {
    rule: GaussianQuadrature,
}

impl GaussLegendreIntegral {
    /// Create an integrator with `order` nodes.
    pub fn new(order: usize) -> Self {
        Self {
            rule: GaussianQuadrature::legendre(order),
        }
    }

    /// Number of nodes.
    pub fn order(&self) -> usize {
        self.rule.order()
    }
}

impl Default for GaussLegendreIntegral {
    /// Three nodes: exact up to degree five.
    fn default() -> Self {
        Self::new(3)
    }
}

impl Integrator for GaussLegendreIntegral {
    fn integrate<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Result<Real> {
        if self.rule.order() == 0 {
            return Err(Error::Precondition(
                "GaussLegendreIntegral: order must be > 0".into(),
            ));
        }
        if a == b {
            return Ok(0.0);
        }
        Ok(self.rule.integrate_on(f, a, b))
    }
}

// ── Gauss-Kronrod ─────────────────────────────────────────────────────────────

/// Gauss-Kronrod adaptive integration using a G3/K7 pair.
#[derive(Debug, Clone)]
pub struct GaussKronrodAdaptive {
    absolute_accuracy: Real,
    max_evaluations: usize,
}

impl GaussKronrodAdaptive {
    /// Create a new integrator.
    pub fn new(absolute_accuracy: Real, max_evaluations: usize) -> Self {
        Self {
            absolute_accuracy,
            max_evaluations,
        }
    }

    fn integrate_recursive<F: Fn(Real) -> Real>(
        &self,
        f: &F,
        a: Real,
        b: Real,
        evals: &mut usize,
    ) -> Result<Real> {
        if *evals >= self.max_evaluations {
            return Err(Error::Runtime(format!(
                "GaussKronrodAdaptive: max evaluations ({}) exceeded",
                self.max_evaluations
            )));
        }

        let mid = 0.5 * (a + b);
        let half = 0.5 * (b - a);

        static G_NODES: [Real; 3] = [
            0.0,
            0.774_596_669_241_483_4,
            -0.774_596_669_241_483_4,
        ];
        static G_WEIGHTS: [Real; 3] = [
            0.888_888_888_888_888_8,
            0.555_555_555_555_555_6,
            0.555_555_555_555_555_6,
        ];
        static K_NODES: [Real; 7] = [
            0.0,
            0.405_845_151_377_397_2,
            -0.405_845_151_377_397_2,
            0.774_596_669_241_483_4,
            -0.774_596_669_241_483_4,
            0.960_491_268_708_02,
            -0.960_491_268_708_02,
        ];
        static K_WEIGHTS: [Real; 7] = [
            0.450_916_538_658_474,
            0.401_397_414_775_962_4,
            0.401_397_414_775_962_4,
            0.268_488_089_868_333_4,
            0.268_488_089_868_333_4,
            0.104_656_226_026_467_26,
            0.104_656_226_026_467_26,
        ];

        let rule = |nodes: &[Real], weights: &[Real]| -> Real {
            nodes
                .iter()
                .zip(weights)
                .map(|(&n, &w)| w * f(mid + half * n))
                .sum::<Real>()
                * half
        };
        let gauss = rule(&G_NODES, &G_WEIGHTS);
        let kronrod = rule(&K_NODES, &K_WEIGHTS);
        *evals += 10;

        if (kronrod - gauss).abs() < self.absolute_accuracy || half.abs() < 1e-15 {
            return Ok(kronrod);
        }

        let left = self.integrate_recursive(f, a, mid, evals)?;
        let right = self.integrate_recursive(f, mid, b, evals)?;
        Ok(left + right)
    }
}

impl Default for GaussKronrodAdaptive {
    fn default() -> Self {
        Self::new(1e-12, 10_000)
    }
}

impl Integrator for GaussKronrodAdaptive {
    fn integrate<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Result<Real> {
        if a == b {
            return Ok(0.0);
        }
        let mut evals = 0;
        self.integrate_recursive(&f, a, b, &mut evals)
    }
}
