//! Vasicek short-rate model.
//!
//! ```text
//! dr = κ(γ − r) dt + σ dW
//! ```
//!
//! Discount bond price: `P(t,T) = A(t,T) exp(−B(t,T) r(t))`
//!
//! where
//! * `B(t,T) = (1 − e^{−κ(T−t)}) / κ`
//! * `A(t,T) = exp((γ − σ²/(2κ²))(B − (T−t)) − σ²B²/(4κ))`
//!
//! At `κ = 0` both expressions have removable singularities; the limits
//! `B = T − t` and `ln A = σ²(T−t)³/6` are used there.

use crate::short_rate_model::{DiscountBondPricer, ShortRateModel};
use zcb_core::{ModelParameters, Price, Rate, Real, Result, Time};

/// Below this mean-reversion speed the `κ → 0` limits are used.
const KAPPA_EPSILON: Real = 1e-12;

/// Vasicek short-rate model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vasicek {
    /// Mean-reversion speed κ.
    pub kappa: Real,
    /// Long-run mean level γ.
    pub gamma: Rate,
    /// Volatility σ.
    pub sigma: Real,
}

impl Vasicek {
    /// Create a new Vasicek model.
    pub fn new(kappa: Real, gamma: Rate, sigma: Real) -> Self {
        Self {
            kappa,
            gamma,
            sigma,
        }
    }

    /// Build from run parameters (the maturity belongs to the bond, not the
    /// model).
    pub fn from_parameters(params: &ModelParameters) -> Self {
        Self::new(params.kappa, params.gamma, params.sigma)
    }

    /// Bond duration function `B(t, T) = (1 − e^{−κ(T−t)}) / κ`.
    pub fn b_function(&self, t: Time, big_t: Time) -> Real {
        let tau = big_t - t;
        if self.kappa.abs() < KAPPA_EPSILON {
            tau
        } else {
            -(-self.kappa * tau).exp_m1() / self.kappa
        }
    }

    /// Log of the `A(t,T)` function.
    pub fn log_a(&self, t: Time, big_t: Time) -> Real {
        let tau = big_t - t;
        let sigma2 = self.sigma * self.sigma;

        if self.kappa.abs() < KAPPA_EPSILON {
            sigma2 * tau * tau * tau / 6.0
        } else {
            let b_val = self.b_function(t, big_t);
            let k2 = self.kappa * self.kappa;
            (self.gamma - sigma2 / (2.0 * k2)) * (b_val - tau)
                - sigma2 * b_val * b_val / (4.0 * self.kappa)
        }
    }
}

impl ShortRateModel for Vasicek {
    fn drift(&self, r: Rate) -> Real {
        self.kappa * (self.gamma - r)
    }

    fn diffusion(&self, _r: Rate) -> Real {
        self.sigma
    }

    fn discount_bond(&self, t: Time, big_t: Time, rate: Rate) -> Price {
        let b_val = self.b_function(t, big_t);
        (self.log_a(t, big_t) - b_val * rate).exp()
    }
}

/// Closed-form price of the zero-coupon bond maturing at `maturity`.
///
/// The reference solution for every scheme and the source of their
/// Dirichlet boundary values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticalSolver {
    model: Vasicek,
    maturity: Time,
}

impl AnalyticalSolver {
    /// Create a pricer for a bond maturing at `maturity`.
    pub fn new(model: Vasicek, maturity: Time) -> Self {
        Self { model, maturity }
    }

    /// Validate `params` and build the pricer.
    ///
    /// `κ ≤ 0` is rejected here even though [`Vasicek`] itself handles the
    /// `κ = 0` limit.
    pub fn from_parameters(params: &ModelParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self::new(Vasicek::from_parameters(params), params.maturity))
    }

    /// The underlying model.
    pub fn model(&self) -> &Vasicek {
        &self.model
    }

    /// Bond maturity.
    pub fn maturity(&self) -> Time {
        self.maturity
    }
}

impl DiscountBondPricer for AnalyticalSolver {
    fn price(&self, t: Time, r: Rate) -> Price {
        self.model.discount_bond(t, self.maturity, r)
    }
}
