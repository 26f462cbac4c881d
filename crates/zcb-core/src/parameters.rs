//! Immutable run configuration.
//!
//! A run is described by the short-rate model parameters and by the
//! discretization of the `(τ, r)` domain. Both are plain value types; every
//! scheme receives them through a [`RunConfig`] that has already passed
//! [`RunConfig::validated`], so invalid inputs are rejected before any grid is
//! built.

use crate::{ensure_config, Rate, Real, Result, Size, Time, Volatility};

/// Parameters of the mean-reverting short-rate model
/// `dr = κ(γ − r) dt + σ dW` and of the bond being priced.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelParameters {
    /// Mean-reversion speed κ.
    pub kappa: Real,
    /// Long-run mean γ.
    pub gamma: Rate,
    /// Short-rate volatility σ.
    pub sigma: Volatility,
    /// Bond maturity T in years.
    pub maturity: Time,
}

impl ModelParameters {
    /// Create a new parameter set (not validated).
    pub fn new(kappa: Real, gamma: Rate, sigma: Volatility, maturity: Time) -> Self {
        Self {
            kappa,
            gamma,
            sigma,
            maturity,
        }
    }

    /// Check that the closed-form bond price is well defined.
    pub fn validate(&self) -> Result<()> {
        ensure_config!(
            self.kappa.is_finite() && self.gamma.is_finite() && self.sigma.is_finite(),
            "model parameters must be finite (κ={}, γ={}, σ={})",
            self.kappa,
            self.gamma,
            self.sigma
        );
        ensure_config!(
            self.kappa > 0.0,
            "mean-reversion speed must be positive, got {}",
            self.kappa
        );
        ensure_config!(
            self.sigma >= 0.0,
            "volatility must be non-negative, got {}",
            self.sigma
        );
        ensure_config!(
            self.maturity.is_finite() && self.maturity > 0.0,
            "maturity must be positive, got {}",
            self.maturity
        );
        Ok(())
    }
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self::new(0.1, 0.05, 0.01, 1.0)
    }
}

/// Step counts and spatial bounds of the pricing grid.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscretizationParameters {
    /// Number of pseudo-time steps N.
    pub time_steps: Size,
    /// Number of spatial intervals M (the grid has M + 1 nodes).
    pub space_steps: Size,
    /// Lower bound of the short-rate domain.
    pub r_min: Rate,
    /// Upper bound of the short-rate domain.
    pub r_max: Rate,
}

impl DiscretizationParameters {
    /// Create a new discretization (not validated).
    pub fn new(time_steps: Size, space_steps: Size, r_min: Rate, r_max: Rate) -> Self {
        Self {
            time_steps,
            space_steps,
            r_min,
            r_max,
        }
    }

    /// Check step counts and bounds.
    pub fn validate(&self) -> Result<()> {
        ensure_config!(self.time_steps >= 1, "time step count must be at least 1");
        ensure_config!(self.space_steps >= 1, "space step count must be at least 1");
        ensure_config!(
            self.r_min.is_finite() && self.r_max.is_finite(),
            "rate bounds must be finite, got [{}, {}]",
            self.r_min,
            self.r_max
        );
        ensure_config!(
            self.r_min < self.r_max,
            "r_min ({}) must be below r_max ({})",
            self.r_min,
            self.r_max
        );
        Ok(())
    }

    /// Spatial step `dr = (r_max − r_min) / M`.
    pub fn dr(&self) -> Real {
        (self.r_max - self.r_min) / self.space_steps as Real
    }

    /// Pseudo-time step `dτ = T / N` for a bond of the given maturity.
    pub fn dtau(&self, maturity: Time) -> Time {
        maturity / self.time_steps as Real
    }
}

impl Default for DiscretizationParameters {
    fn default() -> Self {
        Self::new(100, 50, 0.0, 0.15)
    }
}

/// Model and discretization bundled for one run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunConfig {
    /// Short-rate model parameters.
    pub model: ModelParameters,
    /// Grid parameters.
    pub discretization: DiscretizationParameters,
}

impl RunConfig {
    /// Bundle and validate both parameter sets.
    pub fn validated(
        model: ModelParameters,
        discretization: DiscretizationParameters,
    ) -> Result<Self> {
        let config = Self {
            model,
            discretization,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate both parameter sets.
    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        self.discretization.validate()
    }

    /// Pseudo-time step.
    pub fn dtau(&self) -> Time {
        self.discretization.dtau(self.model.maturity)
    }

    /// Spatial step.
    pub fn dr(&self) -> Real {
        self.discretization.dr()
    }
}
