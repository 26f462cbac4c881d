//! Discrete grids.

use zcb_core::{Rate, Real, Result, RunConfig, Size, Time};

/// Uniform pseudo-time and short-rate grids for one run.
///
/// `τ₀ = 0 < τ₁ < … < τ_N = T` with spacing `dτ`, the calendar view
/// `t = T − τ` listed in increasing order, and `r₀ = r_min < … < r_M = r_max`
/// with spacing `dr`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    maturity: Time,
    dtau: Time,
    dr: Real,
    tau: Vec<Time>,
    calendar: Vec<Time>,
    rates: Vec<Rate>,
}

impl Grid {
    /// Build the grids from a validated configuration.
    pub fn new(config: &RunConfig) -> Result<Self> {
        config.validate()?;
        let maturity = config.model.maturity;
        let disc = &config.discretization;
        let n = disc.time_steps;
        let m = disc.space_steps;
        let dtau = config.dtau();
        let dr = config.dr();

        let mut tau: Vec<Time> = (0..=n).map(|k| k as Real * dtau).collect();
        tau[n] = maturity;
        let calendar: Vec<Time> = tau.iter().rev().map(|&s| maturity - s).collect();
        let mut rates: Vec<Rate> = (0..=m).map(|i| disc.r_min + i as Real * dr).collect();
        rates[m] = disc.r_max;

        Ok(Self {
            maturity,
            dtau,
            dr,
            tau,
            calendar,
            rates,
        })
    }

    /// Bond maturity `T`.
    pub fn maturity(&self) -> Time {
        self.maturity
    }

    /// Pseudo-time step.
    pub fn dtau(&self) -> Time {
        self.dtau
    }

    /// Spatial step.
    pub fn dr(&self) -> Real {
        self.dr
    }

    /// Number of time steps `N`.
    pub fn time_steps(&self) -> Size {
        self.tau.len() - 1
    }

    /// Number of spatial intervals `M`.
    pub fn space_steps(&self) -> Size {
        self.rates.len() - 1
    }

    /// Pseudo-time points `τ₀..τ_N`.
    pub fn tau(&self) -> &[Time] {
        &self.tau
    }

    /// Calendar times in increasing order; `calendar_times()[k] = T − τ_{N−k}`.
    pub fn calendar_times(&self) -> &[Time] {
        &self.calendar
    }

    /// Short-rate nodes `r₀..r_M`.
    pub fn rates(&self) -> &[Rate] {
        &self.rates
    }

    /// Lower rate bound.
    pub fn r_min(&self) -> Rate {
        self.rates[0]
    }

    /// Upper rate bound.
    pub fn r_max(&self) -> Rate {
        self.rates[self.rates.len() - 1]
    }

    /// Calendar time reached after `step` pseudo-time steps.
    pub fn calendar_time_at_step(&self, step: Size) -> Time {
        self.maturity - self.tau[step]
    }

    /// `(time points, rate nodes)`: the shape of every field on this grid.
    pub fn shape(&self) -> (usize, usize) {
        (self.tau.len(), self.rates.len())
    }
}
