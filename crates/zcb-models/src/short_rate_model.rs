//! Short-rate model traits.

use zcb_core::{Price, Rate, Real, Time};

/// A one-factor short-rate model `dr = μ(r) dt + σ(r) dW`.
///
/// The pricing PDE for a zero-coupon bond under such a model is
/// `∂V/∂t + μ(r) ∂V/∂r + ½σ(r)² ∂²V/∂r² − rV = 0`.
pub trait ShortRateModel {
    /// Instantaneous drift `μ(r)`.
    fn drift(&self, r: Rate) -> Real;

    /// Instantaneous diffusion `σ(r)`.
    fn diffusion(&self, r: Rate) -> Real;

    /// Discount bond price `P(t, T)` seen at `t` with short rate `rate`.
    fn discount_bond(&self, t: Time, big_t: Time, rate: Rate) -> Price;
}

/// Price of the zero-coupon bond at calendar time `t` and short rate `r`.
///
/// Stateless from the caller's point of view; shared read-only by every
/// scheme for its boundary values.
pub trait DiscountBondPricer {
    /// Bond price `V(t, r)`.
    fn price(&self, t: Time, r: Rate) -> Price;
}

impl<F> DiscountBondPricer for F
where
    F: Fn(Time, Rate) -> Price,
{
    fn price(&self, t: Time, r: Rate) -> Price {
        (self)(t, r)
    }
}
