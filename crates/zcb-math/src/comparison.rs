//! Pivot checks shared by the linear solvers.

use zcb_core::Real;

/// Smallest pivot magnitude accepted by the linear solvers.
pub const PIVOT_EPSILON: Real = 1e-300;

/// Return `true` if `pivot` is usable as a divisor.
#[inline]
pub fn is_usable_pivot(pivot: Real) -> bool {
    pivot.is_finite() && pivot.abs() > PIVOT_EPSILON
}
