//! Error types for zcbond.
//!
//! A single `thiserror`-derived enum covers invalid configuration, numerical
//! divergence during time stepping, and contract violations such as fields of
//! differing shapes. The `ensure!` and `fail!` macros give terse early
//! returns for the precondition checks scattered through the solvers.

use thiserror::Error;

/// The top-level error type used throughout zcbond.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Invalid run parameters, rejected before any computation starts.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A computed value became non-finite or grew past the divergence bound
    /// (or a pivot vanished) while a scheme was marching in time.
    #[error("numerical instability in {scheme} at time step {step}: {reason}")]
    NumericalInstability {
        /// Name of the scheme that diverged.
        scheme: &'static str,
        /// Index of the time step whose result was rejected.
        step: usize,
        /// What was detected.
        reason: String,
    },

    /// A linear solve hit a zero (or vanishing) pivot.
    #[error("singular matrix: zero pivot at row {pivot_index}")]
    SingularMatrix {
        /// Row at which elimination broke down.
        pivot_index: usize,
    },

    /// Two fields that must share a shape do not.
    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// `(rows, cols)` of the reference operand.
        expected: (usize, usize),
        /// `(rows, cols)` of the offending operand.
        found: (usize, usize),
    },

    /// General runtime error.
    #[error("{0}")]
    Runtime(String),

    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),
}

impl Error {
    /// Re-tag a solver failure as an instability of `scheme` at `step`.
    ///
    /// Configuration and shape errors pass through untouched.
    pub fn at_step(self, scheme: &'static str, step: usize) -> Self {
        match self {
            Error::SingularMatrix { pivot_index } => Error::NumericalInstability {
                scheme,
                step,
                reason: format!("zero pivot at row {pivot_index}"),
            },
            Error::Runtime(reason) => Error::NumericalInstability {
                scheme,
                step,
                reason,
            },
            other => other,
        }
    }
}

/// Shorthand `Result` type used throughout zcbond.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use zcb_core::{ensure, errors::Error};
/// fn positive(x: f64) -> zcb_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Configuration(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use zcb_core::{ensure_config, errors::Error};
/// fn steps(n: usize) -> zcb_core::errors::Result<usize> {
///     ensure_config!(n > 0, "step count must be positive");
///     Ok(n)
/// }
/// assert!(matches!(steps(0), Err(Error::Configuration(_))));
/// ```
#[macro_export]
macro_rules! ensure_config {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Configuration(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use zcb_core::{fail, errors::Error};
/// fn always_err() -> zcb_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_matrix_becomes_instability() {
        let err = Error::SingularMatrix { pivot_index: 3 }.at_step("implicit", 7);
        match err {
            Error::NumericalInstability { scheme, step, reason } => {
                assert_eq!(scheme, "implicit");
                assert_eq!(step, 7);
                assert!(reason.contains('3'));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn configuration_error_is_not_retagged() {
        let err = Error::Configuration("bad".into()).at_step("explicit", 1);
        assert_eq!(err, Error::Configuration("bad".into()));
    }

    #[test]
    fn display_mentions_step() {
        let err = Error::NumericalInstability {
            scheme: "explicit",
            step: 42,
            reason: "non-finite value".into(),
        };
        assert!(err.to_string().contains("time step 42"));
    }
}
