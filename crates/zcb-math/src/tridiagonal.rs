//! Tridiagonal linear systems and the Thomas algorithm.
//!
//! The system has the form:
//! ```text
//! | b[0]  c[0]   0    ...     0    | | x[0]   |   | d[0]   |
//! | a[1]  b[1]  c[1]  ...     0    | | x[1]   |   | d[1]   |
//! |  0    a[2]  b[2]  ...     0    | | x[2]   | = | d[2]   |
//! | ...   ...   ...   ...    ...   | | ...    |   | ...    |
//! |  0     0     0   a[n-1] b[n-1] | | x[n-1] |   | d[n-1] |
//! ```
//!
//! All four bands share the same length; `a[0]` and `c[n-1]` are ignored.
//! No pivoting is performed: the discretizations that build these systems
//! produce diagonally dominant matrices for the parameter ranges they accept.
//! A vanishing or non-finite pivot is reported as [`Error::SingularMatrix`]
//! instead of being divided through.

use crate::comparison::is_usable_pivot;
use zcb_core::{ensure, errors::Error, Real, Result};

/// Solve `A · x = d` for the tridiagonal `A` given by its three bands.
///
/// Forward elimination normalizes each row by its pivot; the final row has
/// no super-diagonal and is closed separately before back substitution.
pub fn solve_tridiagonal(
    lower: &[Real],
    diag: &[Real],
    upper: &[Real],
    rhs: &[Real],
) -> Result<Vec<Real>> {
    let n = diag.len();
    ensure!(n > 0, "tridiagonal system must not be empty");
    ensure!(
        lower.len() == n && upper.len() == n && rhs.len() == n,
        "tridiagonal bands have inconsistent lengths: lower={}, diag={n}, upper={}, rhs={}",
        lower.len(),
        upper.len(),
        rhs.len()
    );

    if !is_usable_pivot(diag[0]) {
        return Err(Error::SingularMatrix { pivot_index: 0 });
    }
    if n == 1 {
        return Ok(vec![rhs[0] / diag[0]]);
    }

    // Forward sweep
    let mut c_prime = vec![0.0; n - 1];
    let mut d_prime = vec![0.0; n];
    c_prime[0] = upper[0] / diag[0];
    d_prime[0] = rhs[0] / diag[0];

    for i in 1..n - 1 {
        let denom = diag[i] - lower[i] * c_prime[i - 1];
        if !is_usable_pivot(denom) {
            return Err(Error::SingularMatrix { pivot_index: i });
        }
        c_prime[i] = upper[i] / denom;
        d_prime[i] = (rhs[i] - lower[i] * d_prime[i - 1]) / denom;
    }

    let last = n - 1;
    let denom = diag[last] - lower[last] * c_prime[last - 1];
    if !is_usable_pivot(denom) {
        return Err(Error::SingularMatrix { pivot_index: last });
    }
    d_prime[last] = (rhs[last] - lower[last] * d_prime[last - 1]) / denom;

    // Back substitution
    let mut x = vec![0.0; n];
    x[last] = d_prime[last];
    for i in (0..last).rev() {
        x[i] = d_prime[i] - c_prime[i] * x[i + 1];
    }

    Ok(x)
}

/// The three bands of a tridiagonal matrix.
///
/// Used for operators that do not change between time steps, such as the
/// two sides of the Crank-Nicolson discretization.
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalOperator {
    /// Lower diagonal (index 0 unused).
    pub lower: Vec<Real>,
    /// Main diagonal.
    pub diag: Vec<Real>,
    /// Upper diagonal (last index unused).
    pub upper: Vec<Real>,
}

impl TridiagonalOperator {
    /// Create a zero operator of size `n`.
    pub fn new(n: usize) -> Self {
        Self {
            lower: vec![0.0; n],
            diag: vec![0.0; n],
            upper: vec![0.0; n],
        }
    }

    /// Size (number of rows/columns).
    pub fn size(&self) -> usize {
        self.diag.len()
    }

    /// Apply the operator: `y = A · x`.
    ///
    /// `x` must have [`size`](Self::size) entries.
    pub fn apply(&self, x: &[Real]) -> Result<Vec<Real>> {
        band_product(&self.lower, &self.diag, &self.upper, x)
    }

    /// Solve `A · x = rhs`.
    pub fn solve(&self, rhs: &[Real]) -> Result<Vec<Real>> {
        solve_tridiagonal(&self.lower, &self.diag, &self.upper, rhs)
    }
}

/// One tridiagonal solve: three bands plus the right-hand side.
///
/// Built per time step by the implicit schemes and consumed immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalSystem {
    /// Sub-diagonal `a` (index 0 unused).
    pub lower: Vec<Real>,
    /// Diagonal `b`.
    pub diag: Vec<Real>,
    /// Super-diagonal `c` (last index unused).
    pub upper: Vec<Real>,
    /// Right-hand side `d`.
    pub rhs: Vec<Real>,
}

impl TridiagonalSystem {
    /// Create a zero system of size `n`.
    pub fn new(n: usize) -> Self {
        Self {
            lower: vec![0.0; n],
            diag: vec![0.0; n],
            upper: vec![0.0; n],
            rhs: vec![0.0; n],
        }
    }

    /// Size of the system.
    pub fn size(&self) -> usize {
        self.diag.len()
    }

    /// Solve for `x` with the Thomas algorithm.
    pub fn solve(&self) -> Result<Vec<Real>> {
        solve_tridiagonal(&self.lower, &self.diag, &self.upper, &self.rhs)
    }

    /// Multiply the coefficient matrix by `x`.
    pub fn apply(&self, x: &[Real]) -> Result<Vec<Real>> {
        band_product(&self.lower, &self.diag, &self.upper, x)
    }
}

fn band_product(
    lower: &[Real],
    diag: &[Real],
    upper: &[Real],
    x: &[Real],
) -> Result<Vec<Real>> {
    let n = diag.len();
    ensure!(
        x.len() == n && lower.len() == n && upper.len() == n,
        "band product needs {n} entries per band and vector, got lower {}, upper {}, x {}",
        lower.len(),
        upper.len(),
        x.len()
    );
    Ok((0..n)
        .map(|i| {
            let mut y = diag[i] * x[i];
            if i > 0 {
                y += lower[i] * x[i - 1];
            }
            if i + 1 < n {
                y += upper[i] * x[i + 1];
            }
            y
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn thomas_algorithm_solves_identity() {
        let mut sys = TridiagonalSystem::new(4);
        sys.diag = vec![1.0; 4];
        sys.rhs = vec![1.0, 2.0, 3.0, 4.0];
        let x = sys.solve().unwrap();
        for i in 0..4 {
            assert!((x[i] - sys.rhs[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn thomas_algorithm_solves_tridiagonal() {
        // A = [[2, -1, 0], [-1, 2, -1], [0, -1, 2]]
        // x = [1, 2, 3]
        // Ax = [0, 0, 4]
        let sys = TridiagonalSystem {
            lower: vec![0.0, -1.0, -1.0],
            diag: vec![2.0, 2.0, 2.0],
            upper: vec![-1.0, -1.0, 0.0],
            rhs: vec![0.0, 0.0, 4.0],
        };
        let x = sys.solve().unwrap();
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn two_by_two() {
        // [[4, 1], [2, 3]] x = [6, 8] → x = [1, 2]
        let x = solve_tridiagonal(&[0.0, 2.0], &[4.0, 3.0], &[1.0, 0.0], &[6.0, 8.0]).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn single_row() {
        let x = solve_tridiagonal(&[0.0], &[4.0], &[0.0], &[2.0]).unwrap();
        assert_eq!(x, vec![0.5]);
    }

    #[test]
    fn zero_leading_pivot_is_singular() {
        let err = solve_tridiagonal(&[0.0, 1.0], &[0.0, 1.0], &[1.0, 0.0], &[1.0, 1.0]);
        assert_eq!(err, Err(Error::SingularMatrix { pivot_index: 0 }));
    }

    #[test]
    fn vanishing_last_pivot_is_singular() {
        // [[1, 1], [1, 1]] is singular; the second pivot is 1 − 1·1 = 0.
        let err = solve_tridiagonal(&[0.0, 1.0], &[1.0, 1.0], &[1.0, 0.0], &[1.0, 1.0]);
        assert_eq!(err, Err(Error::SingularMatrix { pivot_index: 1 }));
    }

    #[test]
    fn inconsistent_lengths_rejected() {
        let err = solve_tridiagonal(&[0.0], &[1.0, 1.0], &[0.0, 0.0], &[1.0, 1.0]);
        assert!(matches!(err, Err(Error::Precondition(_))));
    }

    #[test]
    fn operator_apply_then_solve() {
        let op = TridiagonalOperator {
            lower: vec![0.0, 1.0, 1.0, 1.0],
            diag: vec![4.0, 4.0, 4.0, 4.0],
            upper: vec![1.0, 1.0, 1.0, 0.0],
        };
        let x = vec![1.0, -2.0, 3.0, 0.5];
        let rhs = op.apply(&x).unwrap();
        let solved = op.solve(&rhs).unwrap();
        for (a, b) in x.iter().zip(&solved) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn apply_rejects_wrong_length() {
        let op = TridiagonalOperator::new(3);
        assert!(matches!(op.apply(&[1.0, 2.0]), Err(Error::Precondition(_))));
        let sys = TridiagonalSystem::new(2);
        assert!(matches!(sys.apply(&[1.0, 2.0, 3.0]), Err(Error::Precondition(_))));
    }

    fn dominant_system() -> impl Strategy<Value = TridiagonalSystem> {
        (2usize..60).prop_flat_map(|n| {
            (
                prop::collection::vec(-1.0f64..1.0, n),
                prop::collection::vec(-1.0f64..1.0, n),
                prop::collection::vec(0.1f64..5.0, n),
                prop::collection::vec(-10.0f64..10.0, n),
            )
                .prop_map(move |(lower, upper, margin, rhs)| {
                    let mut lower = lower;
                    let mut upper = upper;
                    lower[0] = 0.0;
                    upper[n - 1] = 0.0;
                    let diag = (0..n)
                        .map(|i| {
                            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                            sign * (lower[i].abs() + upper[i].abs() + margin[i])
                        })
                        .collect();
                    TridiagonalSystem {
                        lower,
                        diag,
                        upper,
                        rhs,
                    }
                })
        })
    }

    proptest! {
        #[test]
        fn solution_reproduces_rhs(sys in dominant_system()) {
            let x = sys.solve().unwrap();
            let reconstructed = sys.apply(&x).unwrap();
            for (got, want) in reconstructed.iter().zip(&sys.rhs) {
                prop_assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
            }
        }
    }
}
