//! `Matrix`, a dense two-dimensional matrix of reals.
//!
//! A thin newtype around `nalgebra::DMatrix<f64>` exposing what the
//! finite-element scheme needs: element access, linear combinations,
//! matrix-vector products, row replacement for Dirichlet rows, and an LU
//! solve that reports singularity as an error.

use nalgebra::{DMatrix, DVector};
use std::ops::{Add, Index, IndexMut, Mul, Sub};
use zcb_core::{ensure, errors::Error, Real, Result};

/// A dynamically-sized 2D matrix of `Real` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix(DMatrix<Real>);

impl Matrix {
    /// Create a zero-filled `rows × cols` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self(DMatrix::zeros(rows, cols))
    }

    /// Create a matrix filled with `value`.
    pub fn from_element(rows: usize, cols: usize, value: Real) -> Self {
        Self(DMatrix::from_element(rows, cols, value))
    }

    /// Create an identity matrix of size `n × n`.
    pub fn identity(n: usize) -> Self {
        Self(DMatrix::identity(n, n))
    }

    /// Create from a row-major data slice.
    pub fn from_row_slice(rows: usize, cols: usize, data: &[Real]) -> Self {
        Self(DMatrix::from_row_slice(rows, cols, data))
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.0.nrows()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.0.ncols()
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.0.shape()
    }

    /// Return `true` if the matrix is square.
    pub fn is_square(&self) -> bool {
        self.0.nrows() == self.0.ncols()
    }

    /// Return `true` if `|a_ij − a_ji| <= tolerance` for every pair.
    pub fn is_symmetric(&self, tolerance: Real) -> bool {
        self.is_square()
            && (0..self.rows())
                .all(|i| (0..i).all(|j| (self.0[(i, j)] - self.0[(j, i)]).abs() <= tolerance))
    }

    /// Half-bandwidth: the largest `|i − j|` with a non-zero entry.
    pub fn bandwidth(&self) -> usize {
        let mut width = 0;
        for i in 0..self.rows() {
            for j in 0..self.cols() {
                if self.0[(i, j)] != 0.0 {
                    width = width.max(i.abs_diff(j));
                }
            }
        }
        width
    }

    /// Borrow the inner `DMatrix`.
    pub fn inner(&self) -> &DMatrix<Real> {
        &self.0
    }

    /// Consume and return the inner `DMatrix`.
    pub fn into_inner(self) -> DMatrix<Real> {
        self.0
    }

    /// Extract a row as a `Vec`.
    pub fn row(&self, i: usize) -> Vec<Real> {
        self.0.row(i).iter().copied().collect()
    }

    /// Overwrite row `i` with the `i`-th row of the identity.
    pub fn set_identity_row(&mut self, i: usize) {
        self.0.row_mut(i).fill(0.0);
        self.0[(i, i)] = 1.0;
    }

    /// Matrix-vector product `M · v`.
    pub fn mul_vec(&self, v: &[Real]) -> Result<Vec<Real>> {
        ensure!(
            v.len() == self.cols(),
            "cannot multiply a {:?} matrix by a vector of length {}",
            self.shape(),
            v.len()
        );
        let product = &self.0 * DVector::from_column_slice(v);
        Ok(product.iter().copied().collect())
    }

    /// Multiply every element by `scalar`.
    pub fn scale(&self, scalar: Real) -> Self {
        Self(&self.0 * scalar)
    }

    /// Solve `M · x = rhs` by LU decomposition with partial pivoting.
    ///
    /// Returns [`Error::SingularMatrix`] when the factorization has a
    /// vanishing pivot or the solution is not finite.
    pub fn solve(&self, rhs: &[Real]) -> Result<Vec<Real>> {
        ensure!(self.is_square(), "cannot solve with a {:?} matrix", self.shape());
        ensure!(
            rhs.len() == self.rows(),
            "right-hand side has length {}, expected {}",
            rhs.len(),
            self.rows()
        );
        let lu = self.0.clone().lu();
        let u = lu.u();
        if let Some(pivot_index) = (0..u.nrows()).find(|&i| {
            let p = u[(i, i)];
            !p.is_finite() || p == 0.0
        }) {
            return Err(Error::SingularMatrix { pivot_index });
        }
        let x = lu
            .solve(&DVector::from_column_slice(rhs))
            .ok_or(Error::SingularMatrix { pivot_index: 0 })?;
        if let Some(pivot_index) = x.iter().position(|v| !v.is_finite()) {
            return Err(Error::SingularMatrix { pivot_index });
        }
        Ok(x.iter().copied().collect())
    }
}

// ── From / Into ───────────────────────────────────────────────────────────────

impl From<DMatrix<Real>> for Matrix {
    fn from(m: DMatrix<Real>) -> Self {
        Self(m)
    }
}

impl From<Matrix> for DMatrix<Real> {
    fn from(m: Matrix) -> Self {
        m.0
    }
}

// ── Indexing ──────────────────────────────────────────────────────────────────

impl Index<(usize, usize)> for Matrix {
    type Output = Real;
    fn index(&self, (i, j): (usize, usize)) -> &Real {
        &self.0[(i, j)]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Real {
        &mut self.0[(i, j)]
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────────

impl Add for &Matrix {
    type Output = Matrix;
    fn add(self, rhs: &Matrix) -> Matrix {
        Matrix(&self.0 + &rhs.0)
    }
}

impl Sub for &Matrix {
    type Output = Matrix;
    fn sub(self, rhs: &Matrix) -> Matrix {
        Matrix(&self.0 - &rhs.0)
    }
}

impl Mul<Real> for &Matrix {
    type Output = Matrix;
    fn mul(self, rhs: Real) -> Matrix {
        Matrix(&self.0 * rhs)
    }
}
