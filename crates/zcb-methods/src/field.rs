//! Price fields on a [`Grid`] and their comparison against the closed form.
//!
//! A [`PriceField`] is indexed `[calendar time index, rate index]`. Schemes
//! build their rows in pseudo-time order and hand them to
//! [`PriceField::from_pseudo_time_rows`], which performs the reversal
//! `V[k, ·] = Q[N − k, ·]`.

use std::ops::Index;

use crate::grid::Grid;
use zcb_core::{errors::Error, ensure, Price, Real, Result};
use zcb_models::DiscountBondPricer;

/// A dense row-major field of prices.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceField {
    rows: usize,
    cols: usize,
    data: Vec<Price>,
}

impl PriceField {
    /// Build a field by evaluating `f(row, col)` at every point.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Price,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    /// Assemble a calendar-time field from rows produced in pseudo-time order.
    ///
    /// Every row must have the same length.
    pub fn from_pseudo_time_rows(rows: Vec<Vec<Price>>) -> Result<Self> {
        ensure!(!rows.is_empty(), "a price field needs at least one row");
        let cols = rows[0].len();
        if let Some(bad) = rows.iter().find(|row| row.len() != cols) {
            return Err(Error::ShapeMismatch {
                expected: (rows.len(), cols),
                found: (rows.len(), bad.len()),
            });
        }
        let n_rows = rows.len();
        let data = rows.into_iter().rev().flatten().collect();
        Ok(Self {
            rows: n_rows,
            cols,
            data,
        })
    }

    /// Number of calendar-time rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of rate columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// The prices at calendar time index `i`.
    pub fn row(&self, i: usize) -> &[Price] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// All values in row-major order.
    pub fn as_slice(&self) -> &[Price] {
        &self.data
    }

    /// Whether every value is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

impl Index<(usize, usize)> for PriceField {
    type Output = Price;

    fn index(&self, (i, j): (usize, usize)) -> &Price {
        &self.data[i * self.cols + j]
    }
}

/// The closed-form price on every `(calendar time, rate)` node of `grid`.
pub fn analytical_field<P>(grid: &Grid, pricer: &P) -> PriceField
where
    P: DiscountBondPricer + ?Sized,
{
    let (rows, cols) = grid.shape();
    let times = grid.calendar_times();
    let rates = grid.rates();
    PriceField::from_fn(rows, cols, |i, j| pricer.price(times[i], rates[j]))
}

// ── Error evaluation ─────────────────────────────────────────────────────────

/// Elementwise absolute deviation of a scheme's field from the reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorField(PriceField);

impl ErrorField {
    /// The underlying deviations.
    pub fn values(&self) -> &PriceField {
        &self.0
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.0.shape()
    }

    /// Largest deviation (NaN if any deviation is NaN).
    pub fn max_abs_error(&self) -> Real {
        self.0
            .as_slice()
            .iter()
            .fold(0.0, |acc: Real, &e| {
                if acc.is_nan() || e.is_nan() {
                    Real::NAN
                } else {
                    acc.max(e)
                }
            })
    }

    /// Root-mean-square deviation over all nodes.
    pub fn rms_error(&self) -> Real {
        let values = self.0.as_slice();
        if values.is_empty() {
            return 0.0;
        }
        let sum: Real = values.iter().map(|e| e * e).sum();
        (sum / values.len() as Real).sqrt()
    }
}

impl Index<(usize, usize)> for ErrorField {
    type Output = Real;

    fn index(&self, idx: (usize, usize)) -> &Real {
        &self.0[idx]
    }
}

/// `|numerical − analytical|` node by node.
///
/// Fails with [`Error::ShapeMismatch`] when the fields differ in shape.
pub fn error_field(numerical: &PriceField, analytical: &PriceField) -> Result<ErrorField> {
    if numerical.shape() != analytical.shape() {
        return Err(Error::ShapeMismatch {
            expected: analytical.shape(),
            found: numerical.shape(),
        });
    }
    let data = numerical
        .as_slice()
        .iter()
        .zip(analytical.as_slice())
        .map(|(a, b)| (a - b).abs())
        .collect();
    Ok(ErrorField(PriceField {
        rows: numerical.rows,
        cols: numerical.cols,
        data,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use zcb_core::{ModelParameters, RunConfig};
    use zcb_models::AnalyticalSolver;

    #[test]
    fn pseudo_time_rows_are_reversed() {
        let rows = vec![vec![1.0, 1.0], vec![2.0, 3.0], vec![4.0, 5.0]];
        let field = PriceField::from_pseudo_time_rows(rows).unwrap();
        assert_eq!(field.shape(), (3, 2));
        assert_eq!(field.row(0), &[4.0, 5.0]);
        assert_eq!(field.row(2), &[1.0, 1.0]);
        assert_eq!(field[(1, 1)], 3.0);
    }

    #[test]
    fn ragged_rows_rejected() {
        let rows = vec![vec![1.0, 1.0], vec![2.0]];
        assert!(matches!(
            PriceField::from_pseudo_time_rows(rows),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn analytical_field_matches_pricer() {
        let config = RunConfig::default();
        let grid = Grid::new(&config).unwrap();
        let pricer = AnalyticalSolver::from_parameters(&ModelParameters::default()).unwrap();
        let field = analytical_field(&grid, &pricer);
        assert_eq!(field.shape(), (101, 51));
        // Last calendar row is maturity.
        assert!(field.row(100).iter().all(|&v| (v - 1.0).abs() < 1e-15));
        assert_abs_diff_eq!(field[(0, 0)], pricer.price(0.0, 0.0), epsilon = 1e-15);
    }

    #[test]
    fn error_field_and_summaries() {
        let a = PriceField::from_fn(2, 2, |i, j| (i + j) as Real);
        let b = PriceField::from_fn(2, 2, |_, _| 1.0);
        let err = error_field(&a, &b).unwrap();
        assert_eq!(err.shape(), (2, 2));
        assert_eq!(err[(0, 0)], 1.0);
        assert_eq!(err[(1, 1)], 1.0);
        assert_eq!(err[(0, 1)], 0.0);
        assert_eq!(err.max_abs_error(), 1.0);
        assert_abs_diff_eq!(err.rms_error(), (0.5 as Real).sqrt(), epsilon = 1e-15);
    }

    #[test]
    fn error_field_rejects_shape_mismatch() {
        let a = PriceField::from_fn(2, 3, |_, _| 0.0);
        let b = PriceField::from_fn(3, 2, |_, _| 0.0);
        match error_field(&a, &b) {
            Err(Error::ShapeMismatch { expected, found }) => {
                assert_eq!(expected, (3, 2));
                assert_eq!(found, (2, 3));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
