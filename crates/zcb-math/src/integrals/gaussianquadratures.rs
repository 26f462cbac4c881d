//! Gauss-Legendre quadrature rules.
//!
//! Nodes are the roots of the Legendre polynomial `Pₙ`, found by Newton
//! iteration from the Chebyshev-like initial guesses
//! `cos(π(i + 3/4)/(n + 1/2))`; weights are `2 / ((1 − x²) Pₙ'(x)²)`.

use std::f64::consts::PI;
use zcb_core::Real;

/// A Gauss quadrature rule on `[−1, 1]` defined by nodes and weights.
#[derive(Debug, Clone)]
pub struct GaussianQuadrature {
    x: Vec<Real>,
    w: Vec<Real>,
}

impl GaussianQuadrature {
    /// Gauss-Legendre rule with `order` points, exact for polynomials of
    /// degree `2·order − 1`.
    pub fn legendre(order: usize) -> Self {
        let n = order;
        let mut x = vec![0.0; n];
        let mut w = vec![0.0; n];
        let nf = n as Real;

        for i in 0..n.div_ceil(2) {
            let mut z = (PI * (i as Real + 0.75) / (nf + 0.5)).cos();
            for _ in 0..100 {
                let (p, dp) = legendre_with_derivative(n, z);
                let step = p / dp;
                z -= step;
                if step.abs() < 1e-15 {
                    break;
                }
            }
            let (_, dp) = legendre_with_derivative(n, z);
            let weight = 2.0 / ((1.0 - z * z) * dp * dp);
            x[i] = -z;
            x[n - 1 - i] = z;
            w[i] = weight;
            w[n - 1 - i] = weight;
        }
        Self { x, w }
    }

    /// Quadrature nodes.
    pub fn x(&self) -> &[Real] {
        &self.x
    }

    /// Quadrature weights.
    pub fn w(&self) -> &[Real] {
        &self.w
    }

    /// Number of quadrature points.
    pub fn order(&self) -> usize {
        self.x.len()
    }

    /// Evaluate `∫_{−1}^{1} f(x) dx ≈ Σ wᵢ f(xᵢ)`.
    pub fn integrate<F: Fn(Real) -> Real>(&self, f: F) -> Real {
        self.x.iter().zip(self.w.iter()).map(|(&xi, &wi)| wi * f(xi)).sum()
    }

    /// Integrate `f` on `[a, b]` by mapping to `[−1, 1]`.
    pub fn integrate_on<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Real {
        let half = 0.5 * (b - a);
        let mid = 0.5 * (a + b);
        self.integrate(|xi| f(mid + half * xi)) * half
    }
}

/// `(Pₙ(z), Pₙ'(z))` by the three-term recurrence.
fn legendre_with_derivative(n: usize, z: Real) -> (Real, Real) {
    if n == 0 {
        return (1.0, 0.0);
    }
    let mut p0 = 1.0;
    let mut p1 = z;
    for k in 2..=n {
        let kf = k as Real;
        let p2 = ((2.0 * kf - 1.0) * z * p1 - (kf - 1.0) * p0) / kf;
        p0 = p1;
        p1 = p2;
    }
    let nf = n as Real;
    let dp = nf * (z * p1 - p0) / (z * z - 1.0);
    (p1, dp)
}
