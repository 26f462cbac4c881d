//! Piecewise-linear hat functions.

use zcb_core::{Real, Size};

/// The hat function attached to node `index` of a one-dimensional mesh.
///
/// Equal to one at its node, zero at every other node, linear in between.
/// The end nodes have one-sided support.
#[derive(Debug, Clone, Copy)]
pub struct HatFunction<'a> {
    index: Size,
    nodes: &'a [Real],
}

impl<'a> HatFunction<'a> {
    /// The hat function of node `index`.
    ///
    /// # Panics
    /// If `index` is not a node of `nodes`.
    pub fn new(index: Size, nodes: &'a [Real]) -> Self {
        assert!(index < nodes.len(), "node {index} outside a mesh of {}", nodes.len());
        Self { index, nodes }
    }

    /// Node index.
    pub fn index(&self) -> Size {
        self.index
    }

    /// Node coordinate.
    pub fn node(&self) -> Real {
        self.nodes[self.index]
    }

    fn left(&self) -> Option<Real> {
        self.index.checked_sub(1).map(|i| self.nodes[i])
    }

    fn right(&self) -> Option<Real> {
        self.nodes.get(self.index + 1).copied()
    }

    /// `[start, end]` outside of which the function vanishes.
    pub fn support(&self) -> (Real, Real) {
        let x = self.node();
        (self.left().unwrap_or(x), self.right().unwrap_or(x))
    }

    /// Value at `x`.
    pub fn value(&self, x: Real) -> Real {
        let xi = self.node();
        match (self.left(), self.right()) {
            (Some(a), _) if x >= a && x <= xi => (x - a) / (xi - a),
            (_, Some(b)) if x >= xi && x <= b => (b - x) / (b - xi),
            (None, None) if x == xi => 1.0,
            _ => 0.0,
        }
    }

    /// Derivative at `x`: `1/h` on the rising side, `−1/h` on the falling
    /// side, zero outside the support.
    ///
    /// At the node itself the falling-side slope is returned when there is
    /// one.
    pub fn derivative(&self, x: Real) -> Real {
        let xi = self.node();
        if let Some(b) = self.right() {
            if x >= xi && x <= b {
                return -1.0 / (b - xi);
            }
        }
        if let Some(a) = self.left() {
            if x >= a && x <= xi {
                return 1.0 / (xi - a);
            }
        }
        0.0
    }
}
