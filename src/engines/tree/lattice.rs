//! Module `engines::tree::lattice`.
//!
//! Dense `(steps + 1) x width` grids indexed by `(step, position)` and the
//! builders that expand calibrated parameters into underlying-price lattices.
//!
//! Layout:
//! - binomial: width `N + 1`; position `j` at step `i` counts down-moves,
//!   live for `0 <= j <= i`, root at `(0, 0)`.
//! - trinomial: width `2N + 1`; position `j` is an offset around the centre
//!   column `N`, live for `N - i <= j <= N + i`, root at `(0, N)`.
//!
//! Cells outside the live range hold `0.0`.

use std::ops::RangeInclusive;

use crate::core::TreeKind;
use crate::engines::tree::calibration::{BinomialParameters, TrinomialParameters};

/// Row-major lattice of node values.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Lattice {
    kind: TreeKind,
    steps: usize,
    width: usize,
    values: Vec<f64>,
}

impl Lattice {
    /// Zero-filled lattice shaped for `kind` with `steps` time steps.
    pub fn zeros(kind: TreeKind, steps: usize) -> Self {
        let width = kind.width(steps);
        Self {
            kind,
            steps,
            width,
            values: vec![0.0; (steps + 1) * width],
        }
    }

    #[inline]
    pub fn kind(&self) -> TreeKind {
        self.kind
    }

    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// `(rows, columns)` of the underlying grid.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.steps + 1, self.width)
    }

    /// Column of the time-zero node.
    #[inline]
    pub fn root_position(&self) -> usize {
        match self.kind {
            TreeKind::Binomial => 0,
            TreeKind::Trinomial => self.steps,
        }
    }

    /// Positions holding live nodes at `step`.
    #[inline]
    pub fn active_range(&self, step: usize) -> RangeInclusive<usize> {
        match self.kind {
            TreeKind::Binomial => 0..=step,
            TreeKind::Trinomial => (self.steps - step)..=(self.steps + step),
        }
    }

    #[inline]
    pub fn get(&self, step: usize, position: usize) -> f64 {
        self.values[step * self.width + position]
    }

    #[inline]
    pub fn set(&mut self, step: usize, position: usize, value: f64) {
        self.values[step * self.width + position] = value;
    }

    /// Full row at `step`, including inactive cells.
    #[inline]
    pub fn row(&self, step: usize) -> &[f64] {
        let start = step * self.width;
        &self.values[start..start + self.width]
    }

    #[inline]
    pub fn row_mut(&mut self, step: usize) -> &mut [f64] {
        let start = step * self.width;
        &mut self.values[start..start + self.width]
    }

    /// Live nodes at `step`, ordered by position.
    #[inline]
    pub fn active_row(&self, step: usize) -> &[f64] {
        let range = self.active_range(step);
        &self.row(step)[range]
    }

    /// Maturity row.
    #[inline]
    pub fn terminal(&self) -> &[f64] {
        self.row(self.steps)
    }

    /// Value at the root node.
    #[inline]
    pub fn root(&self) -> f64 {
        self.get(0, self.root_position())
    }
}

/// Binomial underlying lattice: `S(i, j) = S0 * u^(i - j) * d^j`.
pub fn build_binomial(spot: f64, params: &BinomialParameters) -> Lattice {
    let n = params.steps;
    let mut lattice = Lattice::zeros(TreeKind::Binomial, n);
    for i in 0..=n {
        let row = lattice.row_mut(i);
        for (j, node) in row.iter_mut().enumerate().take(i + 1) {
            *node = spot * params.up.powi((i - j) as i32) * params.down.powi(j as i32);
        }
    }
    lattice
}

/// Trinomial underlying lattice built forward from the centre column.
///
/// Above the centre a node is its lower neighbour at the previous step times
/// `u`; below the centre it is its upper neighbour times `d`; the centre column
/// is the previous centre times `m`.
pub fn build_trinomial(spot: f64, params: &TrinomialParameters) -> Lattice {
    let n = params.steps;
    let mut lattice = Lattice::zeros(TreeKind::Trinomial, n);
    lattice.set(0, n, spot);
    for i in 1..=n {
        for j in (n - i)..=(n + i) {
            let value = if j > n {
                lattice.get(i - 1, j - 1) * params.up
            } else if j < n {
                lattice.get(i - 1, j + 1) * params.down
            } else {
                lattice.get(i - 1, j) * params.mid
            };
            lattice.set(i, j, value);
        }
    }
    lattice
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn binomial_params() -> BinomialParameters {
        BinomialParameters::from_volatility(1.0, 0.05, 0.0, 2, 0.2).unwrap()
    }

    #[test]
    fn binomial_shape_and_values() {
        let p = binomial_params();
        let lattice = build_binomial(50.0, &p);
        assert_eq!(lattice.shape(), (3, 3));
        assert_eq!(lattice.root(), 50.0);
        assert_relative_eq!(lattice.get(2, 0), 50.0 * p.up * p.up, epsilon = 1e-12);
        assert_relative_eq!(lattice.get(2, 1), 50.0, epsilon = 1e-12);
        assert_relative_eq!(lattice.get(2, 2), 50.0 * p.down * p.down, epsilon = 1e-12);
        // Inactive cell above the diagonal stays empty.
        assert_eq!(lattice.get(1, 2), 0.0);
    }

    #[test]
    fn binomial_prices_increase_with_up_moves() {
        let p = BinomialParameters::from_volatility(1.0, 0.05, 0.0, 25, 0.3).unwrap();
        let lattice = build_binomial(100.0, &p);
        for i in 0..=p.steps {
            // Position counts down-moves, so prices fall with position.
            assert!(lattice.active_row(i).windows(2).all(|w| w[0] >= w[1]));
        }
    }

    #[test]
    fn trinomial_shape_and_centre() {
        let p = TrinomialParameters::from_volatility(1.0, 0.05, 0.0, 3, 0.2).unwrap();
        let lattice = build_trinomial(50.0, &p);
        assert_eq!(lattice.shape(), (4, 7));
        assert_eq!(lattice.root_position(), 3);
        assert_eq!(lattice.root(), 50.0);
        for i in 0..=3 {
            assert_relative_eq!(lattice.get(i, 3), 50.0, epsilon = 1e-12);
        }
        assert_relative_eq!(lattice.get(3, 6), 50.0 * p.up.powi(3), epsilon = 1e-10);
        assert_relative_eq!(lattice.get(3, 0), 50.0 * p.down.powi(3), epsilon = 1e-10);
        assert_eq!(lattice.get(1, 0), 0.0);
        assert_eq!(lattice.active_row(1).len(), 3);
    }

    #[test]
    fn trinomial_prices_increase_with_offset() {
        let p = TrinomialParameters::from_volatility(2.0, 0.03, 0.01, 20, 0.25).unwrap();
        let lattice = build_trinomial(80.0, &p);
        for i in 0..=p.steps {
            assert!(lattice.active_row(i).windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn trinomial_centre_scales_with_mid_multiplier() {
        let moves = crate::engines::tree::calibration::TrinomialMoves {
            up: 1.2,
            mid: 1.01,
            down: 0.8,
            prob_up: 0.25,
            prob_mid: 0.5,
            prob_down: 0.25,
        };
        let p = TrinomialParameters::from_direct(1.0, 0.05, 2, moves).unwrap();
        let lattice = build_trinomial(100.0, &p);
        assert_relative_eq!(lattice.get(2, 2), 100.0 * 1.01 * 1.01, epsilon = 1e-12);
    }
}
