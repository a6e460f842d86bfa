//! Module `engines::tree::induction`.
//!
//! Backward induction from maturity to time zero, with optional early exercise
//! and local hedge ratios.
//!
//! References: Hull (11th ed.) Ch. 13, backward-induction recursions around Eq. (13.10).
//!
//! Recurrences:
//! - binomial: `V(i, j) = df * (qu V(i+1, j) + qd V(i+1, j+1))`
//! - trinomial: `V(i, j) = df * (pu V(i+1, j+1) + pm V(i+1, j) + pd V(i+1, j-1))`
//!
//! Delta at `(i, j)` for `i < N` is `(V_up - V_down) / (S_up - S_down)` over the
//! outermost children and is `0` when the children share a price. The maturity
//! row of the delta lattice is left at zero.

use crate::core::{OptionType, TreeKind};
use crate::engines::tree::calibration::{BinomialParameters, TrinomialParameters};
use crate::engines::tree::lattice::Lattice;
use crate::pricing::payoff::intrinsic;

/// Early-exercise test applied at every interior node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EarlyExercise {
    pub option_type: OptionType,
    pub strike: f64,
}

impl EarlyExercise {
    pub fn new(option_type: OptionType, strike: f64) -> Self {
        Self {
            option_type,
            strike,
        }
    }

    #[inline]
    fn apply(&self, continuation: f64, spot: f64) -> f64 {
        continuation.max(intrinsic(self.option_type, spot, self.strike))
    }
}

/// Option-value and delta lattices produced by one backward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct InductionOutput {
    pub option_values: Lattice,
    pub deltas: Lattice,
}

/// Local hedge ratio between two child nodes; `0` for a degenerate spread.
#[inline]
pub fn local_delta(value_up: f64, value_down: f64, spot_up: f64, spot_down: f64) -> f64 {
    let spread = spot_up - spot_down;
    if spread == 0.0 {
        0.0
    } else {
        (value_up - value_down) / spread
    }
}

/// Rolls a binomial payoff vector back to time zero.
///
/// `payoffs` holds the maturity row of `underlying`, indexed by down-move count.
pub fn roll_back_binomial(
    underlying: &Lattice,
    payoffs: &[f64],
    params: &BinomialParameters,
    exercise: Option<EarlyExercise>,
) -> InductionOutput {
    let n = params.steps;
    debug_assert_eq!(underlying.kind(), TreeKind::Binomial);
    debug_assert_eq!(payoffs.len(), n + 1);

    let disc_up = params.discount_factor * params.prob_up;
    let disc_down = params.discount_factor * params.prob_down;

    let mut option_values = Lattice::zeros(TreeKind::Binomial, n);
    let mut deltas = Lattice::zeros(TreeKind::Binomial, n);
    option_values.row_mut(n).copy_from_slice(payoffs);

    for i in (0..n).rev() {
        for j in 0..=i {
            let v_up = option_values.get(i + 1, j);
            let v_down = option_values.get(i + 1, j + 1);
            let continuation = disc_up.mul_add(v_up, disc_down * v_down);
            let value = match exercise {
                Some(rule) => rule.apply(continuation, underlying.get(i, j)),
                None => continuation,
            };
            option_values.set(i, j, value);
            deltas.set(
                i,
                j,
                local_delta(
                    v_up,
                    v_down,
                    underlying.get(i + 1, j),
                    underlying.get(i + 1, j + 1),
                ),
            );
        }
    }

    InductionOutput {
        option_values,
        deltas,
    }
}

/// Rolls a trinomial payoff vector back to time zero.
///
/// `payoffs` holds the full `2N + 1` maturity row of `underlying`. No
/// early-exercise test is applied on this tree.
pub fn roll_back_trinomial(
    underlying: &Lattice,
    payoffs: &[f64],
    params: &TrinomialParameters,
) -> InductionOutput {
    let n = params.steps;
    debug_assert_eq!(underlying.kind(), TreeKind::Trinomial);
    debug_assert_eq!(payoffs.len(), 2 * n + 1);

    let disc_pu = params.discount_factor * params.prob_up;
    let disc_pm = params.discount_factor * params.prob_mid;
    let disc_pd = params.discount_factor * params.prob_down;

    let mut option_values = Lattice::zeros(TreeKind::Trinomial, n);
    let mut deltas = Lattice::zeros(TreeKind::Trinomial, n);
    option_values.row_mut(n).copy_from_slice(payoffs);

    for i in (0..n).rev() {
        for j in (n - i)..=(n + i) {
            let up = option_values.get(i + 1, j + 1);
            let mid = option_values.get(i + 1, j);
            let down = option_values.get(i + 1, j - 1);
            let value = disc_pu.mul_add(up, disc_pm.mul_add(mid, disc_pd * down));
            option_values.set(i, j, value);
            deltas.set(
                i,
                j,
                local_delta(
                    up,
                    down,
                    underlying.get(i + 1, j + 1),
                    underlying.get(i + 1, j - 1),
                ),
            );
        }
    }

    InductionOutput {
        option_values,
        deltas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::tree::calibration::TrinomialMoves;
    use crate::engines::tree::lattice::{build_binomial, build_trinomial};
    use approx::assert_relative_eq;

    fn call_payoffs(lattice: &Lattice, strike: f64) -> Vec<f64> {
        lattice
            .terminal()
            .iter()
            .map(|&s| intrinsic(OptionType::Call, s, strike))
            .collect()
    }

    #[test]
    fn two_step_binomial_call_matches_hand_calculation() {
        let p = BinomialParameters::from_volatility(1.0, 0.05, 0.0, 2, 0.2).unwrap();
        let s = build_binomial(50.0, &p);
        let out = roll_back_binomial(&s, &call_payoffs(&s, 52.0), &p, None);
        // Only the up-up node finishes in the money.
        let expected = p.discount_factor.powi(2) * p.prob_up.powi(2) * (s.get(2, 0) - 52.0);
        assert_relative_eq!(out.option_values.root(), expected, epsilon = 1e-12);
        assert_relative_eq!(out.option_values.root(), 4.186_548_913_153_905, epsilon = 1e-9);
    }

    #[test]
    fn binomial_delta_uses_child_spread() {
        let p = BinomialParameters::from_volatility(1.0, 0.05, 0.0, 2, 0.2).unwrap();
        let s = build_binomial(50.0, &p);
        let out = roll_back_binomial(&s, &call_payoffs(&s, 52.0), &p, None);
        let v = &out.option_values;
        let expected = (v.get(1, 0) - v.get(1, 1)) / (s.get(1, 0) - s.get(1, 1));
        assert_relative_eq!(out.deltas.get(0, 0), expected, epsilon = 1e-14);
        assert!(out.deltas.row(2).iter().all(|&d| d == 0.0));
    }

    #[test]
    fn early_exercise_never_lowers_values() {
        let p = BinomialParameters::from_volatility(1.0, 0.05, 0.0, 50, 0.3).unwrap();
        let s = build_binomial(100.0, &p);
        let payoffs: Vec<f64> = s
            .terminal()
            .iter()
            .map(|&x| intrinsic(OptionType::Put, x, 110.0))
            .collect();
        let european = roll_back_binomial(&s, &payoffs, &p, None);
        let american = roll_back_binomial(
            &s,
            &payoffs,
            &p,
            Some(EarlyExercise::new(OptionType::Put, 110.0)),
        );
        for i in 0..=p.steps {
            for j in 0..=i {
                assert!(american.option_values.get(i, j) >= european.option_values.get(i, j) - 1e-12);
                assert!(
                    american.option_values.get(i, j)
                        >= intrinsic(OptionType::Put, s.get(i, j), 110.0) - 1e-12
                );
            }
        }
    }

    #[test]
    fn two_step_trinomial_call() {
        let p = TrinomialParameters::from_volatility(1.0, 0.05, 0.0, 2, 0.2).unwrap();
        let s = build_trinomial(50.0, &p);
        let out = roll_back_trinomial(&s, &call_payoffs(&s, 52.0), &p);
        assert_relative_eq!(out.option_values.root(), 4.278_987_795_808_932, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_trinomial_spread_gives_zero_delta() {
        let moves = TrinomialMoves {
            up: 1.0,
            mid: 1.0,
            down: 1.0,
            prob_up: 0.25,
            prob_mid: 0.5,
            prob_down: 0.25,
        };
        let p = TrinomialParameters::from_direct(1.0, 0.05, 3, moves).unwrap();
        let s = build_trinomial(100.0, &p);
        let out = roll_back_trinomial(&s, &call_payoffs(&s, 90.0), &p);
        for i in 0..p.steps {
            for j in s.active_range(i) {
                let d = out.deltas.get(i, j);
                assert_eq!(d, 0.0);
                assert!(!d.is_nan());
            }
        }
    }

    #[test]
    fn local_delta_handles_zero_spread() {
        assert_eq!(local_delta(3.0, 1.0, 10.0, 10.0), 0.0);
        assert_eq!(local_delta(3.0, 1.0, 12.0, 10.0), 1.0);
    }
}
