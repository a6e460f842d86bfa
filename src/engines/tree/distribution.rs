//! Module `engines::tree::distribution`.
//!
//! Risk-neutral probability of each terminal lattice state.
//!
//! The binomial case is indexed by up-move count `k` with mass
//! `C(N, k) qu^k qd^(N-k)`. The trinomial case is keyed by the
//! `(up, mid, down)` move-count triple; the `O(N^2)` admissible `(up, mid)` pairs
//! are enumerated directly with `down = N - up - mid` and weighted by the
//! multinomial coefficient, so no individual path is ever materialised.

use crate::core::TreeKind;
use crate::engines::tree::calibration::{BinomialParameters, TrinomialParameters};
use crate::math::{binomial_probability, multinomial_probability};

/// Move counts accumulated along a trinomial path.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct MoveCounts {
    pub up: usize,
    pub mid: usize,
    pub down: usize,
}

impl MoveCounts {
    pub fn new(up: usize, mid: usize, down: usize) -> Self {
        Self { up, mid, down }
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.up + self.mid + self.down
    }

    /// Terminal column in a trinomial lattice, `N + up - down`.
    #[inline]
    pub fn terminal_position(&self) -> usize {
        self.total() + self.up - self.down
    }
}

/// Probability mass of one trinomial terminal state.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrinomialEndState {
    pub moves: MoveCounts,
    pub probability: f64,
}

/// Terminal-state distribution of the most recent pricing call.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "tree", content = "states", rename_all = "snake_case")]
pub enum EndStateDistribution {
    /// Probability of `k` up-moves, `k = 0..=N`.
    Binomial(Vec<f64>),
    /// Probability per move-count triple, ordered by `(up, mid)`.
    Trinomial(Vec<TrinomialEndState>),
}

impl EndStateDistribution {
    pub fn kind(&self) -> TreeKind {
        match self {
            Self::Binomial(_) => TreeKind::Binomial,
            Self::Trinomial(_) => TreeKind::Trinomial,
        }
    }

    /// Number of terminal states.
    pub fn len(&self) -> usize {
        match self {
            Self::Binomial(p) => p.len(),
            Self::Trinomial(states) => states.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of all probabilities; one up to rounding.
    pub fn total(&self) -> f64 {
        match self {
            Self::Binomial(p) => p.iter().sum(),
            Self::Trinomial(states) => states.iter().map(|s| s.probability).sum(),
        }
    }

    /// Binomial probability of exactly `k` up-moves.
    pub fn probability_of_up_moves(&self, k: usize) -> Option<f64> {
        match self {
            Self::Binomial(p) => p.get(k).copied(),
            Self::Trinomial(_) => None,
        }
    }

    /// Trinomial probability of a move-count triple.
    pub fn probability(&self, moves: MoveCounts) -> Option<f64> {
        match self {
            Self::Binomial(_) => None,
            Self::Trinomial(states) => states
                .binary_search_by(|s| (s.moves.up, s.moves.mid).cmp(&(moves.up, moves.mid)))
                .ok()
                .map(|idx| states[idx])
                .filter(|s| s.moves == moves)
                .map(|s| s.probability),
        }
    }

    /// Mass aggregated onto the columns of the maturity row.
    ///
    /// Binomial column `j` holds `N - j` up-moves; several trinomial triples
    /// share a column when `up - down` agrees.
    pub fn terminal_position_probabilities(&self) -> Vec<f64> {
        match self {
            Self::Binomial(p) => p.iter().rev().copied().collect(),
            Self::Trinomial(states) => {
                let steps = states.first().map_or(0, |s| s.moves.total());
                let mut columns = vec![0.0; 2 * steps + 1];
                for state in states {
                    columns[state.moves.terminal_position()] += state.probability;
                }
                columns
            }
        }
    }
}

/// Closed-form binomial terminal distribution.
pub fn binomial_end_states(params: &BinomialParameters) -> EndStateDistribution {
    let n = params.steps as u64;
    let probabilities = (0..=n)
        .map(|k| binomial_probability(n, k, params.prob_up, params.prob_down))
        .collect();
    EndStateDistribution::Binomial(probabilities)
}

/// Trinomial terminal distribution by direct multinomial summation.
pub fn trinomial_end_states(params: &TrinomialParameters) -> EndStateDistribution {
    let n = params.steps;
    let mut states = Vec::with_capacity((n + 1) * (n + 2) / 2);
    for up in 0..=n {
        for mid in 0..=(n - up) {
            let down = n - up - mid;
            let probability = multinomial_probability(
                up as u64,
                mid as u64,
                down as u64,
                params.prob_up,
                params.prob_mid,
                params.prob_down,
            );
            states.push(TrinomialEndState {
                moves: MoveCounts::new(up, mid, down),
                probability,
            });
        }
    }
    EndStateDistribution::Trinomial(states)
}
