//! Module `engines::tree::model`.
//!
//! The contract shared by the binomial and trinomial facades and the result
//! bundle every pricing call returns.
//!
//! A model owns its calibration and never mutates it; each call to
//! [`TreeModel::price`] rebuilds the underlying lattice and returns a fresh
//! [`TreeValuation`]. Models are `Send + Sync`, so one instance can serve
//! concurrent requests without locking.

use crate::core::{OptionFamily, Result, TreeKind};
use crate::engines::tree::calibration::{BinomialParameters, TrinomialParameters};
use crate::engines::tree::distribution::EndStateDistribution;
use crate::engines::tree::lattice::Lattice;
use crate::instruments::ContractTerms;
use crate::market::MarketInputs;

/// Calibrated parameters of either tree.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "tree", rename_all = "snake_case")]
pub enum ModelParameters {
    Binomial(BinomialParameters),
    Trinomial(TrinomialParameters),
}

impl ModelParameters {
    pub fn kind(&self) -> TreeKind {
        match self {
            Self::Binomial(_) => TreeKind::Binomial,
            Self::Trinomial(_) => TreeKind::Trinomial,
        }
    }

    pub fn steps(&self) -> usize {
        match self {
            Self::Binomial(p) => p.steps,
            Self::Trinomial(p) => p.steps,
        }
    }

    pub fn dt(&self) -> f64 {
        match self {
            Self::Binomial(p) => p.dt,
            Self::Trinomial(p) => p.dt,
        }
    }

    pub fn discount_factor(&self) -> f64 {
        match self {
            Self::Binomial(p) => p.discount_factor,
            Self::Trinomial(p) => p.discount_factor,
        }
    }

    /// Sum of the sibling transition probabilities of one node.
    pub fn probability_sum(&self) -> f64 {
        match self {
            Self::Binomial(p) => p.prob_up + p.prob_down,
            Self::Trinomial(p) => p.prob_up + p.prob_mid + p.prob_down,
        }
    }
}

/// Everything produced by one pricing call.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TreeValuation {
    pub tree: TreeKind,
    pub family: OptionFamily,
    /// Option value at the root node.
    pub price: f64,
    /// Underlying prices.
    pub underlying: Lattice,
    /// Option values from backward induction.
    pub option_values: Lattice,
    /// Local hedge ratios; the maturity row is zero.
    pub deltas: Lattice,
    pub end_states: EndStateDistribution,
}

impl TreeValuation {
    /// Hedge ratio at the root node.
    pub fn root_delta(&self) -> f64 {
        self.deltas.root()
    }

    /// Expected discounted terminal payoff under the end-state distribution.
    ///
    /// Equals [`TreeValuation::price`] for European-style exercise.
    pub fn discounted_expected_payoff(&self, discount_factor: f64) -> f64 {
        let steps = self.option_values.steps() as i32;
        let payoffs = self.option_values.terminal();
        let expectation: f64 = self
            .end_states
            .terminal_position_probabilities()
            .iter()
            .zip(payoffs)
            .map(|(p, v)| p * v)
            .sum();
        discount_factor.powi(steps) * expectation
    }
}

/// Shared contract of the binomial and trinomial facades.
pub trait TreeModel: Send + Sync {
    fn kind(&self) -> TreeKind;

    fn parameters(&self) -> ModelParameters;

    fn market(&self) -> &MarketInputs;

    fn terms(&self) -> &ContractTerms;

    fn steps(&self) -> usize {
        self.parameters().steps()
    }

    /// Prices `family` and returns the lattices and distribution behind the price.
    fn price(&self, family: OptionFamily) -> Result<TreeValuation>;

    /// Prices a family given by its tag (`"european"`, `"american"`, ...).
    ///
    /// # Errors
    /// Returns [`crate::core::LatticeError::Configuration`] for an unknown tag.
    fn price_named(&self, family: &str) -> Result<TreeValuation> {
        self.price(family.parse()?)
    }
}
