//! Module `engines::tree::binomial`.
//!
//! Binomial tree facade: one calibration, one lattice per pricing call.
//!
//! References: Hull (11th ed.) Ch. 13, Cox-Ross-Rubinstein (1979), and backward-induction recursions around Eq. (13.10).
//!
//! Numerical considerations: convergence to Black-Scholes is first order in the
//! step count with the usual odd/even oscillation; the discount factor nets the
//! dividend yield out of the rate, so dividend-paying prices drift from the
//! closed form as `q` grows.
//!
//! When to use: early-exercise intuition, lattice diagnostics and teaching
//! material; use the closed form for plain European vanillas.

use std::fmt;

use tracing::debug;

use crate::core::{OptionFamily, Result, TreeKind};
use crate::engines::tree::calibration::BinomialParameters;
use crate::engines::tree::distribution::binomial_end_states;
use crate::engines::tree::induction::{EarlyExercise, InductionOutput, roll_back_binomial};
use crate::engines::tree::lattice::build_binomial;
use crate::engines::tree::model::{ModelParameters, TreeModel, TreeValuation};
use crate::instruments::ContractTerms;
use crate::market::MarketInputs;
use crate::pricing::payoff::terminal_payoffs;

/// Cox-Ross-Rubinstein style binomial tree model.
#[derive(Debug, Clone, PartialEq)]
pub struct BinomialTreeModel {
    market: MarketInputs,
    terms: ContractTerms,
    params: BinomialParameters,
}

impl BinomialTreeModel {
    /// Assembles a model from validated inputs and a finished calibration.
    pub fn new(market: MarketInputs, terms: ContractTerms, params: BinomialParameters) -> Self {
        Self {
            market,
            terms,
            params,
        }
    }

    #[inline]
    pub fn calibration(&self) -> &BinomialParameters {
        &self.params
    }
}

impl TreeModel for BinomialTreeModel {
    fn kind(&self) -> TreeKind {
        TreeKind::Binomial
    }

    fn parameters(&self) -> ModelParameters {
        ModelParameters::Binomial(self.params)
    }

    fn market(&self) -> &MarketInputs {
        &self.market
    }

    fn terms(&self) -> &ContractTerms {
        &self.terms
    }

    fn price(&self, family: OptionFamily) -> Result<TreeValuation> {
        let spec = self.terms.spec(family);
        spec.terms.validate()?;

        let underlying = build_binomial(self.market.spot, &self.params);
        let payoffs = terminal_payoffs(&spec, underlying.terminal());
        let exercise = spec
            .early_exercise()
            .then(|| EarlyExercise::new(spec.option_type(), spec.strike()));

        let InductionOutput {
            option_values,
            deltas,
        } = roll_back_binomial(&underlying, &payoffs, &self.params, exercise);
        let end_states = binomial_end_states(&self.params);

        let price = option_values.root();
        debug!(
            tree = "binomial",
            %family,
            steps = self.params.steps,
            early_exercise = exercise.is_some(),
            price,
            "priced option on lattice"
        );

        Ok(TreeValuation {
            tree: TreeKind::Binomial,
            family,
            price,
            underlying,
            option_values,
            deltas,
            end_states,
        })
    }
}

impl fmt::Display for BinomialTreeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BinomialTreeModel(spot={}, strike={}, expiry={}, rate={}, steps={}, vol={:?}, dividend={}, put={})",
            self.market.spot,
            self.terms.strike,
            self.terms.expiry,
            self.market.rate,
            self.params.steps,
            self.market.vol,
            self.market.dividend_yield,
            self.terms.option_type.is_put(),
        )
    }
}
