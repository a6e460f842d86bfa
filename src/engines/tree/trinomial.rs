//! Module `engines::tree::trinomial`.
//!
//! Recombining trinomial tree facade.
//!
//! The lattice is centred on column `N`, discounting uses `exp(-r dt)`, and no
//! early-exercise test is performed: American requests are valued as European
//! and logged.

use std::fmt;

use tracing::{debug, warn};

use crate::core::{OptionFamily, Result, TreeKind};
use crate::engines::tree::calibration::TrinomialParameters;
use crate::engines::tree::distribution::trinomial_end_states;
use crate::engines::tree::induction::{InductionOutput, roll_back_trinomial};
use crate::engines::tree::lattice::build_trinomial;
use crate::engines::tree::model::{ModelParameters, TreeModel, TreeValuation};
use crate::instruments::ContractTerms;
use crate::market::MarketInputs;
use crate::pricing::payoff::terminal_payoffs;

/// Trinomial tree model.
#[derive(Debug, Clone, PartialEq)]
pub struct TrinomialTreeModel {
    market: MarketInputs,
    terms: ContractTerms,
    params: TrinomialParameters,
}

impl TrinomialTreeModel {
    pub fn new(market: MarketInputs, terms: ContractTerms, params: TrinomialParameters) -> Self {
        Self {
            market,
            terms,
            params,
        }
    }

    #[inline]
    pub fn calibration(&self) -> &TrinomialParameters {
        &self.params
    }
}

impl TreeModel for TrinomialTreeModel {
    fn kind(&self) -> TreeKind {
        TreeKind::Trinomial
    }

    fn parameters(&self) -> ModelParameters {
        ModelParameters::Trinomial(self.params)
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
        if spec.early_exercise() {
            warn!(%family, "trinomial tree has no early-exercise path; valuing as European");
        }

        let underlying = build_trinomial(self.market.spot, &self.params);
        let payoffs = terminal_payoffs(&spec, underlying.terminal());
        let InductionOutput {
            option_values,
            deltas,
        } = roll_back_trinomial(&underlying, &payoffs, &self.params);
        let end_states = trinomial_end_states(&self.params);

        let price = option_values.root();
        debug!(
            tree = "trinomial",
            %family,
            steps = self.params.steps,
            price,
            "priced option on lattice"
        );

        Ok(TreeValuation {
            tree: TreeKind::Trinomial,
            family,
            price,
            underlying,
            option_values,
            deltas,
            end_states,
        })
    }
}

impl fmt::Display for TrinomialTreeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TrinomialTreeModel(spot={}, strike={}, expiry={}, rate={}, steps={}, vol={:?}, dividend={}, put={})",
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
