//! Module `engines::tree::builder`.
//!
//! Construction inputs for both tree models.
//!
//! The builder doubles as the JSON configuration document: every field has a
//! default except `spot` and `strike`, and the calibration path is chosen by
//! which optional inputs are present.
//!
//! ```text
//! {"spot": 50, "strike": 52, "steps": 200, "vol": 0.2, "option_type": "put"}
//! ```

use crate::core::{ExerciseStyle, LatticeError, OptionType, Result, TreeKind};
use crate::engines::tree::binomial::BinomialTreeModel;
use crate::engines::tree::calibration::{BinomialParameters, TrinomialMoves, TrinomialParameters};
use crate::engines::tree::model::TreeModel;
use crate::engines::tree::trinomial::TrinomialTreeModel;
use crate::instruments::ContractTerms;
use crate::market::MarketInputs;

/// Consuming builder for [`BinomialTreeModel`] and [`TrinomialTreeModel`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TreeModelBuilder {
    pub spot: Option<f64>,
    pub strike: Option<f64>,
    pub expiry: f64,
    pub rate: f64,
    pub steps: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vol: Option<f64>,
    pub dividend_yield: f64,
    pub option_type: OptionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_strike: Option<f64>,
    pub exponent: f64,
    pub payoff_amount: f64,
    pub exercise: ExerciseStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prob_up: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prob_mid: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prob_down: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mid: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down: Option<f64>,
}

impl Default for TreeModelBuilder {
    fn default() -> Self {
        Self {
            spot: None,
            strike: None,
            expiry: 1.0,
            rate: 0.05,
            steps: 2,
            vol: None,
            dividend_yield: 0.0,
            option_type: OptionType::Call,
            second_strike: None,
            exponent: 2.0,
            payoff_amount: 1.0,
            exercise: ExerciseStyle::European,
            prob_up: None,
            prob_mid: None,
            prob_down: None,
            up: None,
            mid: None,
            down: None,
        }
    }
}

impl TreeModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON configuration document.
    ///
    /// # Errors
    /// Returns [`LatticeError::Serialization`] for malformed JSON or unknown enum tags.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    pub fn strike(mut self, strike: f64) -> Self {
        self.strike = Some(strike);
        self
    }

    /// Sets expiry in years.
    pub fn expiry(mut self, expiry: f64) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// Sets the flat volatility; takes precedence over direct moves.
    pub fn vol(mut self, vol: f64) -> Self {
        self.vol = Some(vol);
        self
    }

    pub fn dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.dividend_yield = dividend_yield;
        self
    }

    pub fn option_type(mut self, option_type: OptionType) -> Self {
        self.option_type = option_type;
        self
    }

    pub fn call(self) -> Self {
        self.option_type(OptionType::Call)
    }

    pub fn put(self) -> Self {
        self.option_type(OptionType::Put)
    }

    /// Sets the put-leg strike of a strangle.
    pub fn second_strike(mut self, second_strike: f64) -> Self {
        self.second_strike = Some(second_strike);
        self
    }

    pub fn exponent(mut self, exponent: f64) -> Self {
        self.exponent = exponent;
        self
    }

    pub fn payoff_amount(mut self, payoff_amount: f64) -> Self {
        self.payoff_amount = payoff_amount;
        self
    }

    pub fn exercise(mut self, exercise: ExerciseStyle) -> Self {
        self.exercise = exercise;
        self
    }

    /// Direct binomial move sizes, used when no volatility is set.
    pub fn direct_binomial(mut self, prob_up: f64, prob_down: f64) -> Self {
        self.prob_up = Some(prob_up);
        self.prob_down = Some(prob_down);
        self
    }

    /// Direct trinomial multipliers and probabilities, used when no volatility is set.
    pub fn direct_trinomial(mut self, moves: TrinomialMoves) -> Self {
        self.up = Some(moves.up);
        self.mid = Some(moves.mid);
        self.down = Some(moves.down);
        self.prob_up = Some(moves.prob_up);
        self.prob_mid = Some(moves.prob_mid);
        self.prob_down = Some(moves.prob_down);
        self
    }

    /// Validated market snapshot.
    ///
    /// # Errors
    /// Returns [`LatticeError::Configuration`] when spot is missing or invalid.
    pub fn market(&self) -> Result<MarketInputs> {
        let spot = self
            .spot
            .ok_or_else(|| LatticeError::config("spot is required"))?;
        let market = MarketInputs::new(spot, self.rate, self.dividend_yield, self.vol);
        market.validate()?;
        Ok(market)
    }

    /// Validated contract terms.
    ///
    /// # Errors
    /// Returns [`LatticeError::Configuration`] when strike is missing or any term is invalid.
    pub fn terms(&self) -> Result<ContractTerms> {
        let strike = self
            .strike
            .ok_or_else(|| LatticeError::config("strike is required"))?;
        let terms = ContractTerms {
            option_type: self.option_type,
            strike,
            second_strike: self.second_strike,
            expiry: self.expiry,
            exponent: self.exponent,
            payoff_amount: self.payoff_amount,
            exercise: self.exercise,
        };
        terms.validate()?;
        Ok(terms)
    }

    fn trinomial_moves(&self) -> Option<TrinomialMoves> {
        Some(TrinomialMoves {
            up: self.up?,
            mid: self.mid?,
            down: self.down?,
            prob_up: self.prob_up?,
            prob_mid: self.prob_mid?,
            prob_down: self.prob_down?,
        })
    }

    /// Validates inputs and calibrates a binomial tree.
    ///
    /// # Errors
    /// Returns [`LatticeError::Configuration`] when neither a volatility nor both
    /// `prob_up` and `prob_down` are supplied, or when calibration rejects the inputs.
    pub fn build_binomial(self) -> Result<BinomialTreeModel> {
        let market = self.market()?;
        let terms = self.terms()?;
        let params = match (self.vol, self.prob_up, self.prob_down) {
            (Some(vol), _, _) => BinomialParameters::from_volatility(
                terms.expiry,
                market.rate,
                market.dividend_yield,
                self.steps,
                vol,
            )?,
            (None, Some(pu), Some(pd)) => BinomialParameters::from_direct_probabilities(
                terms.expiry,
                market.rate,
                market.dividend_yield,
                self.steps,
                pu,
                pd,
            )?,
            _ => {
                return Err(LatticeError::config(
                    "binomial tree needs either vol or both prob_up and prob_down",
                ));
            }
        };
        Ok(BinomialTreeModel::new(market, terms, params))
    }

    /// Validates inputs and calibrates a trinomial tree.
    ///
    /// # Errors
    /// Returns [`LatticeError::Configuration`] when neither a volatility nor all six
    /// direct moves are supplied, when `steps == 0`, or when calibration rejects the inputs.
    pub fn build_trinomial(self) -> Result<TrinomialTreeModel> {
        let market = self.market()?;
        let terms = self.terms()?;
        let params = match (self.vol, self.trinomial_moves()) {
            (Some(vol), _) => TrinomialParameters::from_volatility(
                terms.expiry,
                market.rate,
                market.dividend_yield,
                self.steps,
                vol,
            )?,
            (None, Some(moves)) => {
                TrinomialParameters::from_direct(terms.expiry, market.rate, self.steps, moves)?
            }
            (None, None) => {
                return Err(LatticeError::config(
                    "trinomial tree needs either vol or all of up, mid, down, prob_up, prob_mid, prob_down",
                ));
            }
        };
        Ok(TrinomialTreeModel::new(market, terms, params))
    }

    /// Builds the tree selected at runtime.
    pub fn build(self, kind: TreeKind) -> Result<Box<dyn TreeModel>> {
        Ok(match kind {
            TreeKind::Binomial => Box::new(self.build_binomial()?),
            TreeKind::Trinomial => Box::new(self.build_trinomial()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_selection_builds_the_requested_tree() {
        let base = TreeModelBuilder::new().spot(50.0).strike(52.0).vol(0.2).steps(4);
        assert_eq!(base.clone().build(TreeKind::Binomial).unwrap().kind(), TreeKind::Binomial);
        let tri = base.build(TreeKind::Trinomial).unwrap();
        assert_eq!(tri.kind(), TreeKind::Trinomial);
        assert_eq!(tri.steps(), 4);
    }

    #[test]
    fn defaults_follow_the_classroom_setup() {
        let b = TreeModelBuilder::default();
        assert_eq!(b.expiry, 1.0);
        assert_eq!(b.rate, 0.05);
        assert_eq!(b.steps, 2);
        assert_eq!(b.dividend_yield, 0.0);
        assert_eq!(b.exponent, 2.0);
        assert_eq!(b.payoff_amount, 1.0);
        assert_eq!(b.option_type, OptionType::Call);
        assert_eq!(b.exercise, ExerciseStyle::European);
    }

    #[test]
    fn json_config_fills_defaults() {
        let b = TreeModelBuilder::from_json(
            r#"{"spot": 50, "strike": 52, "vol": 0.2, "option_type": "put", "exercise": "american"}"#,
        )
        .unwrap();
        assert_eq!(b.spot, Some(50.0));
        assert_eq!(b.steps, 2);
        assert_eq!(b.option_type, OptionType::Put);
        assert_eq!(b.exercise, ExerciseStyle::American);

        let round = TreeModelBuilder::from_json(&b.to_json_pretty().unwrap()).unwrap();
        assert_eq!(round, b);
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = TreeModelBuilder::from_json(r#"{"spot": "fifty"}"#).unwrap_err();
        assert!(matches!(err, LatticeError::Serialization(_)));
    }

    #[test]
    fn missing_calibration_inputs_are_rejected() {
        let base = TreeModelBuilder::new().spot(50.0).strike(52.0);
        assert!(matches!(
            base.clone().build_binomial().unwrap_err(),
            LatticeError::Configuration(_)
        ));
        assert!(base.clone().build_trinomial().is_err());

        // A partial set of direct moves is not enough.
        let partial = base.direct_binomial(0.2, 0.2);
        assert!(partial.clone().build_binomial().is_ok());
        assert!(partial.build_trinomial().is_err());
    }

    #[test]
    fn missing_spot_or_strike_is_rejected() {
        assert!(TreeModelBuilder::new().strike(52.0).vol(0.2).build_binomial().is_err());
        assert!(TreeModelBuilder::new().spot(50.0).vol(0.2).build_trinomial().is_err());
    }

    #[test]
    fn volatility_takes_precedence_over_direct_moves() {
        let model = TreeModelBuilder::new()
            .spot(50.0)
            .strike(52.0)
            .vol(0.2)
            .direct_binomial(0.2, 0.2)
            .build_binomial()
            .unwrap();
        assert!((model.calibration().up - 1.151_909_910_168_909).abs() < 1e-12);
    }

    #[test]
    fn trinomial_with_zero_steps_fails() {
        let err = TreeModelBuilder::new()
            .spot(50.0)
            .strike(52.0)
            .vol(0.2)
            .steps(0)
            .build_trinomial()
            .unwrap_err();
        assert!(matches!(err, LatticeError::Configuration(_)));
    }

    #[test]
    fn binomial_with_zero_steps_is_floored() {
        let model = TreeModelBuilder::new()
            .spot(50.0)
            .strike(52.0)
            .vol(0.2)
            .steps(0)
            .build_binomial()
            .unwrap();
        assert_eq!(model.steps(), 1);
    }
}
