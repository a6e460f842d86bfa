//! Module `instruments::option_spec`.
//!
//! Contract terms priced by the lattice engines.
//!
//! [`ContractTerms`] carries everything about the contract that is fixed when a
//! tree model is built (side, strikes, expiry, power exponent, digital amount,
//! exercise flag). [`OptionSpec`] pairs those terms with the [`OptionFamily`]
//! chosen at pricing time, which is the unit the payoff evaluator and the
//! backward induction consume.

use crate::core::{ExerciseStyle, LatticeError, OptionFamily, OptionType, Result};

/// Contract terms shared by every family priced on one tree model.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContractTerms {
    /// Call or put.
    pub option_type: OptionType,
    /// Primary strike `K`.
    pub strike: f64,
    /// Put-leg strike `K2` of a strangle; defaults to `strike` when absent.
    pub second_strike: Option<f64>,
    /// Expiry in years.
    pub expiry: f64,
    /// Exponent applied by power payoffs.
    pub exponent: f64,
    /// Fixed amount paid by digital payoffs.
    pub payoff_amount: f64,
    /// Exercise rights requested independently of the family.
    pub exercise: ExerciseStyle,
}

impl ContractTerms {
    /// European vanilla terms with the default power exponent and digital amount.
    pub fn new(option_type: OptionType, strike: f64, expiry: f64) -> Self {
        Self {
            option_type,
            strike,
            second_strike: None,
            expiry,
            exponent: 2.0,
            payoff_amount: 1.0,
            exercise: ExerciseStyle::European,
        }
    }

    /// Strike used by the put leg of a strangle.
    #[inline]
    pub fn put_strike(&self) -> f64 {
        self.second_strike.unwrap_or(self.strike)
    }

    /// Validates contract fields.
    ///
    /// # Errors
    /// Returns [`LatticeError::Configuration`] when:
    /// - `strike <= 0` or non-finite
    /// - `second_strike` is present and `<= 0` or non-finite
    /// - `expiry <= 0` or non-finite
    /// - `exponent` or `payoff_amount` is non-finite
    pub fn validate(&self) -> Result<()> {
        if !self.strike.is_finite() || self.strike <= 0.0 {
            return Err(LatticeError::config("strike must be finite and > 0"));
        }
        if self
            .second_strike
            .is_some_and(|k2| !k2.is_finite() || k2 <= 0.0)
        {
            return Err(LatticeError::config(
                "second strike must be finite and > 0",
            ));
        }
        if !self.expiry.is_finite() || self.expiry <= 0.0 {
            return Err(LatticeError::config("expiry must be finite and > 0"));
        }
        if !self.exponent.is_finite() {
            return Err(LatticeError::config("power exponent must be finite"));
        }
        if !self.payoff_amount.is_finite() {
            return Err(LatticeError::config("digital payoff amount must be finite"));
        }
        Ok(())
    }

    /// Binds the terms to a family for one pricing request.
    pub fn spec(&self, family: OptionFamily) -> OptionSpec {
        OptionSpec {
            family,
            terms: *self,
        }
    }
}

/// One pricing request: a family plus the model's contract terms.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OptionSpec {
    pub family: OptionFamily,
    #[serde(flatten)]
    pub terms: ContractTerms,
}

impl OptionSpec {
    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.terms.option_type
    }

    #[inline]
    pub fn strike(&self) -> f64 {
        self.terms.strike
    }

    /// Whether backward induction tests immediate exercise at every node.
    ///
    /// True for the American family and for any family built with American
    /// exercise rights.
    #[inline]
    pub fn early_exercise(&self) -> bool {
        self.family == OptionFamily::American || self.terms.exercise == ExerciseStyle::American
    }
}
