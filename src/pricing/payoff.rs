//! Module `pricing::payoff`.
//!
//! Terminal payoffs for the lattice option families and the intrinsic value
//! used for early-exercise tests.
//!
//! Boundary conventions are part of the contract:
//! - digital call pays when `S_T > K`, digital put pays when `S_T <= K`;
//! - power call pays `(S_T - K)^a` when `S_T > K`, power put `(K - S_T)^a` when `S_T < K`;
//! - strangle pays `max(S_T - K, 0) + max(K2 - S_T, 0)` whatever the option side.

use crate::core::{OptionFamily, OptionType};
use crate::instruments::OptionSpec;

/// Immediate-exercise value of a vanilla position.
#[inline(always)]
pub fn intrinsic(option_type: OptionType, spot: f64, strike: f64) -> f64 {
    match option_type {
        OptionType::Call => (spot - strike).max(0.0),
        OptionType::Put => (strike - spot).max(0.0),
    }
}

/// Payoff of `spec` at terminal underlying price `spot`.
pub fn terminal_payoff(spec: &OptionSpec, spot: f64) -> f64 {
    let terms = &spec.terms;
    let k = terms.strike;
    match spec.family {
        OptionFamily::European | OptionFamily::American => intrinsic(terms.option_type, spot, k),
        OptionFamily::Digital => {
            let in_the_money = match terms.option_type {
                OptionType::Call => spot > k,
                OptionType::Put => spot <= k,
            };
            if in_the_money { terms.payoff_amount } else { 0.0 }
        }
        OptionFamily::Power => match terms.option_type {
            OptionType::Call if spot > k => (spot - k).powf(terms.exponent),
            OptionType::Put if spot < k => (k - spot).powf(terms.exponent),
            _ => 0.0,
        },
        OptionFamily::Strangle => {
            intrinsic(OptionType::Call, spot, k) + intrinsic(OptionType::Put, spot, terms.put_strike())
        }
    }
}

/// Payoff vector over a row of terminal prices.
pub fn terminal_payoffs(spec: &OptionSpec, terminal_prices: &[f64]) -> Vec<f64> {
    terminal_prices
        .iter()
        .map(|&spot| terminal_payoff(spec, spot))
        .collect()
}
