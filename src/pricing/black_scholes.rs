//! Module `pricing::black_scholes`.
//!
//! Closed-form Black-Scholes-Merton values used as the continuous-time limit
//! the lattice prices are compared against.
//!
//! References: Hull (11th ed.) Ch. 15 and Ch. 26 (cash-or-nothing digitals).
//!
//! With `d1 = (ln(S/K) + (r - q + sigma^2 / 2) T) / (sigma sqrt(T))` and
//! `d2 = d1 - sigma sqrt(T)`:
//! - call `S e^{-qT} N(d1) - K e^{-rT} N(d2)`, put `K e^{-rT} N(-d2) - S e^{-qT} N(-d1)`
//! - digital call `e^{-rT} N(d2)`, digital put `e^{-rT} N(-d2)`, per unit amount
//! - delta `e^{-qT} N(d1)` for calls, `e^{-qT} (N(d1) - 1)` for puts

use crate::core::{LatticeError, OptionFamily, OptionType, Result};
use crate::instruments::{ContractTerms, OptionSpec};
use crate::market::MarketInputs;
use crate::math::normal_cdf;

/// Source of closed-form prices for lattice comparisons.
pub trait ClosedFormReference {
    /// Closed-form value of `spec`, or `None` when the family has no closed
    /// form here (early exercise, power payoffs).
    fn reference_price(&self, spec: &OptionSpec) -> Option<f64>;
}

/// Black-Scholes-Merton model with continuous dividend yield.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlackScholesReference {
    pub spot: f64,
    pub expiry: f64,
    pub rate: f64,
    pub vol: f64,
    pub dividend_yield: f64,
}

impl BlackScholesReference {
    pub fn new(spot: f64, expiry: f64, rate: f64, vol: f64, dividend_yield: f64) -> Self {
        Self {
            spot,
            expiry,
            rate,
            vol,
            dividend_yield,
        }
    }

    /// Reference model for a tree's market and contract.
    ///
    /// # Errors
    /// Returns [`LatticeError::Configuration`] when the market carries no volatility.
    pub fn for_contract(market: &MarketInputs, terms: &ContractTerms) -> Result<Self> {
        let vol = market
            .vol
            .ok_or_else(|| LatticeError::config("closed-form reference needs a volatility"))?;
        Ok(Self::new(
            market.spot,
            terms.expiry,
            market.rate,
            vol,
            market.dividend_yield,
        ))
    }

    #[inline]
    fn sqrt_t(&self) -> f64 {
        self.expiry.sqrt()
    }

    pub fn d1(&self, strike: f64) -> f64 {
        ((self.spot / strike).ln()
            + (self.rate - self.dividend_yield + 0.5 * self.vol * self.vol) * self.expiry)
            / (self.vol * self.sqrt_t())
    }

    pub fn d2(&self, strike: f64) -> f64 {
        self.d1(strike) - self.vol * self.sqrt_t()
    }

    #[inline]
    fn df_rate(&self) -> f64 {
        (-self.rate * self.expiry).exp()
    }

    #[inline]
    fn df_dividend(&self) -> f64 {
        (-self.dividend_yield * self.expiry).exp()
    }

    pub fn call_price(&self, strike: f64) -> f64 {
        self.spot * self.df_dividend() * normal_cdf(self.d1(strike))
            - strike * self.df_rate() * normal_cdf(self.d2(strike))
    }

    pub fn put_price(&self, strike: f64) -> f64 {
        strike * self.df_rate() * normal_cdf(-self.d2(strike))
            - self.spot * self.df_dividend() * normal_cdf(-self.d1(strike))
    }

    pub fn vanilla_price(&self, option_type: OptionType, strike: f64) -> f64 {
        match option_type {
            OptionType::Call => self.call_price(strike),
            OptionType::Put => self.put_price(strike),
        }
    }

    /// Cash-or-nothing call paying one unit.
    pub fn digital_call_price(&self, strike: f64) -> f64 {
        self.df_rate() * normal_cdf(self.d2(strike))
    }

    /// Cash-or-nothing put paying one unit.
    pub fn digital_put_price(&self, strike: f64) -> f64 {
        self.df_rate() * normal_cdf(-self.d2(strike))
    }

    /// Long call at `call_strike` plus long put at `put_strike`.
    pub fn strangle_price(&self, call_strike: f64, put_strike: f64) -> f64 {
        self.call_price(call_strike) + self.put_price(put_strike)
    }

    pub fn delta(&self, option_type: OptionType, strike: f64) -> f64 {
        let n_d1 = normal_cdf(self.d1(strike));
        match option_type {
            OptionType::Call => self.df_dividend() * n_d1,
            OptionType::Put => self.df_dividend() * (n_d1 - 1.0),
        }
    }
}

impl ClosedFormReference for BlackScholesReference {
    fn reference_price(&self, spec: &OptionSpec) -> Option<f64> {
        if spec.early_exercise() {
            return None;
        }
        let terms = &spec.terms;
        match spec.family {
            OptionFamily::European => Some(self.vanilla_price(terms.option_type, terms.strike)),
            OptionFamily::Digital => {
                let unit = match terms.option_type {
                    OptionType::Call => self.digital_call_price(terms.strike),
                    OptionType::Put => self.digital_put_price(terms.strike),
                };
                Some(terms.payoff_amount * unit)
            }
            OptionFamily::Strangle => Some(self.strangle_price(terms.strike, terms.put_strike())),
            OptionFamily::American | OptionFamily::Power => None,
        }
    }
}
