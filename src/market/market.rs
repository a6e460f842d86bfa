//! Module `market::market`.
//!
//! Market snapshot consumed by the tree models: spot, flat rate, continuous
//! dividend yield, and an optional flat volatility. When the volatility is
//! absent the trees are calibrated from user-supplied moves instead.

use crate::core::{LatticeError, Result};

/// Market snapshot used by the tree models.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MarketInputs {
    /// Spot price of the underlying at time zero.
    pub spot: f64,
    /// Continuously compounded risk-free rate.
    pub rate: f64,
    /// Continuously compounded dividend yield.
    pub dividend_yield: f64,
    /// Flat volatility; `None` selects direct-probability calibration.
    pub vol: Option<f64>,
}

impl MarketInputs {
    pub fn new(spot: f64, rate: f64, dividend_yield: f64, vol: Option<f64>) -> Self {
        Self {
            spot,
            rate,
            dividend_yield,
            vol,
        }
    }

    /// Validates market fields.
    ///
    /// # Errors
    /// Returns [`LatticeError::Configuration`] when spot is not a positive finite
    /// number, rate or dividend yield is non-finite, or a supplied volatility is
    /// not positive.
    pub fn validate(&self) -> Result<()> {
        if !self.spot.is_finite() || self.spot <= 0.0 {
            return Err(LatticeError::config("spot must be finite and > 0"));
        }
        if !self.rate.is_finite() {
            return Err(LatticeError::config("rate must be finite"));
        }
        if !self.dividend_yield.is_finite() {
            return Err(LatticeError::config("dividend yield must be finite"));
        }
        if self.vol.is_some_and(|v| !v.is_finite() || v <= 0.0) {
            return Err(LatticeError::config("volatility must be finite and > 0"));
        }
        Ok(())
    }

    /// Continuous carry `r - q` used for risk-neutral growth.
    #[inline]
    pub fn carry(&self) -> f64 {
        self.rate - self.dividend_yield
    }
}
