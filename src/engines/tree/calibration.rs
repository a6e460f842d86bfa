//! Module `engines::tree::calibration`.
//!
//! Per-step timing, discounting, move multipliers and risk-neutral transition
//! probabilities for binomial and trinomial lattices.
//!
//! References: Cox-Ross-Rubinstein (1979); Hull (11th ed.) Ch. 13 and the
//! Boyle-style trinomial matching of Ch. 21.
//!
//! Each tree has two mutually exclusive factories, one driven by volatility and
//! one by directly supplied moves. Both return the same immutable parameter
//! value, fully populated.
//!
//! Numerical considerations:
//! - the binomial discount factor is `exp(-(r - q) dt)` while the trinomial one is
//!   `exp(-r dt)`; the two trees deliberately keep these distinct conventions.
//! - binomial direct calibration maps the supplied move sizes onto multipliers as
//!   `u = 1 + pu`, `d = 1 - pd` and then re-derives the risk-neutral `qu`, `qd`.
//! - trinomial direct calibration takes all six values verbatim and only checks
//!   that the probabilities sum to one.

use tracing::debug;

use crate::core::{LatticeError, Result};

/// Tolerance applied to sibling probability sums.
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1.0e-9;

fn step_length(expiry: f64, steps: usize) -> Result<f64> {
    if !expiry.is_finite() || expiry <= 0.0 {
        return Err(LatticeError::config("expiry must be finite and > 0"));
    }
    Ok(expiry / steps as f64)
}

fn check_vol(vol: f64) -> Result<()> {
    if !vol.is_finite() || vol <= 0.0 {
        return Err(LatticeError::config("volatility must be finite and > 0"));
    }
    Ok(())
}

/// Calibrated binomial tree parameters.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BinomialParameters {
    /// Number of time steps `N`.
    pub steps: usize,
    /// Step length `T / N`.
    pub dt: f64,
    /// Per-step discount factor.
    pub discount_factor: f64,
    /// Up multiplier `u`.
    pub up: f64,
    /// Down multiplier `d`.
    pub down: f64,
    /// Risk-neutral up probability `qu`.
    pub prob_up: f64,
    /// Risk-neutral down probability `qd = 1 - qu`.
    pub prob_down: f64,
}

impl BinomialParameters {
    /// Cox-Ross-Rubinstein calibration: `u = exp(sigma sqrt(dt))`, `d = 1/u`.
    ///
    /// `steps` below one is floored to one.
    ///
    /// # Errors
    /// Returns [`LatticeError::Configuration`] for non-positive expiry or volatility.
    pub fn from_volatility(
        expiry: f64,
        rate: f64,
        dividend_yield: f64,
        steps: usize,
        vol: f64,
    ) -> Result<Self> {
        let steps = steps.max(1);
        let dt = step_length(expiry, steps)?;
        check_vol(vol)?;

        let up = (vol * dt.sqrt()).exp();
        let down = 1.0 / up;
        Self::risk_neutral(steps, dt, rate, dividend_yield, up, down)
    }

    /// Calibration from direct move sizes: `u = 1 + pu`, `d = 1 - pd`.
    ///
    /// `steps` below one is floored to one.
    ///
    /// # Errors
    /// Returns [`LatticeError::Configuration`] for non-positive expiry, non-finite
    /// inputs, or when the resulting `u <= d`.
    pub fn from_direct_probabilities(
        expiry: f64,
        rate: f64,
        dividend_yield: f64,
        steps: usize,
        pu: f64,
        pd: f64,
    ) -> Result<Self> {
        let steps = steps.max(1);
        let dt = step_length(expiry, steps)?;
        if !pu.is_finite() || !pd.is_finite() {
            return Err(LatticeError::config(
                "direct binomial moves pu and pd must be finite",
            ));
        }

        let up = 1.0 + pu;
        let down = 1.0 - pd;
        if up <= down {
            return Err(LatticeError::config(format!(
                "direct binomial moves give up multiplier {up} <= down multiplier {down}"
            )));
        }
        Self::risk_neutral(steps, dt, rate, dividend_yield, up, down)
    }

    fn risk_neutral(
        steps: usize,
        dt: f64,
        rate: f64,
        dividend_yield: f64,
        up: f64,
        down: f64,
    ) -> Result<Self> {
        let carry = rate - dividend_yield;
        let growth = (carry * dt).exp();
        let prob_up = (growth - down) / (up - down);
        let params = Self {
            steps,
            dt,
            discount_factor: (-carry * dt).exp(),
            up,
            down,
            prob_up,
            prob_down: 1.0 - prob_up,
        };
        debug!(
            steps,
            dt,
            up,
            down,
            prob_up,
            discount_factor = params.discount_factor,
            "calibrated binomial tree"
        );
        Ok(params)
    }
}

/// Directly supplied trinomial moves and probabilities.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrinomialMoves {
    pub up: f64,
    pub mid: f64,
    pub down: f64,
    pub prob_up: f64,
    pub prob_mid: f64,
    pub prob_down: f64,
}

/// Calibrated trinomial tree parameters.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrinomialParameters {
    /// Number of time steps `N`.
    pub steps: usize,
    /// Step length `T / N`.
    pub dt: f64,
    /// Per-step discount factor `exp(-r dt)`.
    pub discount_factor: f64,
    pub up: f64,
    pub mid: f64,
    pub down: f64,
    pub prob_up: f64,
    pub prob_mid: f64,
    pub prob_down: f64,
}

impl TrinomialParameters {
    /// Volatility calibration with `u = exp(sigma sqrt(2 dt))`, `d = 1/u`, `m = 1`.
    ///
    /// `pu = ((a - 1/b) / (b - 1/b))^2`, `pd = ((b - a) / (b - 1/b))^2` with
    /// `a = exp((r - q) dt / 2)` and `b = exp(sigma sqrt(dt / 2))`; `pm = 1 - pu - pd`.
    ///
    /// # Errors
    /// Returns [`LatticeError::Configuration`] when `steps == 0`, for non-positive
    /// expiry or volatility, or when the volatility is too small to separate
    /// the branches.
    pub fn from_volatility(
        expiry: f64,
        rate: f64,
        dividend_yield: f64,
        steps: usize,
        vol: f64,
    ) -> Result<Self> {
        let dt = step_length(expiry, check_steps(steps)?)?;
        check_vol(vol)?;

        let up = (vol * (2.0 * dt).sqrt()).exp();
        let down = 1.0 / up;

        let a = ((rate - dividend_yield) * dt / 2.0).exp();
        let b = (vol * (dt / 2.0).sqrt()).exp();
        let denom = b - 1.0 / b;
        if denom.abs() <= 1.0e-14 {
            return Err(LatticeError::config(
                "volatility too small: trinomial branch denominator is near zero",
            ));
        }

        let prob_up = ((a - 1.0 / b) / denom).powi(2);
        let prob_down = ((b - a) / denom).powi(2);
        let params = Self {
            steps,
            dt,
            discount_factor: (-rate * dt).exp(),
            up,
            mid: 1.0,
            down,
            prob_up,
            prob_mid: 1.0 - prob_up - prob_down,
            prob_down,
        };
        params.log_calibration();
        Ok(params)
    }

    /// Takes multipliers and probabilities verbatim.
    ///
    /// # Errors
    /// Returns [`LatticeError::Configuration`] when `steps == 0`, for non-positive
    /// expiry, non-finite moves, or probabilities that do not sum to one within
    /// [`PROBABILITY_SUM_TOLERANCE`].
    pub fn from_direct(expiry: f64, rate: f64, steps: usize, moves: TrinomialMoves) -> Result<Self> {
        let dt = step_length(expiry, check_steps(steps)?)?;
        let TrinomialMoves {
            up,
            mid,
            down,
            prob_up,
            prob_mid,
            prob_down,
        } = moves;
        if [up, mid, down, prob_up, prob_mid, prob_down]
            .iter()
            .any(|v| !v.is_finite())
        {
            return Err(LatticeError::config("direct trinomial moves must be finite"));
        }
        let total = prob_up + prob_mid + prob_down;
        if (total - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(LatticeError::config(format!(
                "trinomial probabilities sum to {total}, expected 1"
            )));
        }

        let params = Self {
            steps,
            dt,
            discount_factor: (-rate * dt).exp(),
            up,
            mid,
            down,
            prob_up,
            prob_mid,
            prob_down,
        };
        params.log_calibration();
        Ok(params)
    }

    fn log_calibration(&self) {
        debug!(
            steps = self.steps,
            dt = self.dt,
            up = self.up,
            mid = self.mid,
            down = self.down,
            prob_up = self.prob_up,
            prob_mid = self.prob_mid,
            prob_down = self.prob_down,
            discount_factor = self.discount_factor,
            "calibrated trinomial tree"
        );
    }
}

fn check_steps(steps: usize) -> Result<usize> {
    if steps == 0 {
        return Err(LatticeError::config("trinomial steps must be >= 1"));
    }
    Ok(steps)
}
