//! Module `math::combinatorics`.
//!
//! Binomial and multinomial path-count weights evaluated in log space.
//!
//! Numerical considerations: `C(n, k)` overflows `f64` near `n = 1030` while
//! `p^k` underflows long before that, so both are combined as logarithms via
//! `statrs` log-factorials and exponentiated once. Factors equal to zero raised
//! to the zeroth power contribute `1`, and negative factors (possible with
//! user-supplied multipliers) keep their sign.

use statrs::function::factorial::{ln_binomial, ln_factorial};

/// Exponentiates `ln_coefficient + sum(k * ln|p|)` with the sign of `prod(p^k)`.
fn weighted_product(ln_coefficient: f64, factors: &[(f64, u64)]) -> f64 {
    let mut ln_magnitude = ln_coefficient;
    let mut sign = 1.0;
    for &(p, k) in factors {
        if k == 0 {
            continue;
        }
        if p == 0.0 {
            return 0.0;
        }
        if p < 0.0 && k % 2 == 1 {
            sign = -sign;
        }
        ln_magnitude += k as f64 * p.abs().ln();
    }
    sign * ln_magnitude.exp()
}

/// Binomial coefficient `C(n, k)`; zero when `k > n`.
pub fn binomial_coefficient(n: u64, k: u64) -> f64 {
    if k > n {
        return 0.0;
    }
    ln_binomial(n, k).exp().round()
}

/// Probability of exactly `k` up-moves in `n` independent steps.
///
/// `C(n, k) * p_up^k * p_down^(n-k)`.
pub fn binomial_probability(n: u64, k: u64, p_up: f64, p_down: f64) -> f64 {
    if k > n {
        return 0.0;
    }
    weighted_product(ln_binomial(n, k), &[(p_up, k), (p_down, n - k)])
}

/// Probability of a given `(up, mid, down)` move-count triple.
///
/// `n! / (up! mid! down!) * p_up^up * p_mid^mid * p_down^down` with
/// `n = up + mid + down`.
pub fn multinomial_probability(
    up: u64,
    mid: u64,
    down: u64,
    p_up: f64,
    p_mid: f64,
    p_down: f64,
) -> f64 {
    let n = up + mid + down;
    let ln_coefficient =
        ln_factorial(n) - ln_factorial(up) - ln_factorial(mid) - ln_factorial(down);
    weighted_product(ln_coefficient, &[(p_up, up), (p_mid, mid), (p_down, down)])
}
