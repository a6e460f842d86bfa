//! Module `pricing::sweep`.
//!
//! Price profiles obtained by re-pricing a configuration while one input
//! moves: initial spot, power exponent, and the two legs of a strangle.

use crate::core::{OptionFamily, OptionType, Result, TreeKind};
use crate::engines::tree::{TreeModel, TreeModelBuilder};

/// One point of a one-dimensional price profile.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LadderPoint {
    pub input: f64,
    pub price: f64,
}

/// Evenly spaced spots within `±percentage` percent of `center`, inclusive.
///
/// Returns `center` alone when `count < 2`.
pub fn spot_range(center: f64, percentage: f64, count: usize) -> Vec<f64> {
    if count < 2 {
        return vec![center];
    }
    let lo = center * (1.0 - percentage / 100.0);
    let hi = center * (1.0 + percentage / 100.0);
    let step = (hi - lo) / (count - 1) as f64;
    (0..count).map(|i| lo + step * i as f64).collect()
}

/// Prices `family` once per initial spot.
///
/// # Errors
/// Propagates configuration errors, including non-positive spots.
pub fn spot_ladder(
    builder: &TreeModelBuilder,
    kind: TreeKind,
    family: OptionFamily,
    spots: &[f64],
) -> Result<Vec<LadderPoint>> {
    spots
        .iter()
        .map(|&spot| {
            let price = builder.clone().spot(spot).build(kind)?.price(family)?.price;
            Ok(LadderPoint { input: spot, price })
        })
        .collect()
}

/// Prices the power family once per exponent.
///
/// # Errors
/// Propagates configuration errors, including non-finite exponents.
pub fn exponent_ladder(
    builder: &TreeModelBuilder,
    kind: TreeKind,
    exponents: &[f64],
) -> Result<Vec<LadderPoint>> {
    exponents
        .iter()
        .map(|&exponent| {
            let price = builder
                .clone()
                .exponent(exponent)
                .build(kind)?
                .price(OptionFamily::Power)?
                .price;
            Ok(LadderPoint {
                input: exponent,
                price,
            })
        })
        .collect()
}

/// A strangle and its separately priced legs.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StrangleLegs {
    /// European call struck at `K`.
    pub call: f64,
    /// European put struck at `K2`.
    pub put: f64,
    pub strangle: f64,
}

impl StrangleLegs {
    /// Value of writing the strangle.
    pub fn short(&self) -> f64 {
        -self.strangle
    }
}

/// Prices the strangle next to its call leg at `K` and put leg at `K2`.
///
/// Without early exercise the legs sum to the strangle price.
///
/// # Errors
/// Propagates configuration errors.
pub fn strangle_legs(builder: &TreeModelBuilder, kind: TreeKind) -> Result<StrangleLegs> {
    let strangle = builder.clone().build(kind)?.price(OptionFamily::Strangle)?.price;
    let call = builder
        .clone()
        .option_type(OptionType::Call)
        .build(kind)?
        .price(OptionFamily::European)?
        .price;
    let put_strike = builder.second_strike.or(builder.strike);
    let mut put_builder = builder.clone().option_type(OptionType::Put);
    put_builder.strike = put_strike;
    let put = put_builder
        .build(kind)?
        .price(OptionFamily::European)?
        .price;
    Ok(StrangleLegs {
        call,
        put,
        strangle,
    })
}
