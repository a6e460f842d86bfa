//! Market data container for lattice pricing.

#[allow(clippy::module_inception)]
pub mod market;

pub use market::MarketInputs;
