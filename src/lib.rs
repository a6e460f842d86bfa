//! OpenLattice prices options on recombining binomial and trinomial trees.
//!
//! A tree model owns one immutable calibration (step length, discounting, move
//! multipliers and risk-neutral probabilities) derived either from a flat
//! volatility or from directly supplied moves. Each pricing call rebuilds the
//! underlying lattice, evaluates the terminal payoff of the requested family,
//! rolls it back to time zero and returns the price together with the option
//! value and delta lattices and the terminal-state distribution.
//!
//! References used across modules include:
//! - Cox, Ross and Rubinstein (1979) for the binomial calibration.
//! - Hull, *Options, Futures, and Other Derivatives* (11th ed.), Ch. 13, 15, 21 and 26.
//!
//! Numerical considerations:
//! - both trees converge to Black-Scholes at first order in the step count;
//! - the trinomial discount factor ignores the dividend yield while the
//!   binomial one nets it out of the rate, so the two trees disagree for `q > 0`;
//! - terminal probabilities are evaluated in log space and stay finite for
//!   large step counts.
//!
//! # Feature Flags
//! - `parallel`: evaluates convergence studies on the Rayon pool.
//! - `cli`: builds the `tree_pricer` binary.
//!
//! # Quick Start
//! Price a two-step American put:
//! ```rust
//! use openlattice::prelude::*;
//!
//! let model = TreeModelBuilder::new()
//!     .spot(50.0)
//!     .strike(52.0)
//!     .vol(0.2)
//!     .put()
//!     .build_binomial()
//!     .unwrap();
//! let american = model.price(OptionFamily::American).unwrap();
//! let european = model.price(OptionFamily::European).unwrap();
//! assert!(american.price >= european.price);
//! ```
//!
//! Compare a trinomial digital with its closed form:
//! ```rust
//! use openlattice::prelude::*;
//!
//! let builder = TreeModelBuilder::new().spot(50.0).strike(52.0).vol(0.2).steps(200);
//! let tree = builder.clone().build_trinomial().unwrap();
//! let digital = tree.price(OptionFamily::Digital).unwrap();
//!
//! let bs = BlackScholesReference::for_contract(tree.market(), tree.terms()).unwrap();
//! let exact = bs.reference_price(&tree.terms().spec(OptionFamily::Digital)).unwrap();
//! assert!((digital.price - exact).abs() < 0.05);
//! ```

pub mod core;
pub mod engines;
pub mod instruments;
pub mod market;
pub mod math;
pub mod pricing;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::core::*;
    pub use crate::engines::tree::*;
    pub use crate::instruments::*;
    pub use crate::market::*;
    pub use crate::pricing::{
        BlackScholesReference, ClosedFormReference, ConvergencePoint, ConvergenceStudy,
    };
}
