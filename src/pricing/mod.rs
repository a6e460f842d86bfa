//! Payoffs, closed-form references and multi-pricing studies built on the
//! tree engines.

pub mod black_scholes;
pub mod convergence;
pub mod payoff;
pub mod sweep;

pub use black_scholes::{BlackScholesReference, ClosedFormReference};
pub use convergence::{ConvergencePoint, ConvergenceStudy};
pub use sweep::{LadderPoint, StrangleLegs, exponent_ladder, spot_ladder, spot_range, strangle_legs};
