//! Tree-based pricing engines.
//!
//! Recombining binomial and trinomial lattices sharing one calibration,
//! induction and distribution layer.

pub mod binomial;
pub mod builder;
pub mod calibration;
pub mod distribution;
pub mod induction;
pub mod lattice;
pub mod model;
pub mod trinomial;

pub use binomial::BinomialTreeModel;
pub use builder::TreeModelBuilder;
pub use calibration::{BinomialParameters, TrinomialMoves, TrinomialParameters};
pub use distribution::{EndStateDistribution, MoveCounts, TrinomialEndState};
pub use lattice::Lattice;
pub use model::{ModelParameters, TreeModel, TreeValuation};
pub use trinomial::TrinomialTreeModel;
