//! Contract definitions consumed by the lattice engines.

pub mod option_spec;

pub use option_spec::{ContractTerms, OptionSpec};
