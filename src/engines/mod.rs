//! Pricing engine implementations.

pub mod tree;
