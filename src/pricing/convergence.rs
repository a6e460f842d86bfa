//! Module `pricing::convergence`.
//!
//! Prices one contract on both trees over a range of step counts next to the
//! closed-form limit. Step counts are independent, so with the `parallel`
//! feature they are evaluated on the rayon pool.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::core::{OptionFamily, Result};
use crate::engines::tree::{TreeModel, TreeModelBuilder};
use crate::pricing::black_scholes::{BlackScholesReference, ClosedFormReference};

/// Tree prices for one step count.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConvergencePoint {
    pub steps: usize,
    pub binomial: f64,
    pub trinomial: f64,
    /// Closed-form value, when one exists for the family and a volatility is set.
    pub reference: Option<f64>,
}

impl ConvergencePoint {
    pub fn binomial_error(&self) -> Option<f64> {
        self.reference.map(|r| self.binomial - r)
    }

    pub fn trinomial_error(&self) -> Option<f64> {
        self.reference.map(|r| self.trinomial - r)
    }
}

/// Convergence study of one contract configuration.
#[derive(Debug, Clone)]
pub struct ConvergenceStudy {
    builder: TreeModelBuilder,
    family: OptionFamily,
}

impl ConvergenceStudy {
    pub fn new(builder: TreeModelBuilder, family: OptionFamily) -> Self {
        Self { builder, family }
    }

    fn reference(&self) -> Result<Option<f64>> {
        if self.builder.vol.is_none() {
            return Ok(None);
        }
        let market = self.builder.market()?;
        let terms = self.builder.terms()?;
        let bs = BlackScholesReference::for_contract(&market, &terms)?;
        Ok(bs.reference_price(&terms.spec(self.family)))
    }

    fn point(&self, steps: usize, reference: Option<f64>) -> Result<ConvergencePoint> {
        let builder = self.builder.clone().steps(steps);
        let binomial = builder.clone().build_binomial()?.price(self.family)?.price;
        let trinomial = builder.build_trinomial()?.price(self.family)?.price;
        Ok(ConvergencePoint {
            steps,
            binomial,
            trinomial,
            reference,
        })
    }

    /// Prices the contract for every entry of `steps`, in order.
    ///
    /// # Errors
    /// Propagates the first configuration error, including `0` steps on the
    /// trinomial tree.
    #[cfg(not(feature = "parallel"))]
    pub fn run(&self, steps: &[usize]) -> Result<Vec<ConvergencePoint>> {
        let reference = self.reference()?;
        debug!(family = %self.family, points = steps.len(), "running convergence study");
        steps.iter().map(|&n| self.point(n, reference)).collect()
    }

    /// Prices the contract for every entry of `steps`, in order.
    ///
    /// # Errors
    /// Propagates a configuration error, including `0` steps on the
    /// trinomial tree.
    #[cfg(feature = "parallel")]
    pub fn run(&self, steps: &[usize]) -> Result<Vec<ConvergencePoint>> {
        let reference = self.reference()?;
        debug!(
            family = %self.family,
            points = steps.len(),
            threads = rayon::current_num_threads(),
            "running convergence study"
        );
        steps.par_iter().map(|&n| self.point(n, reference)).collect()
    }
}
