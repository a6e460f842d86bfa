//! Property-based tests for the lattice engines.
//!
//! These tests verify that:
//! 1. Calibrated transition probabilities sum to one and CRR moves are reciprocal
//! 2. Terminal distributions are normalised for any step count
//! 3. Lattice prices are ordered by up-move count
//! 4. Early exercise never lowers a value and deltas stay finite

use proptest::prelude::*;

use openlattice::core::{OptionFamily, OptionType, TreeKind};
use openlattice::engines::tree::{
    BinomialParameters, ModelParameters, TreeModel, TreeModelBuilder, TrinomialParameters,
};

const TOL: f64 = 1e-9;

/// Every transition probability lies strictly inside (0, 1).
fn well_posed(params: &ModelParameters) -> bool {
    let inside = |p: f64| p > 0.0 && p < 1.0;
    match params {
        ModelParameters::Binomial(p) => inside(p.prob_up) && inside(p.prob_down),
        ModelParameters::Trinomial(p) => {
            inside(p.prob_up) && inside(p.prob_mid) && inside(p.prob_down)
        }
    }
}

/// Market and contract inputs inside the usual classroom ranges.
fn inputs_strategy() -> impl Strategy<Value = (f64, f64, f64, f64, f64)> {
    (
        0.25..2.0f64,  // expiry
        0.0..0.08f64,  // rate
        0.0..0.05f64,  // dividend yield
        0.1..0.6f64,   // vol
        20.0..200.0f64, // spot
    )
}

// ============================================================================
// Calibration
// ============================================================================

proptest! {
    #[test]
    fn binomial_probabilities_sum_to_one(
        steps in 1usize..=100,
        (expiry, rate, div, vol, _spot) in inputs_strategy(),
    ) {
        let p = BinomialParameters::from_volatility(expiry, rate, div, steps, vol).unwrap();
        prop_assert!((p.prob_up + p.prob_down - 1.0).abs() < TOL);
        prop_assert!((p.up * p.down - 1.0).abs() < TOL);
        prop_assert!((p.dt * steps as f64 - expiry).abs() < TOL);
    }

    #[test]
    fn trinomial_probabilities_sum_to_one(
        steps in 1usize..=100,
        (expiry, rate, div, vol, _spot) in inputs_strategy(),
    ) {
        let p = TrinomialParameters::from_volatility(expiry, rate, div, steps, vol).unwrap();
        prop_assert!((p.prob_up + p.prob_mid + p.prob_down - 1.0).abs() < TOL);
        prop_assert!((p.up * p.down - 1.0).abs() < TOL);
        prop_assert_eq!(p.mid, 1.0);
    }

    #[test]
    fn direct_binomial_recomputes_probabilities(
        pu in 0.01..0.5f64,
        pd in 0.01..0.5f64,
        steps in 1usize..=50,
    ) {
        let p = BinomialParameters::from_direct_probabilities(1.0, 0.05, 0.0, steps, pu, pd).unwrap();
        prop_assert!((p.up - (1.0 + pu)).abs() < 1e-15);
        prop_assert!((p.down - (1.0 - pd)).abs() < 1e-15);
        prop_assert!((p.prob_up + p.prob_down - 1.0).abs() < TOL);
    }
}

// ============================================================================
// Terminal distributions
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn binomial_end_states_are_normalised(
        steps in 1usize..=100,
        (expiry, rate, div, vol, spot) in inputs_strategy(),
    ) {
        let model = TreeModelBuilder::new()
            .spot(spot)
            .strike(spot)
            .expiry(expiry)
            .rate(rate)
            .dividend_yield(div)
            .vol(vol)
            .steps(steps)
            .build_binomial()
            .unwrap();
        prop_assume!(well_posed(&model.parameters()));
        let v = model.price(OptionFamily::European).unwrap();
        prop_assert_eq!(v.end_states.len(), steps + 1);
        prop_assert!((v.end_states.total() - 1.0).abs() < TOL);
    }

    #[test]
    fn trinomial_end_states_are_normalised(
        steps in 1usize..=40,
        (expiry, rate, div, vol, spot) in inputs_strategy(),
    ) {
        let model = TreeModelBuilder::new()
            .spot(spot)
            .strike(spot)
            .expiry(expiry)
            .rate(rate)
            .dividend_yield(div)
            .vol(vol)
            .steps(steps)
            .build_trinomial()
            .unwrap();
        prop_assume!(well_posed(&model.parameters()));
        let v = model.price(OptionFamily::European).unwrap();
        prop_assert_eq!(v.end_states.len(), (steps + 1) * (steps + 2) / 2);
        prop_assert!((v.end_states.total() - 1.0).abs() < TOL);
    }
}

// ============================================================================
// Lattice ordering and induction
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn lattice_rows_are_ordered_by_up_moves(
        steps in 1usize..=60,
        (expiry, rate, div, vol, spot) in inputs_strategy(),
    ) {
        let builder = TreeModelBuilder::new()
            .spot(spot)
            .strike(spot)
            .expiry(expiry)
            .rate(rate)
            .dividend_yield(div)
            .vol(vol)
            .steps(steps);

        // Binomial column j counts down-moves.
        let bin = builder.clone().build_binomial().unwrap().price(OptionFamily::European).unwrap();
        for i in 0..=steps {
            let row = bin.underlying.row(i);
            for j in 0..i {
                prop_assert!(row[j] >= row[j + 1]);
            }
        }

        // Trinomial columns increase with the net up-move count.
        let tri = builder.build_trinomial().unwrap().price(OptionFamily::European).unwrap();
        for i in 0..=steps {
            let active: Vec<usize> = tri.underlying.active_range(i).collect();
            for w in active.windows(2) {
                prop_assert!(tri.underlying.get(i, w[1]) >= tri.underlying.get(i, w[0]));
            }
        }
    }

    #[test]
    fn american_put_is_at_least_european(
        steps in 1usize..=80,
        moneyness in 0.6..1.6f64,
        (expiry, rate, div, vol, spot) in inputs_strategy(),
    ) {
        let model = TreeModelBuilder::new()
            .spot(spot)
            .strike(spot * moneyness)
            .expiry(expiry)
            .rate(rate)
            .dividend_yield(div)
            .vol(vol)
            .steps(steps)
            .put()
            .build_binomial()
            .unwrap();
        prop_assume!(well_posed(&model.parameters()));
        let am = model.price(OptionFamily::American).unwrap();
        let eu = model.price(OptionFamily::European).unwrap();
        prop_assert!(am.price >= eu.price - 1e-12);
        prop_assert!(am.price >= (spot * moneyness - spot).max(0.0) - 1e-12);
    }

    #[test]
    fn deltas_are_finite_and_signed(
        steps in 1usize..=60,
        kind in prop_oneof![Just(TreeKind::Binomial), Just(TreeKind::Trinomial)],
        (expiry, rate, div, vol, spot) in inputs_strategy(),
    ) {
        for option_type in [OptionType::Call, OptionType::Put] {
            let model = TreeModelBuilder::new()
                .spot(spot)
                .strike(spot)
                .expiry(expiry)
                .rate(rate)
                .dividend_yield(div)
                .vol(vol)
                .steps(steps)
                .option_type(option_type)
                .build(kind)
                .unwrap();
            prop_assume!(well_posed(&model.parameters()));
            let v = model.price(OptionFamily::European).unwrap();
            let root = v.root_delta();
            prop_assert!(root.is_finite());
            match option_type {
                OptionType::Call => prop_assert!(root >= -1e-12),
                OptionType::Put => prop_assert!(root <= 1e-12),
            }
        }
    }
}
