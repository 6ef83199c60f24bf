// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use fm_cardinality::sketch::estimate_for_index;
use fm_cardinality::*;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_tokens() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,6}", 0..60)
}

fn arb_policy() -> impl Strategy<Value = BitScanPolicy> {
    prop_oneof![
        Just(BitScanPolicy::ShiftFirst),
        Just(BitScanPolicy::DiscardLowBit),
    ]
}

fn arb_fill() -> impl Strategy<Value = TableFill> {
    prop_oneof![Just(TableFill::Unconstrained), Just(TableFill::OddConstrained)]
}

fn ensemble(seed: u64, policy: BitScanPolicy, fill: TableFill) -> MedianEstimator {
    let family = HashFunctionFamily::from_seed(6, 128, fill, seed).unwrap();
    MedianEstimator::with_options(family, 64, policy).unwrap()
}

fn sketch(policy: BitScanPolicy) -> Sketch<BaseHasher> {
    Sketch::with_options(BaseHasher::new(), 64, policy).unwrap()
}

// ============================================================================
// Sketch properties
// ============================================================================

proptest! {
    #[test]
    fn sketch_add_is_idempotent(tokens in arb_tokens(), policy in arb_policy()) {
        let mut once = sketch(policy);
        let mut twice = sketch(policy);
        for t in &tokens {
            once.add(t.as_str());
            twice.add(t.as_str());
            twice.add(t.as_str());
        }
        prop_assert_eq!(once.bitmap(), twice.bitmap());
        prop_assert_eq!(once.cardinality(), twice.cardinality());
    }

    #[test]
    fn sketch_is_order_independent(
        (tokens, shuffled) in arb_tokens().prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle())),
        policy in arb_policy(),
    ) {
        let mut a = sketch(policy);
        let mut b = sketch(policy);
        for t in &tokens {
            a.add(t.as_str());
        }
        for t in &shuffled {
            b.add(t.as_str());
        }
        prop_assert_eq!(a.bitmap(), b.bitmap());
        prop_assert_eq!(a.cardinality(), b.cardinality());
    }

    #[test]
    fn sketch_bitmap_is_monotonic(tokens in arb_tokens(), policy in arb_policy()) {
        let mut s = sketch(policy);
        let mut previous = s.bitmap().clone();
        for t in &tokens {
            s.add(t.as_str());
            for i in 0..64 {
                prop_assert!(!previous.get(i) || s.bitmap().get(i));
            }
            prop_assert!(s.cardinality() >= estimate_for_index(previous.highest_set().unwrap_or(0)));
            previous = s.bitmap().clone();
        }
    }

    #[test]
    fn sketch_estimate_has_fm_form(tokens in arb_tokens(), policy in arb_policy()) {
        let mut s = sketch(policy);
        for t in &tokens {
            s.add(t.as_str());
        }
        let i = s.highest_bit().unwrap_or(0);
        prop_assert!(i < 64);
        prop_assert_eq!(s.cardinality(), estimate_for_index(i));
    }
}

// ============================================================================
// Ensemble properties
// ============================================================================

proptest! {
    #[test]
    fn ensemble_is_deterministic(
        tokens in arb_tokens(),
        seed in any::<u64>(),
        policy in arb_policy(),
        fill in arb_fill(),
    ) {
        let mut a = ensemble(seed, policy, fill);
        let mut b = ensemble(seed, policy, fill);
        for t in &tokens {
            a.add(t.as_str());
            b.add(t.as_str());
        }
        prop_assert_eq!(a.estimates(), b.estimates());
        prop_assert_eq!(a.cardinality(), b.cardinality());
    }

    #[test]
    fn ensemble_reports_upper_median(tokens in arb_tokens(), seed in any::<u64>()) {
        let mut e = ensemble(seed, BitScanPolicy::ShiftFirst, TableFill::Unconstrained);
        for t in &tokens {
            e.add(t.as_str());
        }
        let mut sorted = e.estimates();
        sorted.sort();
        prop_assert_eq!(e.cardinality(), sorted[sorted.len() / 2]);
    }

    #[test]
    fn median_estimate_picks_sorted_middle(values in prop::collection::vec(0u64..1000, 1..40)) {
        let mut sorted = values.clone();
        sorted.sort();
        let median = fm_cardinality::ensemble::median_estimate(values).unwrap();
        prop_assert_eq!(median, sorted[sorted.len() / 2]);
    }
}
