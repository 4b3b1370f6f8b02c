// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Property-based tests for model pool algebra.

use muster_model::{
    algebra,
    bound::ModelBound,
    combination::ModelPoolCombinations,
    pool::ModelPool,
    resource::ResourceModel,
};
use proptest::prelude::*;

fn pool_strategy() -> impl Strategy<Value = ModelPool> {
    prop::collection::btree_map(0u8..6, 1u32..20, 0..6).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(id, count)| (ResourceModel::new(format!("M{id}")), count))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_sum_is_commutative(a in pool_strategy(), b in pool_strategy()) {
        prop_assert_eq!(algebra::sum(&a, &b), algebra::sum(&b, &a));
    }

    #[test]
    fn prop_sum_is_associative(a in pool_strategy(), b in pool_strategy(), c in pool_strategy()) {
        let left = algebra::sum(&algebra::sum(&a, &b), &c);
        let right = algebra::sum(&a, &algebra::sum(&b, &c));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn prop_subtract_self_is_zero(a in pool_strategy()) {
        prop_assert!(algebra::subtract(&a, &a).is_zero());
    }

    #[test]
    fn prop_sum_of_pools_converts(a in pool_strategy(), b in pool_strategy()) {
        prop_assert!(algebra::sum(&a, &b).to_model_pool().is_ok());
    }

    #[test]
    fn prop_max_is_idempotent(a in pool_strategy()) {
        prop_assert_eq!(algebra::max(&a, &a), a);
    }

    /// On shared keys the meet is below both operands; keys present on one
    /// side only keep that side's value.
    #[test]
    fn prop_min_below_both_on_shared_keys(a in pool_strategy(), b in pool_strategy()) {
        let m = algebra::min(&a, &b);
        for (model, count) in m.iter() {
            match (a.contains(model), b.contains(model)) {
                (true, true) => {
                    prop_assert!(count <= a.count(model));
                    prop_assert!(count <= b.count(model));
                }
                (true, false) => prop_assert_eq!(count, a.count(model)),
                (false, true) => prop_assert_eq!(count, b.count(model)),
                (false, false) => prop_assert!(false, "min introduced unknown key {}", model),
            }
        }
    }

    #[test]
    fn prop_subtract_covers_iff_subset(a in pool_strategy(), b in pool_strategy()) {
        prop_assert_eq!(!algebra::subtract(&a, &b).is_negative(), a.is_subset_of(&b));
    }

    #[test]
    fn prop_bounded_by_is_subset_of_both(a in pool_strategy(), b in pool_strategy()) {
        let bounded = a.bounded_by(&b);
        prop_assert!(bounded.is_subset_of(&a));
        prop_assert!(bounded.is_subset_of(&b));
        prop_assert!(bounded.is_compact());
    }

    #[test]
    fn prop_merge_total_is_sum_of_totals(a in pool_strategy(), b in pool_strategy()) {
        let merged = algebra::merge([&a, &b]).unwrap();
        prop_assert_eq!(merged.total(), a.total() + b.total());
    }

    #[test]
    fn prop_bound_upper_and_lower_pools(min in 0u32..50, extra in 0u32..50) {
        let bound = ModelBound::new(ResourceModel::new("M"), min, min + extra).unwrap();
        let bounds = [bound];
        prop_assert!(ModelBound::lower_bounds(&bounds).is_subset_of(&ModelBound::upper_bounds(&bounds)));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_combinations_are_sub_pools(
        bound in prop::collection::btree_map(0u8..4, 1u32..4, 0..4),
        step in 1u32..3,
    ) {
        let bound: ModelPool = bound
            .into_iter()
            .map(|(id, count)| (ResourceModel::new(format!("M{id}")), count))
            .collect();
        let enumeration = ModelPoolCombinations::with_step(&bound, step);
        let expected = enumeration.total().unwrap();
        let mut seen = std::collections::BTreeSet::new();
        for combination in enumeration {
            prop_assert!(!combination.is_empty());
            prop_assert!(combination.is_compact());
            prop_assert!(combination.is_subset_of(&bound));
            prop_assert!(seen.insert(combination));
        }
        prop_assert_eq!(seen.len() as u64, expected);
    }
}
