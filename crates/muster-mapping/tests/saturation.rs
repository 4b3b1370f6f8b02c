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

//! Property-based tests for the saturation bound: it grows with the pool and
//! never hides support on subtype-only taxonomies.

use muster_mapping::{builder::FunctionalityMappingBuilder, requirements, saturation};
use muster_model::{
    pool::ModelPool,
    resource::{CardinalityRestriction, ResourceModel},
    taxonomy::{InMemoryTaxonomy, TaxonomyBuilder},
};
use proptest::prelude::*;

const NUM_MODELS: usize = 4;

fn model(i: usize) -> ResourceModel {
    ResourceModel::new(format!("M{}", i))
}

fn functionality() -> ResourceModel {
    ResourceModel::new("F")
}

/// Subtype edges `M_i <: M_j` for `i < j`, and at most one restriction per model.
fn taxonomy_strategy() -> impl Strategy<Value = InMemoryTaxonomy> {
    (
        prop::collection::vec(any::<bool>(), NUM_MODELS * (NUM_MODELS - 1) / 2),
        prop::collection::vec(prop::option::of((0u32..3, 0u32..3)), NUM_MODELS),
    )
        .prop_map(|(edges, restrictions)| {
            let mut builder = TaxonomyBuilder::new();
            for i in 0..NUM_MODELS {
                builder.add_model(model(i));
            }
            let pairs = (0..NUM_MODELS).flat_map(|i| (i + 1..NUM_MODELS).map(move |j| (i, j)));
            for ((i, j), edge) in pairs.zip(edges) {
                if edge {
                    builder.add_subtype(model(i), model(j));
                }
            }
            builder.add_functionality(functionality());
            for (i, restriction) in restrictions.into_iter().enumerate() {
                if let Some((min, extra)) = restriction {
                    builder.add_restriction(
                        functionality(),
                        CardinalityRestriction::new(model(i), min, Some(min + extra)),
                    );
                }
            }
            builder.build()
        })
}

fn pool_strategy() -> impl Strategy<Value = ModelPool> {
    prop::collection::vec(0u32..4, NUM_MODELS)
        .prop_map(|counts| counts.into_iter().enumerate().map(|(i, n)| (model(i), n)).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_saturation_is_monotone_in_the_pool(
        taxonomy in taxonomy_strategy(),
        pool in pool_strategy(),
        growth in pool_strategy(),
    ) {
        let required = requirements::required_bounds(&taxonomy, &functionality()).unwrap();
        let larger: ModelPool = pool
            .iter()
            .chain(growth.iter())
            .map(|(m, n)| (m.clone(), n))
            .fold(ModelPool::new(), |mut acc, (m, n)| {
                acc.add(m, n);
                acc
            });

        let small = saturation::saturation_bound(&taxonomy, [required.as_slice()], &pool);
        let large = saturation::saturation_bound(&taxonomy, [required.as_slice()], &larger);
        prop_assert!(small.is_subset_of(&pool));
        prop_assert!(large.is_subset_of(&larger));
        prop_assert!(small.is_subset_of(&large));
    }

    #[test]
    fn prop_saturation_preserves_support(
        taxonomy in taxonomy_strategy(),
        pool in pool_strategy(),
    ) {
        let f = functionality();
        let full = FunctionalityMappingBuilder::new()
            .threads(1)
            .saturation_bound(pool.clone())
            .build(&taxonomy, &pool, std::slice::from_ref(&f))
            .unwrap();
        let saturated = FunctionalityMappingBuilder::new()
            .threads(1)
            .build(&taxonomy, &pool, std::slice::from_ref(&f))
            .unwrap();

        prop_assert_eq!(full.is_supported(&f), saturated.is_supported(&f));
        let full_pools = full.get_model_pools(&f).unwrap();
        for combination in saturated.get_model_pools(&f).unwrap() {
            prop_assert!(full_pools.contains(combination));
        }
    }
}
