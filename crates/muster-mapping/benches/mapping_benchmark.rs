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

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use muster_mapping::builder::FunctionalityMappingBuilder;
use muster_model::{
    pool::ModelPool,
    resource::{CardinalityRestriction, Functionality, ResourceModel},
    taxonomy::{InMemoryTaxonomy, TaxonomyBuilder},
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;

struct Instance {
    taxonomy: InMemoryTaxonomy,
    pool: ModelPool,
    functionalities: Vec<Functionality>,
}

fn model(i: usize) -> ResourceModel {
    ResourceModel::new(format!("M{}", i))
}

/// Builds a random acyclic taxonomy where models only subtype models with a
/// larger index, a few models carry sub-resources, and every functionality
/// requires at least one model.
fn random_instance(seed: u64, num_models: usize, num_functionalities: usize) -> Instance {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut builder = TaxonomyBuilder::new();
    for i in 0..num_models {
        builder.add_model(model(i));
    }
    for i in 0..num_models {
        for j in i + 1..num_models {
            if rng.gen_bool(0.2) {
                builder.add_subtype(model(i), model(j));
            }
        }
    }
    for i in 0..num_models {
        if rng.gen_bool(0.25) {
            let j = rng.gen_range(0..num_models);
            if j != i {
                builder.add_restriction(
                    model(i),
                    CardinalityRestriction::new(model(j), 0, Some(rng.gen_range(1..3))),
                );
            }
        }
    }

    let mut functionalities = Vec::with_capacity(num_functionalities);
    for k in 0..num_functionalities {
        let f = ResourceModel::new(format!("F{}", k));
        builder.add_functionality(f.clone());
        let mut required: Vec<usize> = (0..num_models).filter(|_| rng.gen_bool(0.3)).collect();
        if required.is_empty() {
            required.push(rng.gen_range(0..num_models));
        }
        for i in required {
            let min = rng.gen_range(1..3);
            builder.add_restriction(f.clone(), CardinalityRestriction::new(model(i), min, None));
        }
        functionalities.push(f);
    }

    let pool = (0..num_models).map(|i| (model(i), rng.gen_range(1..4))).collect();
    Instance {
        taxonomy: builder.build(),
        pool,
        functionalities,
    }
}

fn bench_mapping_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("mapping_benchmark");
    group.sample_size(20);

    for &(num_models, num_functionalities) in &[(4, 3), (5, 4), (6, 4)] {
        let instance = random_instance(0x5EED, num_models, num_functionalities);
        let combinations = instance
            .pool
            .iter()
            .map(|(_, n)| n as u64 + 1)
            .product::<u64>()
            - 1;
        group.throughput(Throughput::Elements(combinations));
        let label = format!("{}m{}f", num_models, num_functionalities);

        for &threads in &[1usize, 0] {
            let builder = FunctionalityMappingBuilder::new()
                .threads(threads)
                .saturation_bound(instance.pool.clone());
            let id = BenchmarkId::new(if threads == 1 { "sequential" } else { "parallel" }, &label);
            group.bench_with_input(id, &instance, |b, inst| {
                b.iter(|| {
                    let mapping = builder
                        .build(&inst.taxonomy, &inst.pool, &inst.functionalities)
                        .unwrap();
                    black_box(mapping.num_supports())
                })
            });
        }

        let saturated = FunctionalityMappingBuilder::new().threads(0);
        group.bench_with_input(BenchmarkId::new("saturated", &label), &instance, |b, inst| {
            b.iter(|| {
                let mapping = saturated
                    .build(&inst.taxonomy, &inst.pool, &inst.functionalities)
                    .unwrap();
                black_box(mapping.num_supports())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_mapping_construction);
criterion_main!(benches);
