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

//! Arithmetic over model pools.
//!
//! `sum` and `subtract` accept any `Cardinalities` (pools or deltas) and
//! produce a signed `ModelPoolDelta`; they never fail. `max` and `min` are
//! pointwise over the union of keys, where a key present in only one operand
//! keeps that operand's value. That makes `min` an "unconstrained unless both
//! sides say otherwise" meet rather than a meet with absent-as-zero.

use crate::pool::{Cardinalities, ModelPool, ModelPoolDelta, PoolError};
use std::collections::{BTreeMap, BTreeSet};

/// Returns `a[k] + b[k]` for every key of either operand (absent is zero).
///
/// # Examples
///
/// ```rust
/// # use muster_model::{algebra, pool::ModelPool};
///
/// let a = ModelPool::from_iter([("A".into(), 1)]);
/// let b = ModelPool::from_iter([("A".into(), 2), ("B".into(), 1)]);
/// let s = algebra::sum(&a, &b).to_model_pool().unwrap();
/// assert_eq!(s, ModelPool::from_iter([("A".into(), 3), ("B".into(), 1)]));
/// ```
pub fn sum<A, B>(a: &A, b: &B) -> ModelPoolDelta
where
    A: Cardinalities,
    B: Cardinalities,
{
    let mut counts: BTreeMap<_, i64> = BTreeMap::new();
    for (model, value) in a.cardinalities().chain(b.cardinalities()) {
        let entry = counts.entry(model.clone()).or_insert(0);
        *entry = entry.saturating_add(value);
    }
    counts.into_iter().collect()
}

/// Returns `b[k] - a[k]` for every key of either operand (absent is zero).
///
/// A non-negative result means `b` covers `a`; `is_negative()` on the result
/// means `b` is insufficient for `a`.
///
/// # Examples
///
/// ```rust
/// # use muster_model::{algebra, pool::ModelPool};
///
/// let required = ModelPool::from_iter([("A".into(), 2)]);
/// let offered = ModelPool::from_iter([("A".into(), 1)]);
/// assert!(algebra::subtract(&required, &offered).is_negative());
/// assert!(!algebra::subtract(&offered, &required).is_negative());
/// ```
pub fn subtract<A, B>(a: &A, b: &B) -> ModelPoolDelta
where
    A: Cardinalities,
    B: Cardinalities,
{
    let mut counts: BTreeMap<_, i64> = BTreeMap::new();
    for (model, value) in b.cardinalities() {
        let entry = counts.entry(model.clone()).or_insert(0);
        *entry = entry.saturating_add(value);
    }
    for (model, value) in a.cardinalities() {
        let entry = counts.entry(model.clone()).or_insert(0);
        *entry = entry.saturating_sub(value);
    }
    counts.into_iter().collect()
}

fn pointwise(a: &ModelPool, b: &ModelPool, pick: fn(u32, u32) -> u32) -> ModelPool {
    let mut result = a.clone();
    for (model, count) in b.iter() {
        let value = if a.contains(model) {
            pick(a.count(model), count)
        } else {
            count
        };
        result.set_count(model.clone(), value);
    }
    result
}

/// Pointwise maximum over the union of keys.
pub fn max(a: &ModelPool, b: &ModelPool) -> ModelPool {
    pointwise(a, b, std::cmp::max)
}

/// Pointwise minimum over the union of keys; a key missing from one operand
/// takes the other operand's value.
///
/// # Examples
///
/// ```rust
/// # use muster_model::{algebra, pool::ModelPool};
///
/// let a = ModelPool::from_iter([("A".into(), 1), ("B".into(), 4)]);
/// let b = ModelPool::from_iter([("A".into(), 3), ("C".into(), 2)]);
/// let expected = ModelPool::from_iter([("A".into(), 1), ("B".into(), 4), ("C".into(), 2)]);
/// assert_eq!(algebra::min(&a, &b), expected);
/// ```
pub fn min(a: &ModelPool, b: &ModelPool) -> ModelPool {
    pointwise(a, b, std::cmp::min)
}

/// Sums all `pools` into a single pool.
///
/// # Errors
///
/// Returns `PoolError::NegativeCardinality` if the fold turns negative, which
/// compact pools cannot produce.
pub fn merge<'a, I>(pools: I) -> Result<ModelPool, PoolError>
where
    I: IntoIterator<Item = &'a ModelPool>,
{
    pools
        .into_iter()
        .fold(ModelPoolDelta::new(), |acc, pool| sum(&acc, pool))
        .to_model_pool()
}

/// Returns `max(a, b)` for every pair of the Cartesian product `set_a x set_b`.
///
/// If one side is empty the other side is returned unchanged.
pub fn max_compositions(
    set_a: &BTreeSet<ModelPool>,
    set_b: &BTreeSet<ModelPool>,
) -> BTreeSet<ModelPool> {
    if set_a.is_empty() {
        return set_b.clone();
    }
    if set_b.is_empty() {
        return set_a.clone();
    }
    set_a
        .iter()
        .flat_map(|a| set_b.iter().map(move |b| max(a, b)))
        .collect()
}
