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

//! Multisets of resource models.
//!
//! A `ModelPool` counts units per `ResourceModel`. A pool is *compact* when
//! no entry is zero; arithmetic may produce zero entries and `compact()`
//! removes them before the pool is used as a pool again. A `ModelPoolDelta`
//! is the signed result of pool arithmetic and is only ever an intermediate.

use crate::resource::{ResourceInstance, ResourceModel};
use muster_core::num::saturating::SaturatingAddVal;
use std::{
    collections::{BTreeMap, btree_map},
    fmt,
};

/// The error type for converting a signed delta back into a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The delta holds a negative count for `model`.
    NegativeCardinality { model: ResourceModel, count: i64 },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeCardinality { model, count } => write!(
                f,
                "Cannot convert delta to a model pool: model {} has negative count {}",
                model, count
            ),
        }
    }
}

impl std::error::Error for PoolError {}

/// Read access to per-model counts, shared by pools and deltas so that the
/// algebra can combine either.
pub trait Cardinalities {
    /// Iterates `(model, count)` in model order.
    fn cardinalities(&self) -> impl Iterator<Item = (&ResourceModel, i64)>;
}

/// An ordered multiset `ResourceModel -> u32`.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModelPool {
    counts: BTreeMap<ResourceModel, u32>,
}

impl ModelPool {
    /// Creates an empty pool.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a pool by counting instances per model.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use muster_model::{pool::ModelPool, resource::{ResourceInstance, ResourceModel}};
    ///
    /// let a = ResourceModel::new("A");
    /// let pool = ModelPool::from_instances(&[
    ///     ResourceInstance::new(a.clone(), 0),
    ///     ResourceInstance::new(a.clone(), 1),
    /// ]);
    /// assert_eq!(pool.count(&a), 2);
    /// ```
    pub fn from_instances<'a, I>(instances: I) -> Self
    where
        I: IntoIterator<Item = &'a ResourceInstance>,
    {
        let mut pool = Self::new();
        for instance in instances {
            pool.add(instance.model().clone(), 1);
        }
        pool
    }

    /// Returns the count of `model`, `0` if absent.
    #[inline]
    pub fn count(&self, model: &ResourceModel) -> u32 {
        self.counts.get(model).copied().unwrap_or(0)
    }

    /// Sets the count of `model`, returning the previous count if present.
    ///
    /// A count of zero is stored as an explicit entry; use `compact()` to drop it.
    #[inline]
    pub fn set_count(&mut self, model: ResourceModel, count: u32) -> Option<u32> {
        self.counts.insert(model, count)
    }

    /// Adds `count` units of `model`, saturating at `u32::MAX`.
    #[inline]
    pub fn add(&mut self, model: ResourceModel, count: u32) {
        let entry = self.counts.entry(model).or_insert(0);
        *entry = entry.saturating_add_val(count);
    }

    /// Removes `model` from the pool, returning its count.
    #[inline]
    pub fn remove(&mut self, model: &ResourceModel) -> Option<u32> {
        self.counts.remove(model)
    }

    /// Returns `true` if the pool holds an entry for `model`, zero or not.
    #[inline]
    pub fn contains(&self, model: &ResourceModel) -> bool {
        self.counts.contains_key(model)
    }

    /// Removes all zero entries.
    #[inline]
    pub fn compact(&mut self) {
        self.counts.retain(|_, count| *count > 0);
    }

    /// Returns a compacted copy of the pool.
    #[inline]
    pub fn compacted(&self) -> Self {
        let mut pool = self.clone();
        pool.compact();
        pool
    }

    #[inline]
    pub fn is_compact(&self) -> bool {
        self.counts.values().all(|&count| count > 0)
    }

    /// Returns `true` if the pool holds no units at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.values().all(|&count| count == 0)
    }

    /// Returns the number of entries, including zero entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns the total number of units.
    #[inline]
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&count| count as u64).sum()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&ResourceModel, u32)> {
        self.counts.iter().map(|(model, &count)| (model, count))
    }

    #[inline]
    pub fn models(&self) -> impl Iterator<Item = &ResourceModel> {
        self.counts.keys()
    }

    /// Returns `true` if every count of `self` is at most the count of the same
    /// model in `other` (absent counts are zero).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use muster_model::pool::ModelPool;
    ///
    /// let small = ModelPool::from_iter([("A".into(), 1)]);
    /// let large = ModelPool::from_iter([("A".into(), 2), ("B".into(), 1)]);
    /// assert!(small.is_subset_of(&large));
    /// assert!(!large.is_subset_of(&small));
    /// ```
    pub fn is_subset_of(&self, other: &ModelPool) -> bool {
        self.iter().all(|(model, count)| count <= other.count(model))
    }

    /// Clamps every count of `self` to the count of the same model in
    /// `ceiling`. Models absent from `ceiling` are clamped to zero and removed.
    ///
    /// The result is compact.
    pub fn bounded_by(&self, ceiling: &ModelPool) -> ModelPool {
        self.iter()
            .map(|(model, count)| (model.clone(), count.min(ceiling.count(model))))
            .filter(|&(_, count)| count > 0)
            .collect()
    }
}

impl Cardinalities for ModelPool {
    fn cardinalities(&self) -> impl Iterator<Item = (&ResourceModel, i64)> {
        self.counts.iter().map(|(model, &count)| (model, count as i64))
    }
}

impl FromIterator<(ResourceModel, u32)> for ModelPool {
    fn from_iter<I: IntoIterator<Item = (ResourceModel, u32)>>(iter: I) -> Self {
        let mut pool = Self::new();
        pool.extend(iter);
        pool
    }
}

impl Extend<(ResourceModel, u32)> for ModelPool {
    /// Adds the counts; repeated models accumulate.
    fn extend<I: IntoIterator<Item = (ResourceModel, u32)>>(&mut self, iter: I) {
        for (model, count) in iter {
            self.add(model, count);
        }
    }
}

impl<'a> IntoIterator for &'a ModelPool {
    type Item = (&'a ResourceModel, &'a u32);
    type IntoIter = btree_map::Iter<'a, ResourceModel, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}

impl fmt::Debug for ModelPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelPool{}", self)
    }
}

impl fmt::Display for ModelPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (model, count)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", model, count)?;
        }
        f.write_str("}")
    }
}

/// An ordered signed mapping `ResourceModel -> i64`.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ModelPoolDelta {
    counts: BTreeMap<ResourceModel, i64>,
}

impl ModelPoolDelta {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the delta for `model`, `0` if absent.
    #[inline]
    pub fn get(&self, model: &ResourceModel) -> i64 {
        self.counts.get(model).copied().unwrap_or(0)
    }

    #[inline]
    pub fn set(&mut self, model: ResourceModel, value: i64) {
        self.counts.insert(model, value);
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&ResourceModel, i64)> {
        self.counts.iter().map(|(model, &value)| (model, value))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns `true` if some entry is below zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.counts.values().any(|&value| value < 0)
    }

    /// Returns `true` if every entry is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.counts.values().all(|&value| value == 0)
    }

    /// Converts the delta into a pool, keeping zero entries.
    ///
    /// Counts above `u32::MAX` saturate.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::NegativeCardinality` for the first negative entry.
    pub fn to_model_pool(&self) -> Result<ModelPool, PoolError> {
        let mut pool = ModelPool::new();
        for (model, value) in self.iter() {
            if value < 0 {
                return Err(PoolError::NegativeCardinality {
                    model: model.clone(),
                    count: value,
                });
            }
            pool.set_count(model.clone(), u32::try_from(value).unwrap_or(u32::MAX));
        }
        Ok(pool)
    }
}

impl Cardinalities for ModelPoolDelta {
    fn cardinalities(&self) -> impl Iterator<Item = (&ResourceModel, i64)> {
        self.iter()
    }
}

impl FromIterator<(ResourceModel, i64)> for ModelPoolDelta {
    fn from_iter<I: IntoIterator<Item = (ResourceModel, i64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for ModelPoolDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ModelPoolDelta{")?;
        for (i, (model, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", model, value)?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(id: &str) -> ResourceModel {
        ResourceModel::new(id)
    }

    #[test]
    fn test_count_defaults_to_zero() {
        let pool = ModelPool::from_iter([(m("A"), 2)]);
        assert_eq!(pool.count(&m("A")), 2);
        assert_eq!(pool.count(&m("B")), 0);
    }

    #[test]
    fn test_from_instances_counts_per_model() {
        let instances = [
            ResourceInstance::new(m("A"), 0),
            ResourceInstance::new(m("B"), 0),
            ResourceInstance::new(m("A"), 1),
        ];
        let pool = ModelPool::from_instances(&instances);
        assert_eq!(pool, ModelPool::from_iter([(m("A"), 2), (m("B"), 1)]));
    }

    #[test]
    fn test_compact_removes_zero_entries() {
        let mut pool = ModelPool::new();
        pool.set_count(m("A"), 0);
        pool.set_count(m("B"), 3);
        assert!(!pool.is_compact());
        assert_ne!(pool, ModelPool::from_iter([(m("B"), 3)]));

        pool.compact();
        assert!(pool.is_compact());
        assert_eq!(pool, ModelPool::from_iter([(m("B"), 3)]));
    }

    #[test]
    fn test_is_empty_ignores_zero_entries() {
        let mut pool = ModelPool::new();
        assert!(pool.is_empty());
        pool.set_count(m("A"), 0);
        assert!(pool.is_empty());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_subset() {
        let a = ModelPool::from_iter([(m("A"), 1)]);
        let b = ModelPool::from_iter([(m("A"), 1), (m("B"), 4)]);
        assert!(a.is_subset_of(&b));
        assert!(a.is_subset_of(&a));
        assert!(!b.is_subset_of(&a));
        assert!(ModelPool::new().is_subset_of(&a));
    }

    #[test]
    fn test_bounded_by_drops_models_missing_from_ceiling() {
        let pool = ModelPool::from_iter([(m("A"), 5), (m("B"), 2), (m("C"), 1)]);
        let ceiling = ModelPool::from_iter([(m("A"), 3), (m("B"), 4)]);
        assert_eq!(
            pool.bounded_by(&ceiling),
            ModelPool::from_iter([(m("A"), 3), (m("B"), 2)])
        );
    }

    #[test]
    fn test_add_saturates() {
        let mut pool = ModelPool::from_iter([(m("A"), u32::MAX - 1)]);
        pool.add(m("A"), 5);
        assert_eq!(pool.count(&m("A")), u32::MAX);
        assert_eq!(pool.total(), u32::MAX as u64);
    }

    #[test]
    fn test_display() {
        let pool = ModelPool::from_iter([(m("B"), 1), (m("A"), 2)]);
        assert_eq!(pool.to_string(), "{A: 2, B: 1}");
        assert_eq!(ModelPool::new().to_string(), "{}");
    }

    #[test]
    fn test_delta_negative_detection_and_conversion() {
        let delta = ModelPoolDelta::from_iter([(m("A"), 2), (m("B"), 0)]);
        assert!(!delta.is_negative());
        assert_eq!(
            delta.to_model_pool().unwrap(),
            ModelPool::from_iter([(m("A"), 2), (m("B"), 0)])
        );

        let delta = ModelPoolDelta::from_iter([(m("A"), 2), (m("B"), -1)]);
        assert!(delta.is_negative());
        assert_eq!(
            delta.to_model_pool(),
            Err(PoolError::NegativeCardinality {
                model: m("B"),
                count: -1
            })
        );
    }
}
