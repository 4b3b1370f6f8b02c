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

//! Lazy enumeration of sub-pools.
//!
//! `ModelPoolCombinations` walks every non-empty sub-multiset of a pool like
//! a mixed-radix odometer. Digit `i` is the count of the `i`-th model in
//! sort order, the first model being the lowest-order digit. A digit advances
//! by `step` and its last value is clamped to the model's bound, after which
//! it wraps to zero and carries.

use crate::{pool::ModelPool, resource::ResourceModel};
use std::iter::FusedIterator;

/// An iterator over the non-empty sub-pools of a bounding pool.
///
/// # Examples
///
/// ```rust
/// # use muster_model::{combination::ModelPoolCombinations, pool::ModelPool};
///
/// let pool = ModelPool::from_iter([("A".into(), 2), ("B".into(), 1)]);
/// let all: Vec<String> = ModelPoolCombinations::new(&pool).map(|p| p.to_string()).collect();
/// assert_eq!(all, ["{A: 1}", "{A: 2}", "{B: 1}", "{A: 1, B: 1}", "{A: 2, B: 1}"]);
/// ```
#[derive(Clone, Debug)]
pub struct ModelPoolCombinations {
    models: Vec<ResourceModel>,
    bounds: Vec<u32>,
    counters: Vec<u32>,
    step: u32,
    exhausted: bool,
}

impl ModelPoolCombinations {
    /// Enumerates the sub-pools of `bound` with a step of one.
    #[inline]
    pub fn new(bound: &ModelPool) -> Self {
        Self::with_step(bound, 1)
    }

    /// Enumerates the sub-pools of `bound`, advancing each digit by `step`.
    ///
    /// A `step` of zero is treated as one. Zero entries of `bound` are ignored.
    pub fn with_step(bound: &ModelPool, step: u32) -> Self {
        let (models, bounds): (Vec<_>, Vec<_>) = bound
            .iter()
            .filter(|&(_, count)| count > 0)
            .map(|(model, count)| (model.clone(), count))
            .unzip();
        let counters = vec![0; models.len()];
        let exhausted = models.is_empty();
        Self {
            models,
            bounds,
            counters,
            step: step.max(1),
            exhausted,
        }
    }

    #[inline]
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Restarts the enumeration from the first combination.
    pub fn reset(&mut self) {
        self.counters.iter_mut().for_each(|c| *c = 0);
        self.exhausted = self.models.is_empty();
    }

    /// Returns the total number of combinations the enumeration yields, or
    /// `None` if the count overflows `u64`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use muster_model::{combination::ModelPoolCombinations, pool::ModelPool};
    ///
    /// let pool = ModelPool::from_iter([("A".into(), 5), ("B".into(), 1)]);
    /// assert_eq!(ModelPoolCombinations::new(&pool).total(), Some(11));
    /// // A takes 0, 2, 4, 5 and B takes 0, 1.
    /// assert_eq!(ModelPoolCombinations::with_step(&pool, 2).total(), Some(7));
    /// ```
    pub fn total(&self) -> Option<u64> {
        if self.models.is_empty() {
            return Some(0);
        }
        let step = self.step as u64;
        let product = self.bounds.iter().try_fold(1u64, |acc, &bound| {
            let values = (bound as u64).div_ceil(step) + 1;
            acc.checked_mul(values)
        })?;
        Some(product - 1)
    }

    fn current(&self) -> ModelPool {
        self.models
            .iter()
            .zip(&self.counters)
            .filter(|&(_, &count)| count > 0)
            .map(|(model, &count)| (model.clone(), count))
            .collect()
    }

    /// Advances the odometer; returns `false` once it wraps back to all zeros.
    fn advance(&mut self) -> bool {
        for (counter, &bound) in self.counters.iter_mut().zip(&self.bounds) {
            if *counter == bound {
                *counter = 0;
                continue;
            }
            *counter = counter.saturating_add(self.step).min(bound);
            return true;
        }
        false
    }
}

impl Iterator for ModelPoolCombinations {
    type Item = ModelPool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        if !self.advance() {
            self.exhausted = true;
            return None;
        }
        Some(self.current())
    }
}

impl FusedIterator for ModelPoolCombinations {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn pool(entries: &[(&str, u32)]) -> ModelPool {
        entries
            .iter()
            .map(|&(id, count)| (ResourceModel::new(id), count))
            .collect()
    }

    #[test]
    fn test_order_is_odometer_with_first_model_lowest() {
        let combos: Vec<_> = ModelPoolCombinations::new(&pool(&[("A", 2), ("B", 1)])).collect();
        assert_eq!(
            combos,
            vec![
                pool(&[("A", 1)]),
                pool(&[("A", 2)]),
                pool(&[("B", 1)]),
                pool(&[("A", 1), ("B", 1)]),
                pool(&[("A", 2), ("B", 1)]),
            ]
        );
    }

    #[test]
    fn test_no_duplicates_and_total_matches() {
        let bound = pool(&[("A", 3), ("B", 2), ("C", 1)]);
        let combos: Vec<_> = ModelPoolCombinations::new(&bound).collect();
        let unique: BTreeSet<_> = combos.iter().cloned().collect();
        assert_eq!(unique.len(), combos.len());
        assert_eq!(combos.len() as u64, ModelPoolCombinations::new(&bound).total().unwrap());
        assert!(combos.iter().all(|c| c.is_subset_of(&bound) && !c.is_empty()));
    }

    #[test]
    fn test_step_clamps_last_value() {
        let combos: Vec<_> = ModelPoolCombinations::with_step(&pool(&[("A", 5)]), 2).collect();
        assert_eq!(combos, vec![pool(&[("A", 2)]), pool(&[("A", 4)]), pool(&[("A", 5)])]);
    }

    #[test]
    fn test_zero_step_behaves_like_one() {
        let it = ModelPoolCombinations::with_step(&pool(&[("A", 2)]), 0);
        assert_eq!(it.step(), 1);
        assert_eq!(it.count(), 2);
    }

    #[test]
    fn test_empty_and_zero_bounds() {
        assert_eq!(ModelPoolCombinations::new(&ModelPool::new()).next(), None);
        assert_eq!(ModelPoolCombinations::new(&ModelPool::new()).total(), Some(0));

        let mut bound = pool(&[("A", 1)]);
        bound.set_count(ResourceModel::new("B"), 0);
        let combos: Vec<_> = ModelPoolCombinations::new(&bound).collect();
        assert_eq!(combos, vec![pool(&[("A", 1)])]);
    }

    #[test]
    fn test_reset_and_clone_restart() {
        let mut it = ModelPoolCombinations::new(&pool(&[("A", 2)]));
        let snapshot = it.clone();
        assert_eq!(it.by_ref().count(), 2);
        assert_eq!(it.next(), None);

        it.reset();
        assert_eq!(it.next(), Some(pool(&[("A", 1)])));
        assert_eq!(snapshot.count(), 2);
    }

    #[test]
    fn test_total_overflow_is_none() {
        let bound: ModelPool = (0..8)
            .map(|i| (ResourceModel::new(format!("M{i}")), u32::MAX))
            .collect();
        assert_eq!(ModelPoolCombinations::new(&bound).total(), None);
    }
}
