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

use muster_model::{pool::ModelPool, resource::Functionality};
use rustc_hash::FxHashMap;

/// Memoized support decisions keyed by `(pool, functionality)`.
///
/// A cache is only meaningful for one taxonomy; callers that switch
/// taxonomies must `clear()` it. Hit and miss counters survive `clear()`
/// until `reset_counters()` is called.
#[derive(Debug, Clone, Default)]
pub struct SupportCache {
    entries: FxHashMap<(ModelPool, Functionality), bool>,
    hits: u64,
    misses: u64,
}

impl SupportCache {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a decision and updates the hit/miss counters.
    pub fn lookup(&mut self, pool: &ModelPool, functionality: &Functionality) -> Option<bool> {
        // the tuple key needs owned parts
        let found = self
            .entries
            .get(&(pool.clone(), functionality.clone()))
            .copied();
        match found {
            Some(_) => self.hits += 1,
            None => self.misses += 1,
        }
        found
    }

    #[inline]
    pub fn insert(&mut self, pool: ModelPool, functionality: Functionality, supported: bool) {
        self.entries.insert((pool, functionality), supported);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Drops every memoized decision.
    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn reset_counters(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muster_model::resource::ResourceModel;

    #[test]
    fn test_lookup_insert_clear() {
        let mut cache = SupportCache::new();
        let pool = ModelPool::from_iter([(ResourceModel::new("A"), 1)]);
        let f = ResourceModel::new("F");

        assert_eq!(cache.lookup(&pool, &f), None);
        cache.insert(pool.clone(), f.clone(), true);
        assert_eq!(cache.lookup(&pool, &f), Some(true));
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.lookup(&pool, &f), None);
        cache.reset_counters();
        assert_eq!((cache.hits(), cache.misses()), (0, 0));
    }
}
