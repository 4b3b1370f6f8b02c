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

//! The functionality mapping.
//!
//! A `FunctionalityMapping` records, for one resource pool, which
//! sub-pools support which functionalities. Both directions are kept:
//! functionality to supporting combinations and combination to the
//! functionalities it supports.

use crate::error::MappingError;
use muster_model::{combination::ModelPoolCombinations, pool::ModelPool, resource::Functionality};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionalityMapping {
    model_pool: ModelPool,
    functionalities: Vec<Functionality>,
    saturation_bound: ModelPool,
    by_functionality: BTreeMap<Functionality, BTreeSet<ModelPool>>,
    by_pool: BTreeMap<ModelPool, BTreeSet<Functionality>>,
}

impl FunctionalityMapping {
    /// Creates an empty mapping. `functionalities` is sorted and
    /// deduplicated; each starts with no supporting combination.
    pub fn new<I>(model_pool: ModelPool, functionalities: I, saturation_bound: ModelPool) -> Self
    where
        I: IntoIterator<Item = Functionality>,
    {
        let by_functionality: BTreeMap<_, _> = functionalities
            .into_iter()
            .map(|f| (f, BTreeSet::new()))
            .collect();
        Self {
            model_pool: model_pool.compacted(),
            functionalities: by_functionality.keys().cloned().collect(),
            saturation_bound: saturation_bound.compacted(),
            by_functionality,
            by_pool: BTreeMap::new(),
        }
    }

    /// Records that `pool` supports `functionality`.
    ///
    /// Returns `Ok(false)` if the pair was already recorded.
    ///
    /// # Errors
    ///
    /// `UnknownFunctionality` if `functionality` is not part of the mapping.
    pub fn add(&mut self, functionality: Functionality, pool: ModelPool) -> Result<bool, MappingError> {
        let pool = pool.compacted();
        let Some(pools) = self.by_functionality.get_mut(&functionality) else {
            return Err(MappingError::UnknownFunctionality(functionality));
        };
        if !pools.insert(pool.clone()) {
            return Ok(false);
        }
        self.by_pool.entry(pool).or_default().insert(functionality);
        Ok(true)
    }

    /// Returns the combinations that support `functionality`.
    pub fn get_model_pools(
        &self,
        functionality: &Functionality,
    ) -> Result<&BTreeSet<ModelPool>, MappingError> {
        self.by_functionality
            .get(functionality)
            .ok_or_else(|| MappingError::UnknownFunctionality(functionality.clone()))
    }

    /// Returns every functionality that some recorded combination contained
    /// in `pool` supports.
    pub fn get_functionalities(&self, pool: &ModelPool) -> BTreeSet<Functionality> {
        self.by_pool
            .iter()
            .filter(|(combination, _)| combination.is_subset_of(pool))
            .flat_map(|(_, functionalities)| functionalities.iter().cloned())
            .collect()
    }

    /// Returns `true` if at least one combination supports `functionality`.
    #[inline]
    pub fn is_supported(&self, functionality: &Functionality) -> bool {
        self.by_functionality
            .get(functionality)
            .is_some_and(|pools| !pools.is_empty())
    }

    #[inline]
    pub fn functionalities(&self) -> &[Functionality] {
        &self.functionalities
    }

    #[inline]
    pub fn model_pool(&self) -> &ModelPool {
        &self.model_pool
    }

    #[inline]
    pub fn saturation_bound(&self) -> &ModelPool {
        &self.saturation_bound
    }

    /// Returns an enumerator over the combinations below the saturation bound.
    #[inline]
    pub fn combinations(&self) -> ModelPoolCombinations {
        ModelPoolCombinations::new(&self.saturation_bound)
    }

    /// Returns the number of recorded `(functionality, combination)` pairs.
    #[inline]
    pub fn num_supports(&self) -> usize {
        self.by_functionality.values().map(BTreeSet::len).sum()
    }

    /// Iterates over the functionalities and their supporting combinations.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&Functionality, &BTreeSet<ModelPool>)> {
        self.by_functionality.iter()
    }
}

impl std::fmt::Display for FunctionalityMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Functionality Mapping:")?;
        writeln!(f, "  Model pool:       {}", self.model_pool)?;
        writeln!(f, "  Saturation bound: {}", self.saturation_bound)?;
        for (functionality, pools) in &self.by_functionality {
            writeln!(f, "  {}: {} combination(s)", functionality, pools.len())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muster_model::resource::ResourceModel;

    fn m(id: &str) -> ResourceModel {
        ResourceModel::new(id)
    }

    fn pool(entries: &[(&str, u32)]) -> ModelPool {
        entries.iter().map(|&(id, n)| (m(id), n)).collect()
    }

    fn mapping() -> FunctionalityMapping {
        FunctionalityMapping::new(
            pool(&[("A", 2), ("B", 1)]),
            [m("G"), m("F"), m("G")],
            pool(&[("A", 2), ("B", 1)]),
        )
    }

    #[test]
    fn test_new_sorts_and_dedups_functionalities() {
        let mapping = mapping();
        assert_eq!(mapping.functionalities(), &[m("F"), m("G")]);
        assert!(mapping.get_model_pools(&m("F")).unwrap().is_empty());
        assert!(!mapping.is_supported(&m("F")));
    }

    #[test]
    fn test_add_registers_both_directions() {
        let mut mapping = mapping();
        assert_eq!(mapping.add(m("F"), pool(&[("A", 1)])), Ok(true));
        assert_eq!(mapping.add(m("F"), pool(&[("A", 1), ("B", 0)])), Ok(false));
        assert_eq!(mapping.add(m("G"), pool(&[("A", 1)])), Ok(true));
        assert_eq!(mapping.num_supports(), 2);
        assert!(mapping.is_supported(&m("F")));

        let found = mapping.get_functionalities(&pool(&[("A", 1)]));
        assert_eq!(found, BTreeSet::from([m("F"), m("G")]));
    }

    #[test]
    fn test_add_rejects_unknown_functionality() {
        let mut mapping = mapping();
        assert_eq!(
            mapping.add(m("H"), pool(&[("A", 1)])),
            Err(MappingError::UnknownFunctionality(m("H")))
        );
        assert_eq!(
            mapping.get_model_pools(&m("H")),
            Err(MappingError::UnknownFunctionality(m("H")))
        );
    }

    #[test]
    fn test_get_functionalities_uses_subset_matching() {
        let mut mapping = mapping();
        mapping.add(m("F"), pool(&[("A", 2)])).unwrap();
        mapping.add(m("G"), pool(&[("B", 1)])).unwrap();

        assert!(mapping.get_functionalities(&pool(&[("A", 1)])).is_empty());
        assert_eq!(
            mapping.get_functionalities(&pool(&[("A", 2), ("B", 1)])),
            BTreeSet::from([m("F"), m("G")])
        );
        assert_eq!(
            mapping.get_functionalities(&pool(&[("A", 3)])),
            BTreeSet::from([m("F")])
        );
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let mut a = mapping();
        let mut b = mapping();
        a.add(m("F"), pool(&[("A", 1)])).unwrap();
        a.add(m("F"), pool(&[("B", 1)])).unwrap();
        b.add(m("F"), pool(&[("B", 1)])).unwrap();
        b.add(m("F"), pool(&[("A", 1)])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_combinations_follow_saturation_bound() {
        let mapping = FunctionalityMapping::new(pool(&[("A", 2), ("B", 1)]), [m("F")], pool(&[("A", 1)]));
        let all: Vec<ModelPool> = mapping.combinations().collect();
        assert_eq!(all, vec![pool(&[("A", 1)])]);
    }
}
