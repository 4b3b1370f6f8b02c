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

use crate::resource::{CardinalityRestriction, Functionality, ResourceModel};
use rustc_hash::{FxHashMap, FxHashSet};
use std::{collections::BTreeSet, sync::Arc};

/// The read-only view of a model taxonomy the matching engine needs.
///
/// Implementations must be safe to share across solver threads.
pub trait Taxonomy: Send + Sync {
    /// Returns `true` if `model` is `ancestor` or a (transitive) subtype of it.
    fn is_subtype_of(&self, model: &ResourceModel, ancestor: &ResourceModel) -> bool;

    /// Returns the restrictions declared by a model or a functionality.
    ///
    /// For a functionality these are its requirements; for a resource model
    /// they are the sub-resources each instance offers.
    fn cardinality_restrictions(&self, id: &ResourceModel) -> Vec<CardinalityRestriction>;

    /// Returns every known functionality, in a deterministic order.
    fn all_functionalities(&self) -> Vec<Functionality>;
}

impl<T> Taxonomy for &T
where
    T: Taxonomy + ?Sized,
{
    #[inline]
    fn is_subtype_of(&self, model: &ResourceModel, ancestor: &ResourceModel) -> bool {
        (**self).is_subtype_of(model, ancestor)
    }

    #[inline]
    fn cardinality_restrictions(&self, id: &ResourceModel) -> Vec<CardinalityRestriction> {
        (**self).cardinality_restrictions(id)
    }

    #[inline]
    fn all_functionalities(&self) -> Vec<Functionality> {
        (**self).all_functionalities()
    }
}

impl<T> Taxonomy for Arc<T>
where
    T: Taxonomy + ?Sized,
{
    #[inline]
    fn is_subtype_of(&self, model: &ResourceModel, ancestor: &ResourceModel) -> bool {
        (**self).is_subtype_of(model, ancestor)
    }

    #[inline]
    fn cardinality_restrictions(&self, id: &ResourceModel) -> Vec<CardinalityRestriction> {
        (**self).cardinality_restrictions(id)
    }

    #[inline]
    fn all_functionalities(&self) -> Vec<Functionality> {
        (**self).all_functionalities()
    }
}

/// An immutable taxonomy held in memory, with the subsumption closure
/// computed at build time.
///
/// Construction:
/// - Use `TaxonomyBuilder` and call `TaxonomyBuilder::build`, or load a text
///   description with `TaxonomyLoader`.
#[derive(Clone, Debug, Default)]
pub struct InMemoryTaxonomy {
    ancestors: FxHashMap<ResourceModel, FxHashSet<ResourceModel>>,
    restrictions: FxHashMap<ResourceModel, Vec<CardinalityRestriction>>,
    functionalities: Vec<Functionality>,
    models: Vec<ResourceModel>,
}

impl InMemoryTaxonomy {
    /// Returns the strict ancestors of `model`, sorted.
    pub fn ancestors_of(&self, model: &ResourceModel) -> Vec<ResourceModel> {
        let mut ancestors: Vec<_> = self
            .ancestors
            .get(model)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        ancestors.sort();
        ancestors
    }

    /// Returns every model that appears in a subtype statement, a restriction,
    /// or an explicit declaration, sorted.
    #[inline]
    pub fn models(&self) -> &[ResourceModel] {
        &self.models
    }

    #[inline]
    pub fn is_functionality(&self, id: &ResourceModel) -> bool {
        self.functionalities.binary_search(id).is_ok()
    }

    #[inline]
    pub fn num_functionalities(&self) -> usize {
        self.functionalities.len()
    }
}

impl Taxonomy for InMemoryTaxonomy {
    fn is_subtype_of(&self, model: &ResourceModel, ancestor: &ResourceModel) -> bool {
        model == ancestor
            || self
                .ancestors
                .get(model)
                .is_some_and(|set| set.contains(ancestor))
    }

    fn cardinality_restrictions(&self, id: &ResourceModel) -> Vec<CardinalityRestriction> {
        self.restrictions.get(id).cloned().unwrap_or_default()
    }

    fn all_functionalities(&self) -> Vec<Functionality> {
        self.functionalities.clone()
    }
}

/// A mutable builder for `InMemoryTaxonomy`.
///
/// # Examples
///
/// ```rust
/// # use muster_model::{resource::ResourceModel, taxonomy::{Taxonomy, TaxonomyBuilder}};
///
/// let camera = ResourceModel::new("Camera");
/// let stereo = ResourceModel::new("StereoCamera");
/// let mut builder = TaxonomyBuilder::new();
/// builder.add_subtype(stereo.clone(), camera.clone());
/// let taxonomy = builder.build();
/// assert!(taxonomy.is_subtype_of(&stereo, &camera));
/// assert!(!taxonomy.is_subtype_of(&camera, &stereo));
/// ```
#[derive(Clone, Debug, Default)]
pub struct TaxonomyBuilder {
    parents: FxHashMap<ResourceModel, Vec<ResourceModel>>,
    restrictions: FxHashMap<ResourceModel, Vec<CardinalityRestriction>>,
    functionalities: BTreeSet<Functionality>,
    models: BTreeSet<ResourceModel>,
}

impl TaxonomyBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a resource model without relations.
    pub fn add_model(&mut self, model: ResourceModel) -> &mut Self {
        self.models.insert(model);
        self
    }

    /// Declares `child` a direct subtype of `parent`.
    pub fn add_subtype(&mut self, child: ResourceModel, parent: ResourceModel) -> &mut Self {
        self.models.insert(child.clone());
        self.models.insert(parent.clone());
        self.parents.entry(child).or_default().push(parent);
        self
    }

    /// Declares a functionality.
    pub fn add_functionality(&mut self, functionality: Functionality) -> &mut Self {
        self.functionalities.insert(functionality);
        self
    }

    /// Adds a restriction owned by a model or a functionality.
    pub fn add_restriction(
        &mut self,
        owner: ResourceModel,
        restriction: CardinalityRestriction,
    ) -> &mut Self {
        self.models.insert(restriction.model.clone());
        self.restrictions.entry(owner).or_default().push(restriction);
        self
    }

    #[inline]
    pub fn is_declared(&self, id: &ResourceModel) -> bool {
        self.models.contains(id) || self.functionalities.contains(id)
    }

    /// Computes the subsumption closure and freezes the taxonomy.
    ///
    /// Cycles in the subtype relation are tolerated; every member of a cycle
    /// becomes an ancestor of the others.
    pub fn build(self) -> InMemoryTaxonomy {
        let mut ancestors: FxHashMap<ResourceModel, FxHashSet<ResourceModel>> =
            FxHashMap::default();

        for start in self.parents.keys() {
            let mut seen: FxHashSet<ResourceModel> = FxHashSet::default();
            let mut stack: Vec<&ResourceModel> = self.parents[start].iter().collect();
            while let Some(current) = stack.pop() {
                if current == start || !seen.insert(current.clone()) {
                    continue;
                }
                if let Some(next) = self.parents.get(current) {
                    stack.extend(next.iter());
                }
            }
            ancestors.insert(start.clone(), seen);
        }

        let mut models: BTreeSet<ResourceModel> = self.models;
        models.extend(
            self.restrictions
                .keys()
                .filter(|owner| !self.functionalities.contains(*owner))
                .cloned(),
        );

        InMemoryTaxonomy {
            ancestors,
            restrictions: self.restrictions,
            functionalities: self.functionalities.into_iter().collect(),
            models: models.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(id: &str) -> ResourceModel {
        ResourceModel::new(id)
    }

    fn sample() -> InMemoryTaxonomy {
        let mut builder = TaxonomyBuilder::new();
        builder
            .add_subtype(m("StereoCamera"), m("Camera"))
            .add_subtype(m("Camera"), m("Sensor"))
            .add_subtype(m("Lidar"), m("Sensor"))
            .add_functionality(m("ImageProvider"))
            .add_functionality(m("Mapping"))
            .add_restriction(
                m("ImageProvider"),
                CardinalityRestriction::new(m("Camera"), 1, None),
            )
            .add_restriction(
                m("Sherpa"),
                CardinalityRestriction::new(m("StereoCamera"), 0, Some(2)),
            );
        builder.build()
    }

    #[test]
    fn test_subtype_is_reflexive_and_transitive() {
        let t = sample();
        assert!(t.is_subtype_of(&m("Camera"), &m("Camera")));
        assert!(t.is_subtype_of(&m("Unknown"), &m("Unknown")));
        assert!(t.is_subtype_of(&m("StereoCamera"), &m("Sensor")));
        assert!(!t.is_subtype_of(&m("Sensor"), &m("Camera")));
        assert!(!t.is_subtype_of(&m("Lidar"), &m("Camera")));
    }

    #[test]
    fn test_ancestors_sorted() {
        let t = sample();
        assert_eq!(t.ancestors_of(&m("StereoCamera")), vec![m("Camera"), m("Sensor")]);
        assert!(t.ancestors_of(&m("Sensor")).is_empty());
    }

    #[test]
    fn test_cycle_does_not_hang() {
        let mut builder = TaxonomyBuilder::new();
        builder
            .add_subtype(m("A"), m("B"))
            .add_subtype(m("B"), m("A"));
        let t = builder.build();
        assert!(t.is_subtype_of(&m("A"), &m("B")));
        assert!(t.is_subtype_of(&m("B"), &m("A")));
        assert_eq!(t.ancestors_of(&m("A")), vec![m("B")]);
    }

    #[test]
    fn test_restrictions_and_functionalities() {
        let t = sample();
        assert_eq!(t.all_functionalities(), vec![m("ImageProvider"), m("Mapping")]);
        assert!(t.is_functionality(&m("Mapping")));
        assert!(!t.is_functionality(&m("Camera")));
        assert_eq!(t.cardinality_restrictions(&m("ImageProvider")).len(), 1);
        assert!(t.cardinality_restrictions(&m("Mapping")).is_empty());
    }

    #[test]
    fn test_models_include_restriction_owners() {
        let t = sample();
        assert!(t.models().contains(&m("Sherpa")));
        assert!(!t.models().contains(&m("ImageProvider")));
    }

    #[test]
    fn test_blanket_impls_forward() {
        let t = Arc::new(sample());
        fn check<T: Taxonomy>(t: T) -> bool {
            t.is_subtype_of(&ResourceModel::new("Camera"), &ResourceModel::new("Sensor"))
        }
        assert!(check(&*t));
        assert!(check(t.clone()));
    }
}
