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

//! Matching required bounds against aggregated availability.
//!
//! `ResourceMatch` answers whether a list of available `ModelBound`s can
//! satisfy a list of required ones, honouring subsumption: an available
//! `StereoCamera` may fill a required `Camera` slot.
//!
//! Before searching, the available counts are merged into every required
//! ancestor model. If even the merged maximum of a model cannot reach a
//! row's minimum, the requirement is rejected without search. The search
//! itself still uses the declared available bounds as columns, so no unit
//! is counted twice.

use crate::{
    branching::smallest_domain::SmallestDomainBuilder,
    engine::MatchSolver,
    error::MatchError,
    monitor::{no_op::NoOperationMonitor, tree_search_monitor::TreeSearchMonitor},
    problem::{self, MatchProblem},
    result::{MatchOutcome, MatchResult},
    solution::Solution,
    stats::MatchStatistics,
};
use muster_model::{bound::ModelBound, resource::ResourceModel, taxonomy::Taxonomy};
use std::collections::BTreeSet;
use tracing::trace;

pub struct ResourceMatch<'t, T: ?Sized> {
    taxonomy: &'t T,
}

impl<T: ?Sized> Clone for ResourceMatch<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for ResourceMatch<'_, T> {}

impl<T: ?Sized> std::fmt::Debug for ResourceMatch<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ResourceMatch")
    }
}

impl<'t, T> ResourceMatch<'t, T>
where
    T: Taxonomy + ?Sized,
{
    #[inline]
    pub fn new(taxonomy: &'t T) -> Self {
        Self { taxonomy }
    }

    #[inline]
    pub fn taxonomy(&self) -> &'t T {
        self.taxonomy
    }

    /// Merges the available bounds into every model referenced by `required`.
    ///
    /// For each required model `R`, the result holds one bound `(R, Σ min, Σ max)`
    /// over all available bounds whose model is `R` or a subtype of `R`.
    /// Required models without any such offer are omitted.
    pub fn merged_availability(
        &self,
        required: &[ModelBound],
        available: &[ModelBound],
    ) -> Vec<ModelBound> {
        let models: BTreeSet<&ResourceModel> = required.iter().map(ModelBound::model).collect();
        let contributions = models.into_iter().flat_map(|model| {
            available
                .iter()
                .filter(move |offer| problem::substitutes(self.taxonomy, offer.model(), model))
                .filter_map(move |offer| ModelBound::new(model.clone(), offer.min(), offer.max()).ok())
        });
        ModelBound::accumulate_by_model(contributions)
    }

    /// Returns `false` if some required row cannot be covered even by the
    /// merged availability.
    fn passes_merged_check(&self, required: &[ModelBound], available: &[ModelBound]) -> bool {
        let merged = self.merged_availability(required, available);
        required.iter().all(|row| {
            let offered = merged
                .iter()
                .find(|bound| bound.model() == row.model())
                .map_or(0, ModelBound::max);
            offered >= row.min()
        })
    }

    /// Runs the search and returns the raw outcome, statistics included.
    pub fn search<S>(
        &self,
        required: &[ModelBound],
        available: &[ModelBound],
        monitor: S,
    ) -> MatchOutcome
    where
        S: TreeSearchMonitor,
    {
        if !self.passes_merged_check(required, available) {
            trace!(
                rows = required.len(),
                cols = available.len(),
                "requirement rejected by merged availability"
            );
            return MatchOutcome::infeasible(MatchStatistics::default());
        }
        let problem = MatchProblem::from_bounds(required, available, self.taxonomy);
        let mut solver = MatchSolver::preallocated(problem.num_cells());
        solver.solve(&problem, &mut SmallestDomainBuilder::new(), monitor)
    }

    /// Finds an assignment of `available` to `required`.
    #[inline]
    pub fn solve(
        &self,
        required: &[ModelBound],
        available: &[ModelBound],
    ) -> Result<Solution<ModelBound>, MatchError> {
        self.solve_with_monitor(required, available, NoOperationMonitor::new())
    }

    /// Finds an assignment while reporting to `monitor`. A termination
    /// request from the monitor surfaces as `MatchError::Aborted`.
    pub fn solve_with_monitor<S>(
        &self,
        required: &[ModelBound],
        available: &[ModelBound],
        monitor: S,
    ) -> Result<Solution<ModelBound>, MatchError>
    where
        S: TreeSearchMonitor,
    {
        let outcome = self.search(required, available, monitor);
        into_solution(outcome, required, available)
    }

    /// Returns `true` if `available` can satisfy `required`.
    #[inline]
    pub fn is_supporting(&self, required: &[ModelBound], available: &[ModelBound]) -> bool {
        self.solve(required, available).is_ok()
    }
}

/// Converts a search outcome into the public result type.
pub(crate) fn into_solution<C>(
    outcome: MatchOutcome,
    required: &[ModelBound],
    columns: &[C],
) -> Result<Solution<C>, MatchError>
where
    C: Clone,
{
    let reason = outcome.termination_reason().clone();
    match outcome.into_result() {
        MatchResult::Feasible(assignment) => {
            Ok(Solution::from_assignment(required, columns, &assignment))
        }
        MatchResult::Infeasible => Err(MatchError::Infeasible),
        MatchResult::Unknown => Err(MatchError::Aborted(reason.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::RowIndex;
    use muster_model::taxonomy::{InMemoryTaxonomy, TaxonomyBuilder};

    fn m(id: &str) -> ResourceModel {
        ResourceModel::new(id)
    }

    fn bound(id: &str, min: u32, max: u32) -> ModelBound {
        ModelBound::new(m(id), min, max).unwrap()
    }

    fn taxonomy() -> InMemoryTaxonomy {
        let mut b = TaxonomyBuilder::new();
        b.add_subtype(m("StereoCamera"), m("Camera"))
            .add_subtype(m("Camera"), m("Sensor"))
            .add_subtype(m("Lidar"), m("Sensor"));
        b.build()
    }

    #[test]
    fn test_subtype_fills_ancestor_requirement() {
        let t = taxonomy();
        let rm = ResourceMatch::new(&t);
        let required = [bound("Camera", 2, 2)];
        let available = [bound("StereoCamera", 0, 3)];
        let solution = rm.solve(&required, &available).unwrap();
        assert_eq!(solution.row(RowIndex::new(0)), &[(available[0].clone(), 2)]);
        assert!(rm.is_supporting(&required, &available));
    }

    #[test]
    fn test_merged_availability_adds_subtypes() {
        let t = taxonomy();
        let rm = ResourceMatch::new(&t);
        let required = [bound("Sensor", 1, 4), bound("Camera", 1, 1)];
        let available = [bound("StereoCamera", 0, 3), bound("Lidar", 1, 2), bound("Arm", 0, 1)];
        let merged = rm.merged_availability(&required, &available);
        assert_eq!(merged, vec![bound("Camera", 0, 3), bound("Sensor", 1, 5)]);
    }

    #[test]
    fn test_supertype_does_not_fill_subtype_requirement() {
        let t = taxonomy();
        let rm = ResourceMatch::new(&t);
        let required = [bound("StereoCamera", 1, 1)];
        let available = [bound("Camera", 0, 5)];
        assert_eq!(rm.solve(&required, &available), Err(MatchError::Infeasible));
    }

    #[test]
    fn test_units_are_not_counted_twice() {
        let t = taxonomy();
        let rm = ResourceMatch::new(&t);
        // both rows draw from the same two stereo cameras
        let required = [bound("Camera", 2, 2), bound("Sensor", 1, 1)];
        let available = [bound("StereoCamera", 0, 2)];
        assert!(!rm.is_supporting(&required, &available));

        let available = [bound("StereoCamera", 0, 2), bound("Lidar", 0, 1)];
        let solution = rm.solve(&required, &available).unwrap();
        assert_eq!(solution.assigned(RowIndex::new(0)), 2);
        assert_eq!(solution.assigned(RowIndex::new(1)), 1);
    }

    #[test]
    fn test_empty_requirement_is_supported() {
        let t = taxonomy();
        let rm = ResourceMatch::new(&t);
        let solution = rm.solve(&[], &[bound("Lidar", 0, 1)]).unwrap();
        assert!(solution.is_empty());
    }

    #[test]
    fn test_merged_check_short_circuits() {
        let t = taxonomy();
        let rm = ResourceMatch::new(&t);
        let outcome = rm.search(
            &[bound("Camera", 4, 4)],
            &[bound("StereoCamera", 0, 3)],
            NoOperationMonitor::new(),
        );
        assert_eq!(outcome.result(), &MatchResult::Infeasible);
        assert_eq!(outcome.statistics().nodes_explored, 0);
    }
}
