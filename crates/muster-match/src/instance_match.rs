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

//! Matching required bounds against concrete resource instances.
//!
//! Each instance is one column offering a single unit, so every allowed cell
//! ranges over `{0, 1}`. No merge step is applied: a necessary check counts
//! the instances that may fill each row before searching.

use crate::{
    branching::smallest_domain::SmallestDomainBuilder,
    engine::MatchSolver,
    error::MatchError,
    monitor::{no_op::NoOperationMonitor, tree_search_monitor::TreeSearchMonitor},
    problem::{self, MatchProblem},
    resource_match::into_solution,
    result::MatchOutcome,
    solution::Solution,
    stats::MatchStatistics,
};
use muster_model::{bound::ModelBound, resource::ResourceInstance, taxonomy::Taxonomy};

pub struct ResourceInstanceMatch<'t, T: ?Sized> {
    taxonomy: &'t T,
}

impl<T: ?Sized> Clone for ResourceInstanceMatch<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for ResourceInstanceMatch<'_, T> {}

impl<T: ?Sized> std::fmt::Debug for ResourceInstanceMatch<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ResourceInstanceMatch")
    }
}

impl<'t, T> ResourceInstanceMatch<'t, T>
where
    T: Taxonomy + ?Sized,
{
    #[inline]
    pub fn new(taxonomy: &'t T) -> Self {
        Self { taxonomy }
    }

    pub fn search<S>(
        &self,
        required: &[ModelBound],
        instances: &[ResourceInstance],
        monitor: S,
    ) -> MatchOutcome
    where
        S: TreeSearchMonitor,
    {
        let coverable = required.iter().all(|row| {
            let candidates = instances
                .iter()
                .filter(|instance| problem::substitutes(self.taxonomy, instance.model(), row.model()))
                .count();
            candidates as u64 >= row.min() as u64
        });
        if !coverable {
            return MatchOutcome::infeasible(MatchStatistics::default());
        }
        let problem = MatchProblem::from_instances(required, instances, self.taxonomy);
        let mut solver = MatchSolver::preallocated(problem.num_cells());
        solver.solve(&problem, &mut SmallestDomainBuilder::new(), monitor)
    }

    #[inline]
    pub fn solve(
        &self,
        required: &[ModelBound],
        instances: &[ResourceInstance],
    ) -> Result<Solution<ResourceInstance>, MatchError> {
        self.solve_with_monitor(required, instances, NoOperationMonitor::new())
    }

    pub fn solve_with_monitor<S>(
        &self,
        required: &[ModelBound],
        instances: &[ResourceInstance],
        monitor: S,
    ) -> Result<Solution<ResourceInstance>, MatchError>
    where
        S: TreeSearchMonitor,
    {
        let outcome = self.search(required, instances, monitor);
        into_solution(outcome, required, instances)
    }

    #[inline]
    pub fn is_supporting(&self, required: &[ModelBound], instances: &[ResourceInstance]) -> bool {
        self.solve(required, instances).is_ok()
    }
}
