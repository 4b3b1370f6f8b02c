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

//! Tree search monitoring interface
//!
//! Lifecycle: enter → step → {descend | prune | backtrack} → solution → exit.
//! `MatchStatistics` is passed to every callback. Methods take `&mut self`;
//! a monitor belongs to exactly one search.

use crate::{
    branching::decision::Decision, problem::MatchProblem, result::Assignment,
    state::SearchState, stats::MatchStatistics,
};
use muster_search::monitor::search_monitor::SearchCommand;

/// Why a node was closed without descending further.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PruneReason {
    /// A row can no longer reach its minimum.
    RowDeficit,
    /// A column is committed beyond its maximum.
    ColumnExcess,
    /// The decision did not intersect the current domain.
    EmptyDomain,
}

impl std::fmt::Display for PruneReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PruneReason::RowDeficit => write!(f, "RowDeficit"),
            PruneReason::ColumnExcess => write!(f, "ColumnExcess"),
            PruneReason::EmptyDomain => write!(f, "EmptyDomain"),
        }
    }
}

pub trait TreeSearchMonitor {
    fn name(&self) -> &str;

    fn on_enter_search(&mut self, problem: &MatchProblem, statistics: &MatchStatistics);

    fn on_exit_search(&mut self, statistics: &MatchStatistics);

    /// Called once per loop iteration to ask whether the search may continue.
    fn search_command(
        &mut self,
        _state: &SearchState,
        _statistics: &MatchStatistics,
    ) -> SearchCommand {
        SearchCommand::Continue
    }

    fn on_step(&mut self, state: &SearchState, statistics: &MatchStatistics);

    fn on_prune(&mut self, state: &SearchState, reason: PruneReason, statistics: &MatchStatistics);

    fn on_decisions_enqueued(
        &mut self,
        state: &SearchState,
        count: usize,
        statistics: &MatchStatistics,
    );

    fn on_descend(&mut self, state: &SearchState, decision: Decision, statistics: &MatchStatistics);

    fn on_backtrack(&mut self, state: &SearchState, statistics: &MatchStatistics);

    fn on_solution_found(&mut self, assignment: &Assignment, statistics: &MatchStatistics);
}

impl<M> TreeSearchMonitor for &mut M
where
    M: TreeSearchMonitor + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_enter_search(&mut self, problem: &MatchProblem, statistics: &MatchStatistics) {
        (**self).on_enter_search(problem, statistics)
    }

    fn on_exit_search(&mut self, statistics: &MatchStatistics) {
        (**self).on_exit_search(statistics)
    }

    fn search_command(&mut self, state: &SearchState, statistics: &MatchStatistics) -> SearchCommand {
        (**self).search_command(state, statistics)
    }

    fn on_step(&mut self, state: &SearchState, statistics: &MatchStatistics) {
        (**self).on_step(state, statistics)
    }

    fn on_prune(&mut self, state: &SearchState, reason: PruneReason, statistics: &MatchStatistics) {
        (**self).on_prune(state, reason, statistics)
    }

    fn on_decisions_enqueued(
        &mut self,
        state: &SearchState,
        count: usize,
        statistics: &MatchStatistics,
    ) {
        (**self).on_decisions_enqueued(state, count, statistics)
    }

    fn on_descend(&mut self, state: &SearchState, decision: Decision, statistics: &MatchStatistics) {
        (**self).on_descend(state, decision, statistics)
    }

    fn on_backtrack(&mut self, state: &SearchState, statistics: &MatchStatistics) {
        (**self).on_backtrack(state, statistics)
    }

    fn on_solution_found(&mut self, assignment: &Assignment, statistics: &MatchStatistics) {
        (**self).on_solution_found(assignment, statistics)
    }
}

impl std::fmt::Debug for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}
