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

//! Depth-first search for a feasible assignment.
//!
//! `MatchSolver` owns the reusable trail and decision stack; each call to
//! `solve` runs a fresh `MatchSearchSession` that owns the domains of that
//! run. The search is first-solution: it stops at the first node whose
//! lower bounds already satisfy every row and column.
//!
//! Each node is processed as follows:
//! 1. Push a trail frame and a stack frame.
//! 2. Narrow the decided cell and propagate to a fixpoint.
//! 3. On conflict, undo the frame; on success check for a solution, else
//!    ask the `DecisionBuilder` for the children of the node.

use crate::{
    branching::decision::{Decision, DecisionBuilder},
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    problem::MatchProblem,
    propagation::{self, Conflict},
    result::{Assignment, MatchOutcome},
    stack::SearchStack,
    state::SearchState,
    stats::MatchStatistics,
    trail::SearchTrail,
};
use muster_search::{monitor::search_monitor::SearchCommand, result::TerminationReason};

#[derive(Clone, Debug, Default)]
pub struct MatchSolver {
    trail: SearchTrail,
    stack: SearchStack,
}

impl MatchSolver {
    #[inline]
    pub fn new() -> Self {
        Self {
            trail: SearchTrail::new(),
            stack: SearchStack::new(),
        }
    }

    /// Creates a solver whose buffers already fit `num_cells` cells.
    #[inline]
    pub fn preallocated(num_cells: usize) -> Self {
        Self {
            trail: SearchTrail::preallocated(num_cells),
            stack: SearchStack::preallocated(num_cells),
        }
    }

    /// Searches `problem` for a feasible assignment.
    pub fn solve<B, S>(
        &mut self,
        problem: &MatchProblem,
        builder: &mut B,
        mut monitor: S,
    ) -> MatchOutcome
    where
        B: DecisionBuilder,
        S: TreeSearchMonitor,
    {
        let session = MatchSearchSession::new(self, problem, builder, &mut monitor);
        let outcome = session.run();
        self.reset();
        outcome
    }

    #[inline]
    fn reset(&mut self) {
        self.trail.reset();
        self.stack.reset();
    }
}

/// The state and logic of a single search run.
struct MatchSearchSession<'a, B, S> {
    solver: &'a mut MatchSolver,
    problem: &'a MatchProblem,
    builder: &'a mut B,
    monitor: &'a mut S,
    state: SearchState,
    solution: Option<Assignment>,
    stats: MatchStatistics,
    start_time: std::time::Instant,
}

impl<B, S> std::fmt::Debug for MatchSearchSession<'_, B, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchSearchSession")
            .field("problem", &self.problem)
            .field("state", &self.state)
            .field("solution", &self.solution)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, B, S> MatchSearchSession<'a, B, S>
where
    B: DecisionBuilder,
    S: TreeSearchMonitor,
{
    fn new(
        solver: &'a mut MatchSolver,
        problem: &'a MatchProblem,
        builder: &'a mut B,
        monitor: &'a mut S,
    ) -> Self {
        Self {
            solver,
            problem,
            builder,
            monitor,
            state: SearchState::new(problem),
            solution: None,
            stats: MatchStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self) -> MatchOutcome {
        self.monitor.on_enter_search(self.problem, &self.stats);

        if !self.initialize() {
            self.stats.set_total_time(self.start_time.elapsed());
            self.monitor.on_exit_search(&self.stats);
            return self.finalize_result(TerminationReason::InfeasibilityProven);
        }

        let termination_reason = loop {
            if self.solution.is_some() {
                break TerminationReason::FeasibilityProven;
            }

            self.monitor.on_step(&self.state, &self.stats);

            if let SearchCommand::Terminate(msg) =
                self.monitor.search_command(&self.state, &self.stats)
            {
                break TerminationReason::Aborted(msg);
            }

            if self.solver.stack.is_current_level_empty() {
                if self.solver.stack.depth() <= 1 {
                    break TerminationReason::InfeasibilityProven;
                }
                self.backtrack_step();
            } else {
                self.process_next_decision();
            }
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        self.finalize_result(termination_reason)
    }

    fn finalize_result(self, reason: TerminationReason) -> MatchOutcome {
        match (reason, self.solution) {
            (TerminationReason::FeasibilityProven, Some(assignment)) => {
                MatchOutcome::feasible(assignment, self.stats)
            }
            (TerminationReason::Aborted(msg), _) => MatchOutcome::aborted(msg, self.stats),
            _ => MatchOutcome::infeasible(self.stats),
        }
    }

    /// Sets up the root frames and propagates the root node.
    ///
    /// Returns `false` if the root is already infeasible.
    fn initialize(&mut self) -> bool {
        self.solver.trail.push_frame();
        self.solver.stack.push_frame();
        self.stats.on_node_explored();
        self.stats.on_depth_update(1);

        if !self.propagate_node() {
            return false;
        }
        if self.state.is_lower_assignment_feasible(self.problem) {
            self.handle_solution();
            return true;
        }
        self.enqueue_children();
        true
    }

    fn backtrack_step(&mut self) {
        self.stats.on_backtrack();
        self.monitor.on_backtrack(&self.state, &self.stats);

        self.solver.trail.backtrack(&mut self.state);
        self.solver.stack.pop_frame();
    }

    fn process_next_decision(&mut self) {
        let Some(decision) = self.solver.stack.pop() else {
            return;
        };
        self.descend(decision);
    }

    fn descend(&mut self, decision: Decision) {
        self.solver.trail.push_frame();
        self.solver.stack.push_frame();
        self.stats.on_node_explored();
        self.stats.on_depth_update(self.solver.stack.depth() as u64);
        self.monitor.on_descend(&self.state, decision, &self.stats);

        let cell = decision.cell();
        let Some(narrowed) = self.state.domain(cell).intersection(decision.domain()) else {
            self.monitor
                .on_prune(&self.state, PruneReason::EmptyDomain, &self.stats);
            self.backtrack_step();
            return;
        };
        if narrowed != self.state.domain(cell) {
            self.solver.trail.set_domain(&mut self.state, cell, narrowed);
        }

        if !self.propagate_node() {
            self.backtrack_step();
            return;
        }

        if self.state.is_lower_assignment_feasible(self.problem) {
            self.handle_solution();
            return;
        }

        self.enqueue_children();
    }

    /// Runs propagation on the current node, reporting a conflict as a prune.
    fn propagate_node(&mut self) -> bool {
        match propagation::propagate(self.problem, &mut self.state, &mut self.solver.trail) {
            Ok(narrowings) => {
                self.stats.on_narrowings(narrowings);
                true
            }
            Err(conflict) => {
                let reason = match conflict {
                    Conflict::RowDeficit(_) => {
                        self.stats.on_pruning_row();
                        PruneReason::RowDeficit
                    }
                    Conflict::ColumnExcess(_) => {
                        self.stats.on_pruning_column();
                        PruneReason::ColumnExcess
                    }
                };
                self.monitor.on_prune(&self.state, reason, &self.stats);
                false
            }
        }
    }

    fn enqueue_children(&mut self) {
        let decisions = self.builder.next_decision(self.problem, &self.state);

        let count_before = self.solver.stack.num_entries();
        self.solver.stack.extend(decisions);
        let count = self.solver.stack.num_entries() - count_before;

        self.stats.on_decisions_generated(count as u64);
        self.monitor
            .on_decisions_enqueued(&self.state, count, &self.stats);
    }

    fn handle_solution(&mut self) {
        let assignment = Assignment::new(
            self.problem.num_rows(),
            self.problem.num_cols(),
            self.state.lower_values(),
        );
        debug_assert!(
            assignment.satisfies(self.problem),
            "called `MatchSearchSession::handle_solution` with an assignment violating the problem"
        );
        self.stats.on_solution_found();
        self.monitor.on_solution_found(&assignment, &self.stats);
        self.solution = Some(assignment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        branching::{chronological::ChronologicalBuilder, smallest_domain::SmallestDomainBuilder},
        index::{ColumnIndex, RowIndex},
        monitor::no_op::NoOperationMonitor,
        problem::MatchProblemBuilder,
        result::MatchResult,
    };
    use muster_search::monitor::{
        search_monitor::SearchMonitor, time_limit::TimeLimitMonitor,
    };

    fn full(row_min: Vec<u32>, col_max: Vec<u32>, upper: u32) -> MatchProblem {
        let rows = row_min.len();
        let cols = col_max.len();
        let mut b = MatchProblemBuilder::new(row_min, col_max);
        for r in 0..rows {
            for c in 0..cols {
                b.allow(RowIndex::new(r), ColumnIndex::new(c), upper);
            }
        }
        b.build()
    }

    fn solve(problem: &MatchProblem) -> MatchOutcome {
        let mut solver = MatchSolver::new();
        solver.solve(problem, &mut SmallestDomainBuilder::new(), NoOperationMonitor::new())
    }

    #[test]
    fn test_empty_problem_is_feasible() {
        let p = MatchProblemBuilder::new(vec![], vec![]).build();
        let outcome = solve(&p);
        assert!(outcome.result().is_feasible());
        assert_eq!(outcome.termination_reason(), &TerminationReason::FeasibilityProven);
        assert_eq!(outcome.statistics().nodes_explored, 1);
    }

    #[test]
    fn test_zero_minimum_rows_take_nothing() {
        let p = full(vec![0, 0], vec![3], 3);
        let outcome = solve(&p);
        let assignment = outcome.result().assignment().unwrap();
        assert_eq!(assignment.values(), &[0, 0]);
    }

    #[test]
    fn test_split_requirement_across_columns() {
        let p = full(vec![4], vec![1, 2, 3], 4);
        let outcome = solve(&p);
        let assignment = outcome.result().assignment().unwrap();
        assert!(assignment.satisfies(&p));
        assert!(assignment.row_total(RowIndex::new(0)) >= 4);
    }

    #[test]
    fn test_requires_branching() {
        // three rows share two columns; propagation alone cannot decide
        let p = full(vec![1, 1, 1], vec![2, 1], 1);
        let outcome = solve(&p);
        let assignment = outcome.result().assignment().unwrap();
        assert!(assignment.satisfies(&p));
        assert!(outcome.statistics().decisions_generated > 0);
    }

    #[test]
    fn test_pigeonhole_is_infeasible() {
        // four rows need one each, two columns offer one each
        let p = full(vec![1, 1, 1, 1], vec![1, 1], 1);
        let outcome = solve(&p);
        assert_eq!(outcome.result(), &MatchResult::Infeasible);
        assert_eq!(outcome.termination_reason(), &TerminationReason::InfeasibilityProven);
    }

    #[test]
    fn test_root_conflict_is_infeasible() {
        let p = full(vec![5], vec![2, 2], 5);
        let outcome = solve(&p);
        assert_eq!(outcome.result(), &MatchResult::Infeasible);
        assert_eq!(outcome.statistics().prunings_row, 1);
    }

    #[test]
    fn test_builders_agree_on_feasibility() {
        let cases = [
            full(vec![2, 1, 1], vec![2, 2], 2),
            full(vec![3, 3], vec![2, 2, 1], 3),
            full(vec![1, 2, 2], vec![1, 1, 2], 2),
        ];
        for p in &cases {
            let mut solver = MatchSolver::preallocated(p.num_cells());
            let a = solver.solve(p, &mut SmallestDomainBuilder::new(), NoOperationMonitor::new());
            let b = solver.solve(p, &mut ChronologicalBuilder::new(), NoOperationMonitor::new());
            assert_eq!(a.result().is_feasible(), b.result().is_feasible());
            for outcome in [&a, &b] {
                if let Some(assignment) = outcome.result().assignment() {
                    assert!(assignment.satisfies(p));
                }
            }
        }
    }

    #[test]
    fn test_monitor_abort_is_reported() {
        let p = full(vec![1, 1, 1], vec![2, 1], 1);
        let mut limit =
            TimeLimitMonitor::with_clock_check_mask(std::time::Duration::ZERO, 0);
        limit.on_enter_search();
        let mut solver = MatchSolver::new();
        let outcome = solver.solve(
            &p,
            &mut SmallestDomainBuilder::new(),
            crate::monitor::wrapper::WrapperMonitor::new(&mut limit),
        );
        assert_eq!(outcome.result(), &MatchResult::Unknown);
        assert!(outcome.termination_reason().is_aborted());
    }

    #[test]
    fn test_solver_is_reusable() {
        let p = full(vec![1, 1, 1], vec![2, 1], 1);
        let mut solver = MatchSolver::new();
        let first = solver.solve(&p, &mut SmallestDomainBuilder::new(), NoOperationMonitor::new());
        let second = solver.solve(&p, &mut SmallestDomainBuilder::new(), NoOperationMonitor::new());
        assert_eq!(first.result(), second.result());
    }
}
