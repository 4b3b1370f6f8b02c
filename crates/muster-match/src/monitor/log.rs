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

use crate::{
    branching::decision::Decision,
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    problem::MatchProblem,
    result::Assignment,
    state::SearchState,
    stats::MatchStatistics,
};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Reports search progress through `tracing`.
///
/// Progress lines are emitted at `debug` level at most once per
/// `log_interval`; the clock is only read when
/// `nodes_explored & clock_check_mask == 0`. Prunes and backtracks are
/// reported at `trace` level.
#[derive(Debug, Clone)]
pub struct LogTreeSearchMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
}

impl LogTreeSearchMonitor {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_log_time: now,
            log_interval,
            clock_check_mask,
        }
    }

    #[inline]
    pub fn log_interval(&self) -> Duration {
        self.log_interval
    }

    fn log_progress(&mut self, state: &SearchState, stats: &MatchStatistics) {
        let now = Instant::now();
        debug!(
            elapsed = ?now.duration_since(self.start_time),
            nodes = stats.nodes_explored,
            depth = stats.max_depth,
            unfixed = state.num_unfixed(),
            backtracks = stats.backtracks,
            prunings = stats.prunings(),
            "assignment search progress"
        );
        self.last_log_time = now;
    }
}

impl Default for LogTreeSearchMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl std::fmt::Display for LogTreeSearchMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogTreeSearchMonitor(log_interval: {}s, clock_check_mask: {})",
            self.log_interval.as_secs(),
            self.clock_check_mask
        )
    }
}

impl TreeSearchMonitor for LogTreeSearchMonitor {
    fn name(&self) -> &str {
        "LogTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, problem: &MatchProblem, _statistics: &MatchStatistics) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        debug!(
            rows = problem.num_rows(),
            cols = problem.num_cols(),
            "assignment search started"
        );
    }

    fn on_exit_search(&mut self, statistics: &MatchStatistics) {
        debug!(
            nodes = statistics.nodes_explored,
            backtracks = statistics.backtracks,
            solutions = statistics.solutions_found,
            elapsed = ?self.start_time.elapsed(),
            "assignment search finished"
        );
    }

    fn on_step(&mut self, _state: &SearchState, _statistics: &MatchStatistics) {}

    fn on_prune(&mut self, state: &SearchState, reason: PruneReason, statistics: &MatchStatistics) {
        trace!(
            %reason,
            unfixed = state.num_unfixed(),
            nodes = statistics.nodes_explored,
            "node pruned"
        );
    }

    fn on_decisions_enqueued(
        &mut self,
        _state: &SearchState,
        _count: usize,
        _statistics: &MatchStatistics,
    ) {
    }

    fn on_descend(&mut self, state: &SearchState, _decision: Decision, statistics: &MatchStatistics) {
        if (statistics.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_progress(state, statistics);
        }
    }

    fn on_backtrack(&mut self, _state: &SearchState, statistics: &MatchStatistics) {
        trace!(backtracks = statistics.backtracks, "backtrack");
    }

    fn on_solution_found(&mut self, assignment: &Assignment, statistics: &MatchStatistics) {
        debug!(
            rows = assignment.num_rows(),
            cols = assignment.num_cols(),
            nodes = statistics.nodes_explored,
            "feasible assignment found"
        );
    }
}
