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

//! Adapter for shared search monitors
//!
//! `WrapperMonitor` lets a `muster_search::SearchMonitor` observe an
//! assignment search. Enter, exit, step and `search_command` are forwarded;
//! the tree-specific callbacks are ignored.

use crate::{
    branching::decision::Decision,
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    problem::MatchProblem,
    result::Assignment,
    state::SearchState,
    stats::MatchStatistics,
};
use muster_search::monitor::search_monitor::{SearchCommand, SearchMonitor};

pub struct WrapperMonitor<'a> {
    inner: &'a mut dyn SearchMonitor,
    name: String,
}

impl<'a> WrapperMonitor<'a> {
    #[inline]
    pub fn new(inner: &'a mut dyn SearchMonitor) -> Self {
        let name = format!("WrapperMonitor({})", inner.name());
        Self { inner, name }
    }
}

impl std::fmt::Debug for WrapperMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl TreeSearchMonitor for WrapperMonitor<'_> {
    #[inline(always)]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    fn on_enter_search(&mut self, _problem: &MatchProblem, _statistics: &MatchStatistics) {
        self.inner.on_enter_search();
    }

    #[inline(always)]
    fn on_exit_search(&mut self, _statistics: &MatchStatistics) {
        self.inner.on_exit_search();
    }

    #[inline(always)]
    fn search_command(&mut self, _state: &SearchState, _statistics: &MatchStatistics) -> SearchCommand {
        self.inner.search_command()
    }

    #[inline(always)]
    fn on_step(&mut self, _state: &SearchState, _statistics: &MatchStatistics) {
        self.inner.on_step();
    }

    #[inline(always)]
    fn on_prune(&mut self, _state: &SearchState, _reason: PruneReason, _statistics: &MatchStatistics) {
    }

    #[inline(always)]
    fn on_decisions_enqueued(
        &mut self,
        _state: &SearchState,
        _count: usize,
        _statistics: &MatchStatistics,
    ) {
    }

    #[inline(always)]
    fn on_descend(&mut self, _state: &SearchState, _decision: Decision, _statistics: &MatchStatistics) {
    }

    #[inline(always)]
    fn on_backtrack(&mut self, _state: &SearchState, _statistics: &MatchStatistics) {}

    #[inline(always)]
    fn on_solution_found(&mut self, _assignment: &Assignment, _statistics: &MatchStatistics) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::MatchProblemBuilder;
    use muster_search::monitor::interrupt::InterruptMonitor;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_forwards_search_command() {
        let flag = AtomicBool::new(false);
        let mut inner = InterruptMonitor::new(&flag);
        let mut wrapper = WrapperMonitor::new(&mut inner);
        assert_eq!(wrapper.name(), "WrapperMonitor(InterruptMonitor)");

        let problem = MatchProblemBuilder::new(vec![], vec![]).build();
        let state = SearchState::new(&problem);
        let stats = MatchStatistics::default();
        assert_eq!(wrapper.search_command(&state, &stats), SearchCommand::Continue);
        flag.store(true, Ordering::SeqCst);
        assert!(wrapper.search_command(&state, &stats).is_terminate());
    }
}
