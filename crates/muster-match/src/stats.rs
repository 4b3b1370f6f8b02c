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

use muster_core::num::saturating::SaturatingAddVal;
use std::time::Duration;

/// Counters collected by one run of the assignment search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchStatistics {
    /// Total nodes visited, the root included.
    pub nodes_explored: u64,
    /// Total frames undone.
    pub backtracks: u64,
    /// Total branching decisions generated.
    pub decisions_generated: u64,
    /// The deepest level reached in the tree.
    pub max_depth: u64,
    /// Nodes closed because a row could no longer reach its minimum.
    pub prunings_row: u64,
    /// Nodes closed because a column was committed beyond its maximum.
    pub prunings_column: u64,
    /// Domains narrowed by propagation.
    pub narrowings: u64,
    pub solutions_found: u64,
    pub time_total: Duration,
}

impl MatchStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add_val(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add_val(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add_val(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_decisions_generated(&mut self, count: u64) {
        self.decisions_generated = self.decisions_generated.saturating_add_val(count);
    }

    #[inline]
    pub fn on_pruning_row(&mut self) {
        self.prunings_row = self.prunings_row.saturating_add_val(1);
    }

    #[inline]
    pub fn on_pruning_column(&mut self) {
        self.prunings_column = self.prunings_column.saturating_add_val(1);
    }

    #[inline]
    pub fn on_narrowings(&mut self, count: u64) {
        self.narrowings = self.narrowings.saturating_add_val(count);
    }

    /// Returns the total number of pruned nodes.
    #[inline]
    pub fn prunings(&self) -> u64 {
        self.prunings_row.saturating_add_val(self.prunings_column)
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for MatchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Match Search Statistics:")?;
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  Backtracks:           {}", self.backtracks)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Decisions generated:  {}", self.decisions_generated)?;
        writeln!(f, "  Prunings (row):       {}", self.prunings_row)?;
        writeln!(f, "  Prunings (column):    {}", self.prunings_column)?;
        writeln!(f, "  Narrowings:           {}", self.narrowings)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_saturate() {
        let mut stats = MatchStatistics {
            nodes_explored: u64::MAX,
            ..Default::default()
        };
        stats.on_node_explored();
        stats.on_pruning_row();
        stats.on_pruning_column();
        stats.on_depth_update(3);
        stats.on_depth_update(2);
        stats.on_decisions_generated(2);
        assert_eq!(stats.nodes_explored, u64::MAX);
        assert_eq!(stats.prunings(), 2);
        assert_eq!(stats.max_depth, 3);
        assert_eq!(stats.decisions_generated, 2);
    }

    #[test]
    fn test_display_lists_counters() {
        let text = MatchStatistics::default().to_string();
        assert!(text.starts_with("Match Search Statistics:"));
        assert!(text.contains("Prunings (column):"));
    }
}
