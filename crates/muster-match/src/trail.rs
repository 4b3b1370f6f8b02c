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

use crate::{index::CellIndex, state::SearchState};
use muster_core::math::interval::ClosedInterval;

/// A record of a single domain narrowing.
///
/// Stores the cell that changed and the domain it held before, which is all
/// `SearchTrail::backtrack` needs to restore it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TrailEntry {
    cell: CellIndex,
    old_domain: ClosedInterval<u32>,
}

impl TrailEntry {
    #[inline]
    pub fn cell(&self) -> CellIndex {
        self.cell
    }

    #[inline]
    pub fn old_domain(&self) -> ClosedInterval<u32> {
        self.old_domain
    }
}

impl std::fmt::Display for TrailEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TrailEntry(cell: {}, old_domain: {})",
            self.cell.get(),
            self.old_domain
        )
    }
}

/// A linear undo log with frame markers for backtracking.
///
/// Usage:
/// 1. Call `push_frame()` before applying the changes of a new node,
/// 2. Narrow domains with `set_domain(...)`,
/// 3. Call `backtrack(state)` to restore the state to the start of the frame.
#[derive(Debug, Clone, Default)]
pub struct SearchTrail {
    entries: Vec<TrailEntry>,
    /// `frames[i]` is the index in `entries` where depth `i` began.
    frames: Vec<usize>,
}

impl SearchTrail {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a trail sized for a search over `num_cells` cells.
    #[inline]
    pub fn preallocated(num_cells: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_cells),
            frames: Vec::with_capacity(num_cells + 1),
        }
    }

    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Narrows `cell` to `domain` and records the previous domain.
    #[inline]
    pub fn set_domain(
        &mut self,
        state: &mut SearchState,
        cell: CellIndex,
        domain: ClosedInterval<u32>,
    ) {
        debug_assert!(
            state.domain(cell).contains_interval(domain),
            "called `SearchTrail::set_domain` with {} which does not narrow {}",
            domain,
            state.domain(cell)
        );
        let old_domain = state.set_domain(cell, domain);
        self.entries.push(TrailEntry { cell, old_domain });
    }

    /// Undoes every change of the current frame and pops it.
    ///
    /// Returns `false` if there was no frame to pop.
    pub fn backtrack(&mut self, state: &mut SearchState) -> bool {
        let Some(start) = self.frames.pop() else {
            return false;
        };
        while self.entries.len() > start {
            if let Some(entry) = self.entries.pop() {
                state.set_domain(entry.cell, entry.old_domain);
            }
        }
        true
    }

    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }
}

impl std::fmt::Display for SearchTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchTrail(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        index::{ColumnIndex, RowIndex},
        problem::MatchProblemBuilder,
    };

    #[test]
    fn test_backtrack_restores_state() {
        let mut b = MatchProblemBuilder::new(vec![1], vec![2, 2]);
        b.allow(RowIndex::new(0), ColumnIndex::new(0), 2)
            .allow(RowIndex::new(0), ColumnIndex::new(1), 2);
        let p = b.build();
        let mut state = SearchState::new(&p);
        let root = state.clone();
        let mut trail = SearchTrail::preallocated(p.num_cells());

        trail.push_frame();
        trail.set_domain(&mut state, CellIndex::new(0), ClosedInterval::new(1, 2));
        let after_first = state.clone();

        trail.push_frame();
        trail.set_domain(&mut state, CellIndex::new(0), ClosedInterval::singleton(2));
        trail.set_domain(&mut state, CellIndex::new(1), ClosedInterval::singleton(0));
        assert_eq!(trail.num_entries(), 3);
        assert_eq!(trail.depth(), 2);

        assert!(trail.backtrack(&mut state));
        assert_eq!(state, after_first);
        assert!(trail.backtrack(&mut state));
        assert_eq!(state, root);
        assert!(!trail.backtrack(&mut state));
        assert!(trail.is_empty());
    }
}
