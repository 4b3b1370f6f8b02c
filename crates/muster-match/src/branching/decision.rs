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

use crate::{index::CellIndex, problem::MatchProblem, state::SearchState};
use muster_core::math::interval::ClosedInterval;
use std::iter::FusedIterator;

/// Restricts the domain of one cell.
///
/// Applying a decision narrows `cell` to `domain`; the two children of a
/// branching step cover the parent domain without overlap.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Decision {
    cell: CellIndex,
    domain: ClosedInterval<u32>,
}

impl Decision {
    #[inline]
    pub fn new(cell: CellIndex, domain: ClosedInterval<u32>) -> Self {
        Self { cell, domain }
    }

    #[inline]
    pub fn cell(&self) -> CellIndex {
        self.cell
    }

    #[inline]
    pub fn domain(&self) -> ClosedInterval<u32> {
        self.domain
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Decision(cell: {}, domain: {})", self.cell.get(), self.domain)
    }
}

/// The children of a midpoint split, in stack order.
///
/// Yields the upper half first and the lower half second, so that the lower
/// half is popped, and therefore explored, first.
#[derive(Clone, Debug)]
pub struct SplitDecisions {
    pending: [Option<Decision>; 2],
    next: usize,
}

impl SplitDecisions {
    /// Splits the domain of `cell` in `state`. A fixed cell yields nothing.
    pub fn split(state: &SearchState, cell: CellIndex) -> Self {
        let pending = match state.domain(cell).split_at_midpoint() {
            Some((lower, upper)) => [
                Some(Decision::new(cell, upper)),
                Some(Decision::new(cell, lower)),
            ],
            None => [None, None],
        };
        Self { pending, next: 0 }
    }

    #[inline]
    pub fn empty() -> Self {
        Self {
            pending: [None, None],
            next: 0,
        }
    }
}

impl Iterator for SplitDecisions {
    type Item = Decision;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.pending.len() {
            let slot = self.pending[self.next].take();
            self.next += 1;
            if slot.is_some() {
                return slot;
            }
        }
        None
    }
}

impl FusedIterator for SplitDecisions {}

/// Generates the children of a search node.
///
/// The engine pushes the yielded decisions onto its stack in iteration
/// order and pops them LIFO, so the last yielded decision is tried first.
/// Yielding nothing means the node has no unfixed cell left.
pub trait DecisionBuilder {
    type DecisionIterator<'a>: Iterator<Item = Decision> + FusedIterator + 'a
    where
        Self: 'a;

    fn name(&self) -> &str;

    fn next_decision<'a>(
        &'a mut self,
        problem: &'a MatchProblem,
        state: &'a SearchState,
    ) -> Self::DecisionIterator<'a>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        index::{ColumnIndex, RowIndex},
        problem::MatchProblemBuilder,
    };

    #[test]
    fn test_split_yields_upper_then_lower() {
        let mut b = MatchProblemBuilder::new(vec![0], vec![5]);
        b.allow(RowIndex::new(0), ColumnIndex::new(0), 5);
        let state = SearchState::new(&b.build());
        let cell = CellIndex::new(0);
        let decisions: Vec<_> = SplitDecisions::split(&state, cell).collect();
        assert_eq!(
            decisions,
            vec![
                Decision::new(cell, ClosedInterval::new(3, 5)),
                Decision::new(cell, ClosedInterval::new(0, 2)),
            ]
        );
    }

    #[test]
    fn test_fixed_cell_yields_nothing() {
        let b = MatchProblemBuilder::new(vec![0], vec![5]);
        let state = SearchState::new(&b.build());
        let mut it = SplitDecisions::split(&state, CellIndex::new(0));
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
        assert_eq!(SplitDecisions::empty().count(), 0);
    }

    #[test]
    fn test_display() {
        let d = Decision::new(CellIndex::new(4), ClosedInterval::new(0, 1));
        assert_eq!(d.to_string(), "Decision(cell: 4, domain: [0, 1])");
    }
}
