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

//! Smallest-domain-first branching.
//!
//! Picks the unfixed cell with the fewest remaining values, breaking ties by
//! the lowest row-major index, and splits it at its midpoint.

use crate::{
    branching::decision::{DecisionBuilder, SplitDecisions},
    index::CellIndex,
    problem::MatchProblem,
    state::SearchState,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct SmallestDomainBuilder;

impl SmallestDomainBuilder {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    fn select(state: &SearchState) -> Option<CellIndex> {
        state
            .domains()
            .iter()
            .enumerate()
            .filter(|(_, domain)| !domain.is_fixed())
            .min_by_key(|&(index, domain)| (domain.width(), index))
            .map(|(index, _)| CellIndex::new(index))
    }
}

impl DecisionBuilder for SmallestDomainBuilder {
    type DecisionIterator<'a>
        = SplitDecisions
    where
        Self: 'a;

    fn name(&self) -> &str {
        "SmallestDomainBuilder"
    }

    fn next_decision<'a>(
        &'a mut self,
        _problem: &'a MatchProblem,
        state: &'a SearchState,
    ) -> Self::DecisionIterator<'a> {
        match Self::select(state) {
            Some(cell) => SplitDecisions::split(state, cell),
            None => SplitDecisions::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        branching::decision::Decision,
        index::{ColumnIndex, RowIndex},
        problem::MatchProblemBuilder,
    };
    use muster_core::math::interval::ClosedInterval;

    #[test]
    fn test_picks_narrowest_then_lowest_index() {
        let mut b = MatchProblemBuilder::new(vec![0, 0], vec![9, 9]);
        b.allow(RowIndex::new(0), ColumnIndex::new(0), 4)
            .allow(RowIndex::new(0), ColumnIndex::new(1), 2)
            .allow(RowIndex::new(1), ColumnIndex::new(1), 2);
        let p = b.build();
        let state = SearchState::new(&p);
        let mut builder = SmallestDomainBuilder::new();
        let decisions: Vec<_> = builder.next_decision(&p, &state).collect();
        assert_eq!(
            decisions,
            vec![
                Decision::new(CellIndex::new(1), ClosedInterval::new(2, 2)),
                Decision::new(CellIndex::new(1), ClosedInterval::new(0, 1)),
            ]
        );
    }

    #[test]
    fn test_all_fixed_yields_nothing() {
        let p = MatchProblemBuilder::new(vec![0], vec![1]).build();
        let state = SearchState::new(&p);
        let mut builder = SmallestDomainBuilder::new();
        assert_eq!(builder.next_decision(&p, &state).count(), 0);
        assert_eq!(builder.name(), "SmallestDomainBuilder");
    }
}
