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

//! Row-major branching: always split the first unfixed cell.

use crate::{
    branching::decision::{DecisionBuilder, SplitDecisions},
    index::CellIndex,
    problem::MatchProblem,
    state::SearchState,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct ChronologicalBuilder;

impl ChronologicalBuilder {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl DecisionBuilder for ChronologicalBuilder {
    type DecisionIterator<'a>
        = SplitDecisions
    where
        Self: 'a;

    fn name(&self) -> &str {
        "ChronologicalBuilder"
    }

    fn next_decision<'a>(
        &'a mut self,
        _problem: &'a MatchProblem,
        state: &'a SearchState,
    ) -> Self::DecisionIterator<'a> {
        match state.domains().iter().position(|domain| !domain.is_fixed()) {
            Some(index) => SplitDecisions::split(state, CellIndex::new(index)),
            None => SplitDecisions::empty(),
        }
    }
}
