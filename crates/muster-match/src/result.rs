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
    index::{ColumnIndex, RowIndex},
    problem::MatchProblem,
    stats::MatchStatistics,
};
use muster_search::result::TerminationReason;

/// A complete value for every cell of the assignment matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    num_rows: usize,
    num_cols: usize,
    values: Vec<u32>,
}

impl Assignment {
    /// Creates an assignment from row-major `values`.
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != num_rows * num_cols`.
    pub fn new(num_rows: usize, num_cols: usize, values: Vec<u32>) -> Self {
        assert_eq!(
            values.len(),
            num_rows * num_cols,
            "called `Assignment::new` with {} values for a {}x{} matrix",
            values.len(),
            num_rows,
            num_cols
        );
        Self {
            num_rows,
            num_cols,
            values,
        }
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[inline]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    #[inline]
    pub fn get(&self, row: RowIndex, col: ColumnIndex) -> u32 {
        self.values[row.get() * self.num_cols + col.get()]
    }

    #[inline]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn row_total(&self, row: RowIndex) -> u64 {
        ColumnIndex::range(self.num_cols)
            .map(|col| self.get(row, col) as u64)
            .sum()
    }

    pub fn col_total(&self, col: ColumnIndex) -> u64 {
        RowIndex::range(self.num_rows)
            .map(|row| self.get(row, col) as u64)
            .sum()
    }

    /// Returns `true` if this assignment satisfies every constraint of `problem`.
    pub fn satisfies(&self, problem: &MatchProblem) -> bool {
        if self.num_rows != problem.num_rows() || self.num_cols != problem.num_cols() {
            return false;
        }
        let cells_ok = self.values.iter().enumerate().all(|(index, &value)| {
            let cell = index.into();
            value <= problem.cell_upper(cell) && (value == 0 || problem.is_allowed(cell))
        });
        cells_ok
            && RowIndex::range(self.num_rows)
                .all(|row| self.row_total(row) >= problem.row_min(row) as u64)
            && ColumnIndex::range(self.num_cols)
                .all(|col| self.col_total(col) <= problem.col_max(col) as u64)
    }
}

/// The result of one assignment search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchResult {
    Feasible(Assignment),
    Infeasible,
    /// The search stopped before reaching a conclusion.
    Unknown,
}

impl MatchResult {
    #[inline]
    pub fn is_feasible(&self) -> bool {
        matches!(self, MatchResult::Feasible(_))
    }

    #[inline]
    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            MatchResult::Feasible(assignment) => Some(assignment),
            _ => None,
        }
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchResult::Feasible(_) => write!(f, "Feasible"),
            MatchResult::Infeasible => write!(f, "Infeasible"),
            MatchResult::Unknown => write!(f, "Unknown"),
        }
    }
}

/// The outcome of `MatchSolver::solve`: the result, why the search stopped,
/// and the counters it collected.
#[derive(Clone, Debug)]
pub struct MatchOutcome {
    result: MatchResult,
    termination_reason: TerminationReason,
    statistics: MatchStatistics,
}

impl MatchOutcome {
    #[inline]
    pub fn feasible(assignment: Assignment, statistics: MatchStatistics) -> Self {
        Self {
            result: MatchResult::Feasible(assignment),
            termination_reason: TerminationReason::FeasibilityProven,
            statistics,
        }
    }

    #[inline]
    pub fn infeasible(statistics: MatchStatistics) -> Self {
        Self {
            result: MatchResult::Infeasible,
            termination_reason: TerminationReason::InfeasibilityProven,
            statistics,
        }
    }

    #[inline]
    pub fn aborted<S>(reason: S, statistics: MatchStatistics) -> Self
    where
        S: Into<String>,
    {
        Self {
            result: MatchResult::Unknown,
            termination_reason: TerminationReason::Aborted(reason.into()),
            statistics,
        }
    }

    #[inline]
    pub fn result(&self) -> &MatchResult {
        &self.result
    }

    #[inline]
    pub fn into_result(self) -> MatchResult {
        self.result
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn statistics(&self) -> &MatchStatistics {
        &self.statistics
    }
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MatchOutcome(result: {}, reason: {})",
            self.result, self.termination_reason
        )
    }
}
