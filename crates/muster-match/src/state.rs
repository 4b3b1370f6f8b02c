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
    index::{CellIndex, ColumnIndex, RowIndex},
    problem::MatchProblem,
};
use muster_core::math::interval::ClosedInterval;

/// The mutable domains of an assignment search.
///
/// Every cell carries a closed interval of values it may still take.
/// Per-row sums of upper bounds and per-row/per-column sums of lower bounds
/// are cached and kept consistent by `set_domain`, so propagation reads them
/// in constant time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchState {
    num_rows: usize,
    num_cols: usize,
    domains: Vec<ClosedInterval<u32>>,
    row_hi_sum: Vec<u64>,
    row_lo_sum: Vec<u64>,
    col_lo_sum: Vec<u64>,
    num_unfixed: usize,
}

impl SearchState {
    /// Creates the root state of `problem`: every cell ranges over `[0, upper]`.
    pub fn new(problem: &MatchProblem) -> Self {
        let num_rows = problem.num_rows();
        let num_cols = problem.num_cols();
        let domains: Vec<ClosedInterval<u32>> = CellIndex::range(problem.num_cells())
            .map(|cell| ClosedInterval::new(0, problem.cell_upper(cell)))
            .collect();

        let mut row_hi_sum = vec![0u64; num_rows];
        for (cell, domain) in domains.iter().enumerate() {
            row_hi_sum[cell / num_cols.max(1)] += domain.hi() as u64;
        }
        let num_unfixed = domains.iter().filter(|d| !d.is_fixed()).count();

        Self {
            num_rows,
            num_cols,
            domains,
            row_hi_sum,
            row_lo_sum: vec![0; num_rows],
            col_lo_sum: vec![0; num_cols],
            num_unfixed,
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
    pub fn num_cells(&self) -> usize {
        self.domains.len()
    }

    #[inline(always)]
    pub fn domain(&self, cell: CellIndex) -> ClosedInterval<u32> {
        debug_assert!(
            cell.get() < self.domains.len(),
            "called `SearchState::domain` with cell index out of bounds: the len is {} but the index is {}",
            self.domains.len(),
            cell.get()
        );
        self.domains[cell.get()]
    }

    #[inline]
    pub fn domains(&self) -> &[ClosedInterval<u32>] {
        &self.domains
    }

    /// Returns the sum of the upper bounds in `row`.
    #[inline]
    pub fn row_hi_sum(&self, row: RowIndex) -> u64 {
        self.row_hi_sum[row.get()]
    }

    /// Returns the sum of the lower bounds in `row`.
    #[inline]
    pub fn row_lo_sum(&self, row: RowIndex) -> u64 {
        self.row_lo_sum[row.get()]
    }

    /// Returns the sum of the lower bounds in `col`.
    #[inline]
    pub fn col_lo_sum(&self, col: ColumnIndex) -> u64 {
        self.col_lo_sum[col.get()]
    }

    /// Returns the number of cells whose domain holds more than one value.
    #[inline]
    pub fn num_unfixed(&self) -> usize {
        self.num_unfixed
    }

    #[inline]
    pub fn is_fully_fixed(&self) -> bool {
        self.num_unfixed == 0
    }

    /// Returns `true` if taking every cell at its lower bound satisfies all
    /// row minima and column maxima of `problem`.
    pub fn is_lower_assignment_feasible(&self, problem: &MatchProblem) -> bool {
        RowIndex::range(self.num_rows)
            .all(|row| self.row_lo_sum(row) >= problem.row_min(row) as u64)
            && ColumnIndex::range(self.num_cols)
                .all(|col| self.col_lo_sum(col) <= problem.col_max(col) as u64)
    }

    /// Replaces the domain of `cell` and returns the previous one.
    ///
    /// Callers outside the trail should not use this directly, since the
    /// change would not be undone on backtrack.
    pub(crate) fn set_domain(
        &mut self,
        cell: CellIndex,
        domain: ClosedInterval<u32>,
    ) -> ClosedInterval<u32> {
        let index = cell.get();
        let old = self.domains[index];
        let row = index / self.num_cols;
        let col = index % self.num_cols;

        self.row_hi_sum[row] = self.row_hi_sum[row] - old.hi() as u64 + domain.hi() as u64;
        self.row_lo_sum[row] = self.row_lo_sum[row] - old.lo() as u64 + domain.lo() as u64;
        self.col_lo_sum[col] = self.col_lo_sum[col] - old.lo() as u64 + domain.lo() as u64;

        match (old.is_fixed(), domain.is_fixed()) {
            (false, true) => self.num_unfixed -= 1,
            (true, false) => self.num_unfixed += 1,
            _ => {}
        }

        self.domains[index] = domain;
        old
    }

    /// Returns the lower bound of every cell in row-major order.
    pub fn lower_values(&self) -> Vec<u32> {
        self.domains.iter().map(ClosedInterval::lo).collect()
    }
}

impl std::fmt::Display for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchState(rows: {}, cols: {}, unfixed: {})",
            self.num_rows, self.num_cols, self.num_unfixed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::MatchProblemBuilder;

    fn problem() -> MatchProblem {
        let mut b = MatchProblemBuilder::new(vec![2, 1], vec![3, 1]);
        b.allow(RowIndex::new(0), ColumnIndex::new(0), 2)
            .allow(RowIndex::new(0), ColumnIndex::new(1), 1)
            .allow(RowIndex::new(1), ColumnIndex::new(0), 1);
        b.build()
    }

    #[test]
    fn test_root_state_sums() {
        let p = problem();
        let s = SearchState::new(&p);
        assert_eq!(s.num_cells(), 4);
        assert_eq!(s.row_hi_sum(RowIndex::new(0)), 3);
        assert_eq!(s.row_hi_sum(RowIndex::new(1)), 1);
        assert_eq!(s.row_lo_sum(RowIndex::new(0)), 0);
        assert_eq!(s.col_lo_sum(ColumnIndex::new(0)), 0);
        // the disallowed cell is fixed at zero
        assert_eq!(s.num_unfixed(), 3);
        assert!(!s.is_lower_assignment_feasible(&p));
    }

    #[test]
    fn test_set_domain_updates_sums() {
        let p = problem();
        let mut s = SearchState::new(&p);
        let old = s.set_domain(CellIndex::new(0), ClosedInterval::singleton(2));
        assert_eq!(old, ClosedInterval::new(0, 2));
        assert_eq!(s.row_lo_sum(RowIndex::new(0)), 2);
        assert_eq!(s.col_lo_sum(ColumnIndex::new(0)), 2);
        assert_eq!(s.row_hi_sum(RowIndex::new(0)), 3);
        assert_eq!(s.num_unfixed(), 2);

        s.set_domain(CellIndex::new(2), ClosedInterval::singleton(1));
        assert!(s.is_lower_assignment_feasible(&p));
        assert_eq!(s.lower_values(), vec![2, 0, 1, 0]);

        s.set_domain(CellIndex::new(0), old);
        assert_eq!(s.row_lo_sum(RowIndex::new(0)), 0);
        assert_eq!(s.col_lo_sum(ColumnIndex::new(0)), 1);
        assert_eq!(s.num_unfixed(), 2);
    }
}
