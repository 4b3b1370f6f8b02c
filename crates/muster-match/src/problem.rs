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

use crate::index::{CellIndex, ColumnIndex, RowIndex};
use fixedbitset::FixedBitSet;
use muster_model::{
    bound::ModelBound,
    resource::{ResourceInstance, ResourceModel},
    taxonomy::Taxonomy,
};

/// The immutable description of one assignment search.
///
/// * `row_min[row]`: the least total a row must receive.
/// * `col_max[col]`: the most a column may hand out across all rows.
/// * `cell_upper[cell]`: the initial upper bound of a cell; `0` if not allowed.
/// * `allowed`: the cells that may become non-zero.
///
/// Construction:
/// - Use `MatchProblemBuilder`, or `MatchProblem::from_bounds` /
///   `MatchProblem::from_instances` to derive the matrix from a taxonomy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchProblem {
    num_rows: usize,
    num_cols: usize,
    row_min: Vec<u32>,
    col_max: Vec<u32>,
    cell_upper: Vec<u32>,
    allowed: FixedBitSet,
}

impl MatchProblem {
    /// Builds the matrix for required bounds against available bounds.
    ///
    /// A cell is allowed when the column's model is the row's model or one of
    /// its subtypes; its upper bound is `min(required.max, available.max)`.
    pub fn from_bounds<T>(required: &[ModelBound], available: &[ModelBound], taxonomy: &T) -> Self
    where
        T: Taxonomy + ?Sized,
    {
        let mut builder = MatchProblemBuilder::new(
            required.iter().map(ModelBound::min).collect(),
            available.iter().map(ModelBound::max).collect(),
        );
        for (r, req) in required.iter().enumerate() {
            for (c, avail) in available.iter().enumerate() {
                if substitutes(taxonomy, avail.model(), req.model()) {
                    builder.allow(
                        RowIndex::new(r),
                        ColumnIndex::new(c),
                        req.max().min(avail.max()),
                    );
                }
            }
        }
        builder.build()
    }

    /// Builds the matrix for required bounds against concrete instances.
    ///
    /// Every column offers exactly one unit, so allowed cells range over `{0, 1}`.
    pub fn from_instances<T>(
        required: &[ModelBound],
        instances: &[ResourceInstance],
        taxonomy: &T,
    ) -> Self
    where
        T: Taxonomy + ?Sized,
    {
        let mut builder = MatchProblemBuilder::new(
            required.iter().map(ModelBound::min).collect(),
            vec![1; instances.len()],
        );
        for (r, req) in required.iter().enumerate() {
            for (c, instance) in instances.iter().enumerate() {
                if substitutes(taxonomy, instance.model(), req.model()) {
                    builder.allow(RowIndex::new(r), ColumnIndex::new(c), req.max().min(1));
                }
            }
        }
        builder.build()
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
        self.num_rows * self.num_cols
    }

    /// Returns the row-major cell of `(row, col)`.
    #[inline(always)]
    pub fn cell(&self, row: RowIndex, col: ColumnIndex) -> CellIndex {
        debug_assert!(
            row.get() < self.num_rows && col.get() < self.num_cols,
            "called `MatchProblem::cell` with ({}, {}) outside a {}x{} matrix",
            row.get(),
            col.get(),
            self.num_rows,
            self.num_cols
        );
        CellIndex::new(row.get() * self.num_cols + col.get())
    }

    #[inline(always)]
    pub fn row_of(&self, cell: CellIndex) -> RowIndex {
        RowIndex::new(cell.get() / self.num_cols)
    }

    #[inline(always)]
    pub fn col_of(&self, cell: CellIndex) -> ColumnIndex {
        ColumnIndex::new(cell.get() % self.num_cols)
    }

    #[inline]
    pub fn row_min(&self, row: RowIndex) -> u32 {
        self.row_min[row.get()]
    }

    #[inline]
    pub fn col_max(&self, col: ColumnIndex) -> u32 {
        self.col_max[col.get()]
    }

    #[inline]
    pub fn cell_upper(&self, cell: CellIndex) -> u32 {
        self.cell_upper[cell.get()]
    }

    #[inline]
    pub fn is_allowed(&self, cell: CellIndex) -> bool {
        self.allowed.contains(cell.get())
    }

    /// Iterates the allowed cells of `row` in column order.
    pub fn allowed_in_row(&self, row: RowIndex) -> impl Iterator<Item = CellIndex> + '_ {
        let start = row.get() * self.num_cols;
        (start..start + self.num_cols)
            .filter(|&cell| self.allowed.contains(cell))
            .map(CellIndex::new)
    }

    /// Iterates the allowed cells of `col` in row order.
    pub fn allowed_in_col(&self, col: ColumnIndex) -> impl Iterator<Item = CellIndex> + '_ {
        (0..self.num_rows)
            .map(move |r| r * self.num_cols + col.get())
            .filter(|&cell| self.allowed.contains(cell))
            .map(CellIndex::new)
    }
}

impl std::fmt::Display for MatchProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MatchProblem(rows: {}, cols: {}, allowed cells: {})",
            self.num_rows,
            self.num_cols,
            self.allowed.count_ones(..)
        )
    }
}

#[inline]
pub(crate) fn substitutes<T>(taxonomy: &T, offered: &ResourceModel, required: &ResourceModel) -> bool
where
    T: Taxonomy + ?Sized,
{
    offered == required || taxonomy.is_subtype_of(offered, required)
}

/// A mutable builder for `MatchProblem`. All cells start disallowed.
#[derive(Clone, Debug)]
pub struct MatchProblemBuilder {
    row_min: Vec<u32>,
    col_max: Vec<u32>,
    cell_upper: Vec<u32>,
    allowed: FixedBitSet,
}

impl MatchProblemBuilder {
    pub fn new(row_min: Vec<u32>, col_max: Vec<u32>) -> Self {
        let num_cells = row_min.len() * col_max.len();
        Self {
            row_min,
            col_max,
            cell_upper: vec![0; num_cells],
            allowed: FixedBitSet::with_capacity(num_cells),
        }
    }

    /// Allows `(row, col)` with the given upper bound. An upper bound of zero
    /// leaves the cell effectively disallowed.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds.
    pub fn allow(&mut self, row: RowIndex, col: ColumnIndex, upper: u32) -> &mut Self {
        assert!(
            row.get() < self.row_min.len() && col.get() < self.col_max.len(),
            "called `MatchProblemBuilder::allow` with ({}, {}) outside a {}x{} matrix",
            row.get(),
            col.get(),
            self.row_min.len(),
            self.col_max.len()
        );
        let cell = row.get() * self.col_max.len() + col.get();
        if upper > 0 {
            self.allowed.insert(cell);
            self.cell_upper[cell] = upper;
        } else {
            self.allowed.set(cell, false);
            self.cell_upper[cell] = 0;
        }
        self
    }

    pub fn build(self) -> MatchProblem {
        MatchProblem {
            num_rows: self.row_min.len(),
            num_cols: self.col_max.len(),
            row_min: self.row_min,
            col_max: self.col_max,
            cell_upper: self.cell_upper,
            allowed: self.allowed,
        }
    }
}
