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
    result::Assignment,
};
use muster_model::bound::ModelBound;
use smallvec::SmallVec;

/// The non-zero part of a feasible assignment, grouped by requirement.
///
/// `C` is the column label: a `ModelBound` when matching against aggregated
/// availability, a `ResourceInstance` when matching against instances.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution<C> {
    required: Vec<ModelBound>,
    rows: Vec<SmallVec<[(C, u32); 4]>>,
}

impl<C> Solution<C>
where
    C: Clone,
{
    /// Extracts the non-zero cells of `assignment`, labelling column `c`
    /// with `columns[c]`.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions of `assignment` do not match `required`
    /// and `columns`.
    pub fn from_assignment(required: &[ModelBound], columns: &[C], assignment: &Assignment) -> Self {
        assert!(
            assignment.num_rows() == required.len() && assignment.num_cols() == columns.len(),
            "called `Solution::from_assignment` with a {}x{} assignment for {} rows and {} columns",
            assignment.num_rows(),
            assignment.num_cols(),
            required.len(),
            columns.len()
        );
        let rows = RowIndex::range(required.len())
            .map(|row| {
                columns
                    .iter()
                    .enumerate()
                    .filter_map(|(col, column)| {
                        let count = assignment.get(row, ColumnIndex::new(col));
                        (count > 0).then(|| (column.clone(), count))
                    })
                    .collect()
            })
            .collect();
        Self {
            required: required.to_vec(),
            rows,
        }
    }
}

impl<C> Solution<C> {
    #[inline]
    pub fn required(&self) -> &[ModelBound] {
        &self.required
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the `(column, count)` pairs assigned to `row`.
    #[inline]
    pub fn row(&self, row: RowIndex) -> &[(C, u32)] {
        &self.rows[row.get()]
    }

    pub fn rows(&self) -> impl Iterator<Item = (&ModelBound, &[(C, u32)])> {
        self.required
            .iter()
            .zip(self.rows.iter().map(|row| row.as_slice()))
    }

    /// Returns how many units `row` received in total.
    pub fn assigned(&self, row: RowIndex) -> u64 {
        self.rows[row.get()].iter().map(|(_, count)| *count as u64).sum()
    }
}

impl<C> std::fmt::Display for Solution<C>
where
    C: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (bound, row) in self.rows() {
            write!(f, "{} <-", bound)?;
            if row.is_empty() {
                write!(f, " (none)")?;
            }
            for (column, count) in row {
                write!(f, " {} x{}", column, count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
