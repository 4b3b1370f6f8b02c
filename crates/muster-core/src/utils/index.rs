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

//! # Strongly Typed Indices
//!
//! `TypedIndex<T>` wraps a `usize` and carries a phantom tag so that row,
//! column and cell indices of an assignment matrix (or any other index space)
//! cannot be mixed up. The wrapper is `#[repr(transparent)]`.
//!
//! ```rust
//! use muster_core::utils::index::{TypedIndex, TypedIndexTag};
//!
//! #[derive(Clone, Copy)]
//! struct RowTag;
//! impl TypedIndexTag for RowTag { const NAME: &'static str = "RowIndex"; }
//!
//! type RowIndex = TypedIndex<RowTag>;
//! let r = RowIndex::new(3);
//! assert_eq!(r.get(), 3);
//! assert_eq!(format!("{}", r), "RowIndex(3)");
//! ```

use std::marker::PhantomData;

/// Names an index space for `Debug`/`Display` output.
pub trait TypedIndexTag: Clone {
    const NAME: &'static str;
}

/// A `usize` index tagged with the index space `T` it belongs to.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedIndex<T> {
    index: usize,
    _marker: PhantomData<T>,
}

impl<T> TypedIndex<T> {
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.index
    }

    /// Returns the index immediately following this one.
    #[inline(always)]
    pub const fn next(&self) -> Self {
        Self::new(self.index + 1)
    }

    /// Iterates the indices `0..len` of this index space.
    ///
    /// ```rust
    /// # use muster_core::utils::index::{TypedIndex, TypedIndexTag};
    /// # #[derive(Clone, Copy)]
    /// # struct ColTag;
    /// # impl TypedIndexTag for ColTag { const NAME: &'static str = "ColIndex"; }
    /// let cols: Vec<usize> = TypedIndex::<ColTag>::range(3).map(|c| c.get()).collect();
    /// assert_eq!(cols, vec![0, 1, 2]);
    /// ```
    #[inline]
    pub fn range(len: usize) -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..len).map(Self::new)
    }
}

impl<T> std::fmt::Debug for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> std::fmt::Display for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> From<usize> for TypedIndex<T> {
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl<T> From<TypedIndex<T>> for usize {
    fn from(typed_index: TypedIndex<T>) -> Self {
        typed_index.index
    }
}

impl<T> std::ops::Add<usize> for TypedIndex<T> {
    type Output = Self;

    fn add(self, rhs: usize) -> Self::Output {
        Self::new(self.index + rhs)
    }
}

impl<T> std::ops::AddAssign<usize> for TypedIndex<T> {
    fn add_assign(&mut self, rhs: usize) {
        self.index += rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
    struct CellTag;

    impl TypedIndexTag for CellTag {
        const NAME: &'static str = "CellIdx";
    }

    type CellIndex = TypedIndex<CellTag>;

    #[test]
    fn test_new_and_get() {
        assert_eq!(CellIndex::new(10).get(), 10);
        assert_eq!(CellIndex::new(10).next().get(), 11);
    }

    #[test]
    fn test_conversions() {
        let idx: CellIndex = 42.into();
        let raw: usize = idx.into();
        assert_eq!(raw, 42);
    }

    #[test]
    fn test_debug_and_display() {
        let idx = CellIndex::new(7);
        assert_eq!(format!("{}", idx), "CellIdx(7)");
        assert_eq!(format!("{:?}", idx), "CellIdx(7)");
    }

    #[test]
    fn test_add() {
        let mut idx = CellIndex::new(1);
        assert_eq!((idx + 4).get(), 5);
        idx += 2;
        assert_eq!(idx.get(), 3);
    }

    #[test]
    fn test_range_is_ordered() {
        let collected: Vec<CellIndex> = CellIndex::range(3).collect();
        assert_eq!(collected, vec![CellIndex::new(0), CellIndex::new(1), CellIndex::new(2)]);
        assert_eq!(CellIndex::range(0).len(), 0);
    }
}
