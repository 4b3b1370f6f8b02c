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

use num_traits::PrimInt;
use std::{
    cmp::{max, min},
    iter::FusedIterator,
};

/// A closed interval `[lo, hi]` of integers, both ends inclusive.
///
/// The interval always contains at least one point. It is the domain
/// representation for assignment variables: a variable is *fixed* once
/// `lo == hi`, and narrowing operations either return a strictly smaller
/// interval or report that the domain became empty.
///
/// # Invariants
/// `lo` must always be less than or equal to `hi`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClosedInterval<T>
where
    T: PrimInt,
{
    lo: T,
    hi: T,
}

/// An iterator over the integer points contained within a `ClosedInterval`.
///
/// # Examples
///
/// ```rust
/// # use muster_core::math::interval::ClosedInterval;
///
/// let iv = ClosedInterval::new(1u32, 4);
/// let points: Vec<_> = iv.iter().collect();
/// assert_eq!(points, vec![1, 2, 3, 4]);
/// ```
#[derive(Clone, Debug)]
pub struct ClosedIntervalIterator<T>
where
    T: PrimInt,
{
    current: T,
    last: T,
    exhausted: bool,
}

impl<T> Iterator for ClosedIntervalIterator<T>
where
    T: PrimInt,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let result = self.current;
        if self.current == self.last {
            self.exhausted = true;
        } else {
            self.current = self.current + T::one();
        }
        Some(result)
    }
}

impl<T> FusedIterator for ClosedIntervalIterator<T> where T: PrimInt {}

impl<T> ClosedInterval<T>
where
    T: PrimInt,
{
    /// Creates a new `ClosedInterval`.
    ///
    /// # Panics
    ///
    /// Panics if `lo > hi`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use muster_core::math::interval::ClosedInterval;
    ///
    /// let iv = ClosedInterval::new(0u32, 10);
    /// assert_eq!(iv.size(), 11);
    /// ```
    #[inline]
    pub fn new(lo: T, hi: T) -> Self {
        assert!(
            lo <= hi,
            "Invalid interval: lo must be less than or equal to hi"
        );
        Self { lo, hi }
    }

    /// Creates a new `ClosedInterval` if `lo <= hi`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use muster_core::math::interval::ClosedInterval;
    ///
    /// assert!(ClosedInterval::try_new(0u32, 10).is_some());
    /// assert!(ClosedInterval::try_new(10u32, 0).is_none());
    /// ```
    #[inline]
    pub fn try_new(lo: T, hi: T) -> Option<Self> {
        if lo <= hi { Some(Self { lo, hi }) } else { None }
    }

    /// Creates the single-point interval `[value, value]`.
    #[inline]
    pub fn singleton(value: T) -> Self {
        Self {
            lo: value,
            hi: value,
        }
    }

    /// Returns the inclusive lower end.
    #[inline]
    pub const fn lo(&self) -> T {
        self.lo
    }

    /// Returns the inclusive upper end.
    #[inline]
    pub const fn hi(&self) -> T {
        self.hi
    }

    /// Returns `hi - lo`, the width of the interval.
    ///
    /// A fixed interval has width zero. Used for smallest-domain-first ordering.
    #[inline]
    pub fn width(&self) -> T {
        self.hi - self.lo
    }

    /// Returns the number of points in the interval, saturating at `T::max_value()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use muster_core::math::interval::ClosedInterval;
    ///
    /// assert_eq!(ClosedInterval::new(3u32, 3).size(), 1);
    /// assert_eq!(ClosedInterval::new(0u8, 255).size(), 255);
    /// ```
    #[inline]
    pub fn size(&self) -> T {
        self.width().saturating_add(T::one())
    }

    /// Returns `true` if the interval contains exactly one point.
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.lo == self.hi
    }

    /// Returns `true` if `value` lies within `[lo, hi]`.
    #[inline]
    pub fn contains(&self, value: T) -> bool {
        self.lo <= value && value <= self.hi
    }

    /// Returns `true` if `other` is contained in `self`.
    #[inline]
    pub fn contains_interval(&self, other: Self) -> bool {
        self.lo <= other.lo && other.hi <= self.hi
    }

    /// Intersects two intervals, returning `None` if they are disjoint.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use muster_core::math::interval::ClosedInterval;
    ///
    /// let a = ClosedInterval::new(0u32, 10);
    /// let b = ClosedInterval::new(5u32, 15);
    /// assert_eq!(a.intersection(b), Some(ClosedInterval::new(5, 10)));
    /// assert_eq!(a.intersection(ClosedInterval::new(11, 12)), None);
    /// ```
    #[inline]
    pub fn intersection(&self, other: Self) -> Option<Self> {
        Self::try_new(max(self.lo, other.lo), min(self.hi, other.hi))
    }

    /// Narrows the interval to values `<= bound`.
    ///
    /// Returns `None` if the result would be empty.
    #[inline]
    pub fn at_most(&self, bound: T) -> Option<Self> {
        Self::try_new(self.lo, min(self.hi, bound))
    }

    /// Narrows the interval to values `>= bound`.
    ///
    /// Returns `None` if the result would be empty.
    #[inline]
    pub fn at_least(&self, bound: T) -> Option<Self> {
        Self::try_new(max(self.lo, bound), self.hi)
    }

    /// Returns the midpoint `lo + (hi - lo) / 2`, rounded towards `lo`.
    ///
    /// The computation cannot overflow.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use muster_core::math::interval::ClosedInterval;
    ///
    /// assert_eq!(ClosedInterval::new(0u32, 10).midpoint(), 5);
    /// assert_eq!(ClosedInterval::new(0u32, 3).midpoint(), 1);
    /// assert_eq!(ClosedInterval::new(250u8, 254).midpoint(), 252);
    /// ```
    #[inline]
    pub fn midpoint(&self) -> T {
        self.lo + (self.width() >> 1)
    }

    /// Splits the interval at its midpoint into `[lo, mid]` and `[mid + 1, hi]`.
    ///
    /// Returns `None` for a fixed interval, which cannot be split.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use muster_core::math::interval::ClosedInterval;
    ///
    /// let (lower, upper) = ClosedInterval::new(0u32, 3).split_at_midpoint().unwrap();
    /// assert_eq!(lower, ClosedInterval::new(0, 1));
    /// assert_eq!(upper, ClosedInterval::new(2, 3));
    /// ```
    #[inline]
    pub fn split_at_midpoint(&self) -> Option<(Self, Self)> {
        if self.is_fixed() {
            return None;
        }
        let mid = self.midpoint();
        Some((
            Self { lo: self.lo, hi: mid },
            Self {
                lo: mid + T::one(),
                hi: self.hi,
            },
        ))
    }

    /// Returns an iterator over the points of the interval in ascending order.
    #[inline]
    pub fn iter(&self) -> ClosedIntervalIterator<T> {
        ClosedIntervalIterator {
            current: self.lo,
            last: self.hi,
            exhausted: false,
        }
    }
}

impl<T> Default for ClosedInterval<T>
where
    T: PrimInt,
{
    fn default() -> Self {
        Self::singleton(T::zero())
    }
}

impl<T> std::fmt::Debug for ClosedInterval<T>
where
    T: PrimInt + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosedInterval")
            .field("lo", &self.lo)
            .field("hi", &self.hi)
            .finish()
    }
}

impl<T> std::fmt::Display for ClosedInterval<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

impl<T> IntoIterator for ClosedInterval<T>
where
    T: PrimInt,
{
    type Item = T;
    type IntoIter = ClosedIntervalIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> From<std::ops::RangeInclusive<T>> for ClosedInterval<T>
where
    T: PrimInt,
{
    #[inline]
    fn from(range: std::ops::RangeInclusive<T>) -> Self {
        let (lo, hi) = range.into_inner();
        Self::new(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_valid() {
        let iv = ClosedInterval::new(10u32, 20);
        assert_eq!(iv.lo(), 10);
        assert_eq!(iv.hi(), 20);
        assert_eq!(iv.width(), 10);
        assert_eq!(iv.size(), 11);
        assert!(!iv.is_fixed());
    }

    #[test]
    fn test_singleton_is_fixed() {
        let iv = ClosedInterval::singleton(7u32);
        assert!(iv.is_fixed());
        assert_eq!(iv.size(), 1);
        assert_eq!(ClosedInterval::<u32>::default(), ClosedInterval::singleton(0));
    }

    #[test]
    #[should_panic(expected = "Invalid interval")]
    fn test_new_panic() {
        ClosedInterval::new(10u32, 5);
    }

    #[test]
    fn test_try_new() {
        assert!(ClosedInterval::try_new(5u32, 10).is_some());
        assert!(ClosedInterval::try_new(5u32, 5).is_some());
        assert!(ClosedInterval::try_new(10u32, 5).is_none());
    }

    #[test]
    fn test_contains() {
        let iv = ClosedInterval::new(2u32, 4);
        assert!(!iv.contains(1));
        assert!(iv.contains(2));
        assert!(iv.contains(4));
        assert!(!iv.contains(5));
        assert!(iv.contains_interval(ClosedInterval::new(3, 4)));
        assert!(!iv.contains_interval(ClosedInterval::new(3, 5)));
    }

    #[test]
    fn test_narrowing() {
        let iv = ClosedInterval::new(2u32, 8);
        assert_eq!(iv.at_most(5), Some(ClosedInterval::new(2, 5)));
        assert_eq!(iv.at_most(100), Some(iv));
        assert_eq!(iv.at_most(1), None);
        assert_eq!(iv.at_least(5), Some(ClosedInterval::new(5, 8)));
        assert_eq!(iv.at_least(0), Some(iv));
        assert_eq!(iv.at_least(9), None);
    }

    #[test]
    fn test_intersection() {
        let a = ClosedInterval::new(0u32, 10);
        assert_eq!(
            a.intersection(ClosedInterval::new(10, 12)),
            Some(ClosedInterval::singleton(10))
        );
        assert_eq!(a.intersection(ClosedInterval::new(11, 12)), None);
        assert_eq!(a.intersection(ClosedInterval::new(2, 3)), Some(ClosedInterval::new(2, 3)));
    }

    #[test]
    fn test_split_at_midpoint() {
        let iv = ClosedInterval::new(0u32, 4);
        let (lower, upper) = iv.split_at_midpoint().unwrap();
        assert_eq!(lower, ClosedInterval::new(0, 2));
        assert_eq!(upper, ClosedInterval::new(3, 4));

        let (lower, upper) = ClosedInterval::new(6u32, 7).split_at_midpoint().unwrap();
        assert_eq!(lower, ClosedInterval::singleton(6));
        assert_eq!(upper, ClosedInterval::singleton(7));

        assert!(ClosedInterval::singleton(3u32).split_at_midpoint().is_none());
    }

    #[test]
    fn test_split_covers_domain_without_overlap() {
        let iv = ClosedInterval::new(0u32, u32::MAX);
        let (lower, upper) = iv.split_at_midpoint().unwrap();
        assert_eq!(lower.lo(), 0);
        assert_eq!(upper.hi(), u32::MAX);
        assert_eq!(lower.hi() + 1, upper.lo());
    }

    #[test]
    fn test_iterator() {
        let collected: Vec<u32> = ClosedInterval::new(1u32, 3).iter().collect();
        assert_eq!(collected, vec![1, 2, 3]);

        let top: Vec<u8> = ClosedInterval::new(254u8, 255).into_iter().collect();
        assert_eq!(top, vec![254, 255]);
    }

    #[test]
    fn test_fused_iterator() {
        let mut iter = ClosedInterval::singleton(0u32).iter();
        assert_eq!(iter.next(), Some(0));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_display_debug() {
        let iv = ClosedInterval::new(1u32, 3);
        assert_eq!(format!("{}", iv), "[1, 3]");
        assert_eq!(format!("{:?}", iv), "ClosedInterval { lo: 1, hi: 3 }");
    }

    #[test]
    fn test_from_range_inclusive() {
        let iv = ClosedInterval::from(2u32..=9);
        assert_eq!(iv.lo(), 2);
        assert_eq!(iv.hi(), 9);
    }
}
