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

//! Saturating integer operations behind by-value traits.
//!
//! Cardinalities in this workspace are unsigned and bounded by a system
//! ceiling. Scaling a per-instance restriction by a pool count, or summing
//! the counts of several pools, must clamp instead of wrapping, so generic
//! code is written against these traits rather than the inherent methods.

macro_rules! saturating_val_trait {
    ($(#[$doc:meta])* $trait_name:ident, $method:ident, $src_method:ident; $($t:ty),*) => {
        $(#[$doc])*
        pub trait $trait_name: Sized + Copy {
            fn $method(self, rhs: Self) -> Self;
        }

        $(
            impl $trait_name for $t {
                #[inline(always)]
                fn $method(self, rhs: Self) -> Self {
                    <$t>::$src_method(self, rhs)
                }
            }
        )*
    };
}

saturating_val_trait!(
    /// Saturating addition by value.
    ///
    /// ```rust
    /// # use muster_core::num::saturating::SaturatingAddVal;
    /// assert_eq!(250u8.saturating_add_val(10), 255);
    /// assert_eq!((-120i8).saturating_add_val(-20), -128);
    /// ```
    SaturatingAddVal, saturating_add_val, saturating_add;
    u8, u16, u32, u64, usize, i8, i16, i32, i64, isize
);

saturating_val_trait!(
    /// Saturating subtraction by value.
    ///
    /// ```rust
    /// # use muster_core::num::saturating::SaturatingSubVal;
    /// assert_eq!(5u32.saturating_sub_val(10), 0);
    /// ```
    SaturatingSubVal, saturating_sub_val, saturating_sub;
    u8, u16, u32, u64, usize, i8, i16, i32, i64, isize
);

saturating_val_trait!(
    /// Saturating multiplication by value.
    ///
    /// ```rust
    /// # use muster_core::num::saturating::SaturatingMulVal;
    /// assert_eq!(u32::MAX.saturating_mul_val(2), u32::MAX);
    /// ```
    SaturatingMulVal, saturating_mul_val, saturating_mul;
    u8, u16, u32, u64, usize, i8, i16, i32, i64, isize
);

/// Sums an iterator of values, clamping at the numeric bounds of `T`.
///
/// ```rust
/// # use muster_core::num::saturating::saturating_sum;
/// assert_eq!(saturating_sum([200u8, 50, 10]), 255);
/// assert_eq!(saturating_sum(Vec::<u32>::new()), 0);
/// ```
#[inline]
pub fn saturating_sum<T, I>(values: I) -> T
where
    T: SaturatingAddVal + num_traits::Zero,
    I: IntoIterator<Item = T>,
{
    values
        .into_iter()
        .fold(T::zero(), |acc, v| acc.saturating_add_val(v))
}

/// Multiplies `value` by `factor` and clamps the result to `ceiling`.
///
/// ```rust
/// # use muster_core::num::saturating::scale_clamped;
/// assert_eq!(scale_clamped(3u32, 4, 100), 12);
/// assert_eq!(scale_clamped(u32::MAX, 2, 1000), 1000);
/// ```
#[inline]
pub fn scale_clamped<T>(value: T, factor: T, ceiling: T) -> T
where
    T: SaturatingMulVal + Ord,
{
    std::cmp::min(value.saturating_mul_val(factor), ceiling)
}
