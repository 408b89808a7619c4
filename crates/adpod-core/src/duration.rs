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

//! # Durations
//!
//! `Duration<T>` is the single time quantity of the ad pod domain: pod
//! lengths, slot lengths, candidate ad lengths and free time are all
//! expressed in it. The newtype keeps durations from being mixed up with
//! ad counts or slot indices, which are plain `usize` values.
//!
//! Operator impls panic on overflow with a descriptive message; the
//! `checked_*` and `saturating_*` methods are the non-panicking forms.

use num_traits::{CheckedAdd, CheckedSub, PrimInt, SaturatingAdd, Signed, Zero};
use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Duration<T: PrimInt + Signed>(T);

impl<T: PrimInt + Signed> Default for Duration<T> {
    #[inline]
    fn default() -> Self {
        Duration(T::zero())
    }
}

impl<T: PrimInt + Signed> From<T> for Duration<T> {
    #[inline]
    fn from(v: T) -> Self {
        Duration(v)
    }
}

impl<T: PrimInt + Signed> Duration<T> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    #[inline]
    pub fn zero() -> Self {
        Self(T::zero())
    }

    #[inline]
    pub const fn value(self) -> T {
        self.0
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0.is_negative()
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0.is_positive()
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Clamps `self` into `[lo, hi]` without requiring `lo <= hi`.
    ///
    /// The lower bound is applied first and the upper bound second, so an
    /// inverted pair resolves to `hi`. Normalized slot bounds can invert
    /// (e.g. a requested `7..=9` slot rounds to `10..=5`), and planning
    /// must not panic on such input.
    #[inline]
    pub fn clamp_lenient(self, lo: Duration<T>, hi: Duration<T>) -> Duration<T> {
        let mut v = self;
        if v < lo {
            v = lo;
        }
        if v > hi {
            v = hi;
        }
        v
    }

    #[inline]
    pub fn checked_add(self, rhs: Duration<T>) -> Option<Self> {
        self.0.checked_add(&rhs.0).map(Duration)
    }

    #[inline]
    pub fn checked_sub(self, rhs: Duration<T>) -> Option<Self> {
        self.0.checked_sub(&rhs.0).map(Duration)
    }

    #[inline]
    pub fn saturating_add(self, rhs: Duration<T>) -> Self {
        Duration(self.0.saturating_add(rhs.0))
    }

    #[inline]
    pub fn saturating_sub(self, rhs: Duration<T>) -> Self {
        Duration(self.0.saturating_sub(rhs.0))
    }

    #[inline]
    pub fn checked_mul(self, rhs: T) -> Option<Self> {
        self.0.checked_mul(&rhs).map(Duration)
    }

    /// Floor-divides by a scalar. `None` on division by zero.
    #[inline]
    pub fn checked_div(self, rhs: T) -> Option<Self> {
        self.0.checked_div(&rhs).map(Duration)
    }

    /// How many whole `rhs` fit into `self` (floor division).
    #[inline]
    pub fn checked_div_duration(self, rhs: Duration<T>) -> Option<T> {
        self.0.checked_div(&rhs.0)
    }

    #[inline]
    pub fn checked_rem(self, rhs: Duration<T>) -> Option<Self> {
        if rhs.0.is_zero() {
            return None;
        }
        Some(Duration(self.0 % rhs.0))
    }
}

impl<T: PrimInt + Signed + Display> Display for Duration<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Duration({})", self.0)
    }
}

impl<T: PrimInt + Signed> Add for Duration<T> {
    type Output = Duration<T>;

    fn add(self, rhs: Self) -> Self::Output {
        Duration(
            self.0
                .checked_add(&rhs.0)
                .expect("overflow in Duration + Duration"),
        )
    }
}

impl<T: PrimInt + Signed> AddAssign for Duration<T> {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self
            .0
            .checked_add(&rhs.0)
            .expect("overflow in Duration += Duration");
    }
}

impl<T: PrimInt + Signed> Sub for Duration<T> {
    type Output = Duration<T>;

    fn sub(self, rhs: Self) -> Self::Output {
        Duration(
            self.0
                .checked_sub(&rhs.0)
                .expect("underflow in Duration - Duration"),
        )
    }
}

impl<T: PrimInt + Signed> SubAssign for Duration<T> {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self
            .0
            .checked_sub(&rhs.0)
            .expect("underflow in Duration -= Duration");
    }
}

impl<T: PrimInt + Signed> Mul<T> for Duration<T> {
    type Output = Duration<T>;

    fn mul(self, rhs: T) -> Self::Output {
        Duration(
            self.0
                .checked_mul(&rhs)
                .expect("overflow in Duration * scalar"),
        )
    }
}

impl<T: PrimInt + Signed> Neg for Duration<T> {
    type Output = Duration<T>;

    fn neg(self) -> Self::Output {
        Duration(
            T::zero()
                .checked_sub(&self.0)
                .expect("underflow in -Duration"),
        )
    }
}

impl<T: PrimInt + Signed> Zero for Duration<T> {
    #[inline]
    fn zero() -> Self {
        Duration(T::zero())
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl<T: PrimInt + Signed> CheckedAdd for Duration<T> {
    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        self.0.checked_add(&rhs.0).map(Duration)
    }
}

impl<T: PrimInt + Signed> CheckedSub for Duration<T> {
    fn checked_sub(&self, rhs: &Self) -> Option<Self> {
        self.0.checked_sub(&rhs.0).map(Duration)
    }
}

impl<T: PrimInt + Signed> SaturatingAdd for Duration<T> {
    fn saturating_add(&self, rhs: &Self) -> Self {
        Duration(self.0.saturating_add(rhs.0))
    }
}

impl<T: PrimInt + Signed> Sum for Duration<T> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Duration::zero(), |acc, d| acc + d)
    }
}

impl<'a, T: PrimInt + Signed> Sum<&'a Duration<T>> for Duration<T> {
    fn sum<I: Iterator<Item = &'a Duration<T>>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_display() {
        let d = Duration::new(-10);
        assert_eq!(format!("{}", d), "Duration(-10)");
    }

    #[test]
    fn test_duration_from() {
        let value: i32 = 42;
        let d: Duration<i32> = value.into();
        assert_eq!(d.value(), 42);
    }

    #[test]
    fn test_duration_sign_predicates() {
        assert!(Duration::new(-1).is_negative());
        assert!(Duration::new(1).is_positive());
        assert!(Duration::new(0).is_zero());
        assert!(!Duration::new(0).is_positive());
    }

    #[test]
    fn test_duration_add_sub() {
        let a = Duration::new(10);
        let b = Duration::new(5);
        assert_eq!(a + b, Duration::new(15));
        assert_eq!(a - b, Duration::new(5));

        let mut c = a;
        c += b;
        assert_eq!(c, Duration::new(15));
        c -= Duration::new(15);
        assert!(c.is_zero());
    }

    #[test]
    fn test_duration_sum() {
        let ds = [Duration::new(15), Duration::new(10), Duration::new(1)];
        let total: Duration<i64> = ds.iter().sum();
        assert_eq!(total, Duration::new(26));
        let empty: Vec<Duration<i64>> = Vec::new();
        assert_eq!(empty.into_iter().sum::<Duration<i64>>(), Duration::zero());
    }

    #[test]
    fn test_duration_checked_div_duration() {
        let pod = Duration::new(125_i64);
        assert_eq!(pod.checked_div_duration(Duration::new(10)), Some(12));
        assert_eq!(pod.checked_div_duration(Duration::new(5)), Some(25));
        assert_eq!(pod.checked_div_duration(Duration::zero()), None);
    }

    #[test]
    fn test_duration_checked_div_scalar() {
        assert_eq!(Duration::new(90_i64).checked_div(8), Some(Duration::new(11)));
        assert_eq!(Duration::new(90_i64).checked_div(0), None);
    }

    #[test]
    fn test_duration_clamp_lenient_regular() {
        let lo = Duration::new(5);
        let hi = Duration::new(15);
        assert_eq!(Duration::new(3).clamp_lenient(lo, hi), lo);
        assert_eq!(Duration::new(20).clamp_lenient(lo, hi), hi);
        assert_eq!(Duration::new(9).clamp_lenient(lo, hi), Duration::new(9));
    }

    #[test]
    fn test_duration_clamp_lenient_inverted_prefers_upper() {
        let lo = Duration::new(10);
        let hi = Duration::new(5);
        assert_eq!(Duration::new(18).clamp_lenient(lo, hi), hi);
        assert_eq!(Duration::new(1).clamp_lenient(lo, hi), hi);
    }

    #[test]
    fn test_duration_checked_overflow() {
        let d = Duration::new(i32::MAX);
        assert_eq!(d.checked_add(Duration::new(1)), None);
        assert_eq!(
            d.saturating_add(Duration::new(1)),
            Duration::new(i32::MAX)
        );
    }

    #[test]
    #[should_panic(expected = "overflow in Duration + Duration")]
    fn test_duration_add_panic_on_overflow() {
        let _ = Duration::new(i32::MAX) + Duration::new(1);
    }

    #[test]
    #[should_panic(expected = "underflow in -Duration")]
    fn test_duration_neg_panic_on_overflow() {
        let _ = -Duration::new(i32::MIN);
    }
}
