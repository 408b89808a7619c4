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

//! # Closed bounds
//!
//! `Bounds<T>` is a closed range `[min, max]` used for every requested
//! range in pod planning: pod duration, slot duration and ad count.
//! Both ends are inclusive, so `min == max` describes an exact value.

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Bounds<T> {
    min: T,
    max: T,
}

impl<T: Ord + Copy> Bounds<T> {
    /// Creates closed bounds from two values, ordering them if needed.
    ///
    /// # Examples
    ///
    /// ```
    /// use adpod_core::bounds::Bounds;
    ///
    /// let b = Bounds::new(30, 5);
    /// assert_eq!(b.min(), 5);
    /// assert_eq!(b.max(), 30);
    /// ```
    #[inline]
    pub fn new(a: T, b: T) -> Self {
        if a > b {
            Self { min: b, max: a }
        } else {
            Self { min: a, max: b }
        }
    }

    /// Creates closed bounds, returning `None` when `min > max`.
    ///
    /// # Examples
    ///
    /// ```
    /// use adpod_core::bounds::Bounds;
    ///
    /// assert!(Bounds::checked(5, 30).is_some());
    /// assert!(Bounds::checked(30, 5).is_none());
    /// ```
    #[inline]
    pub fn checked(min: T, max: T) -> Option<Self> {
        if min > max {
            None
        } else {
            Some(Self { min, max })
        }
    }

    /// Bounds containing exactly one value.
    #[inline]
    pub fn exact(value: T) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    #[inline]
    pub fn min(&self) -> T {
        self.min
    }

    #[inline]
    pub fn max(&self) -> T {
        self.max
    }

    /// Returns `true` if `min == max`.
    #[inline]
    pub fn is_exact(&self) -> bool {
        self.min == self.max
    }

    /// Returns `true` if `value` lies in `[min, max]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use adpod_core::bounds::Bounds;
    ///
    /// let b = Bounds::new(10, 20);
    /// assert!(b.contains(10));
    /// assert!(b.contains(20));
    /// assert!(!b.contains(21));
    /// ```
    #[inline]
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    /// Applies `f` to both ends and reorders the result if needed.
    #[inline]
    pub fn map<U: Ord + Copy>(self, mut f: impl FnMut(T) -> U) -> Bounds<U> {
        Bounds::new(f(self.min), f(self.max))
    }

    /// The part of `self` that also lies in `other`, if any.
    #[inline]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        Self::checked(self.min.max(other.min), self.max.min(other.max))
    }
}

impl<T: Display> Display for Bounds<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::Duration;

    #[test]
    fn test_new_orders_ends() {
        let b = Bounds::new(7, 3);
        assert_eq!((b.min(), b.max()), (3, 7));
        let b = Bounds::new(3, 7);
        assert_eq!((b.min(), b.max()), (3, 7));
    }

    #[test]
    fn test_checked_rejects_inverted() {
        assert_eq!(Bounds::checked(4, 2), None);
        assert_eq!(Bounds::checked(2, 2), Some(Bounds::exact(2)));
    }

    #[test]
    fn test_contains_is_closed() {
        let b = Bounds::new(Duration::new(15_i64), Duration::new(30));
        assert!(b.contains(Duration::new(15)));
        assert!(b.contains(Duration::new(30)));
        assert!(!b.contains(Duration::new(14)));
        assert!(!b.contains(Duration::new(31)));
    }

    #[test]
    fn test_is_exact() {
        assert!(Bounds::exact(5).is_exact());
        assert!(!Bounds::new(5, 6).is_exact());
    }

    #[test]
    fn test_map_reorders() {
        let b = Bounds::new(1, 4).map(|v: i32| -v);
        assert_eq!((b.min(), b.max()), (-4, -1));
    }

    #[test]
    fn test_intersection() {
        let a = Bounds::new(1, 10);
        assert_eq!(a.intersection(&Bounds::new(5, 20)), Some(Bounds::new(5, 10)));
        assert_eq!(a.intersection(&Bounds::new(11, 20)), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Bounds::new(2, 9)), "[2, 9]");
    }
}
