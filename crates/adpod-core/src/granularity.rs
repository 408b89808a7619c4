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

//! # Granularity
//!
//! Requested pod and slot durations are normalized onto a fixed rounding
//! unit before planning. `Granularity<T>` carries that unit (default `5`)
//! and implements the three rounding directions the planner needs:
//!
//! - [`Granularity::round_nearest`]: exact bounds (`min == max`) snap to the
//!   closest multiple, halves rounding away from zero.
//! - [`Granularity::round_up`]: lower bounds never drop below the request.
//! - [`Granularity::round_down`]: upper bounds never exceed the request.
//!
//! All rounding functions expect non-negative durations; configuration
//! validation rejects negative input before it reaches them.

use crate::duration::Duration;
use num_traits::{NumCast, PrimInt, Signed};
use std::fmt::Display;

/// The default rounding unit in time units.
pub const DEFAULT_GRANULARITY: i64 = 5;

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Granularity<T: PrimInt + Signed>(T);

impl<T: PrimInt + Signed> Granularity<T> {
    /// Creates a granularity. Returns `None` unless `unit > 0`.
    #[inline]
    pub fn new(unit: T) -> Option<Self> {
        if unit > T::zero() {
            Some(Self(unit))
        } else {
            None
        }
    }

    #[inline]
    pub const fn value(self) -> T {
        self.0
    }

    #[inline]
    pub fn as_duration(self) -> Duration<T> {
        Duration::new(self.0)
    }

    /// Returns `true` if `d` is a whole multiple of the unit.
    ///
    /// ```
    /// use adpod_core::{duration::Duration, granularity::Granularity};
    ///
    /// let g = Granularity::<i64>::default();
    /// assert!(g.is_multiple(Duration::new(15)));
    /// assert!(!g.is_multiple(Duration::new(6)));
    /// ```
    #[inline]
    pub fn is_multiple(self, d: Duration<T>) -> bool {
        (d.value() % self.0).is_zero()
    }

    /// Rounds `d` to the closest multiple of the unit, halves away from zero.
    ///
    /// # Panics
    ///
    /// Panics if the rounded value overflows `T`. See
    /// [`Granularity::checked_round_nearest`].
    ///
    /// ```
    /// use adpod_core::{duration::Duration, granularity::Granularity};
    ///
    /// let g = Granularity::<i64>::default();
    /// assert_eq!(g.round_nearest(Duration::new(126)), Duration::new(125));
    /// assert_eq!(g.round_nearest(Duration::new(134)), Duration::new(135));
    /// assert_eq!(g.round_nearest(Duration::new(2)), Duration::new(0));
    /// ```
    pub fn round_nearest(self, d: Duration<T>) -> Duration<T> {
        self.checked_round_nearest(d).expect("overflow in Granularity::round_nearest")
    }

    /// Like [`Granularity::round_nearest`], but `None` on overflow.
    ///
    /// ```
    /// use adpod_core::{duration::Duration, granularity::Granularity};
    ///
    /// let g = Granularity::new(10_i64).unwrap();
    /// assert_eq!(g.checked_round_nearest(Duration::new(i64::MAX)), None);
    /// assert_eq!(g.checked_round_nearest(Duration::new(16)), Some(Duration::new(20)));
    /// ```
    pub fn checked_round_nearest(self, d: Duration<T>) -> Option<Duration<T>> {
        let v = d.value();
        if v.is_negative() {
            let pos = T::zero().checked_sub(&v)?;
            return self.checked_round_nearest(Duration::new(pos)).map(|r| -r);
        }
        let q = v / self.0;
        let r = v % self.0;
        if r >= self.0 - r {
            q.checked_add(&T::one())?.checked_mul(&self.0).map(Duration::new)
        } else {
            Some(Duration::new(q * self.0))
        }
    }

    /// Rounds a lower bound onto the unit without going below it.
    ///
    /// A lower bound that would round to zero becomes one full unit. This
    /// includes `d = 0` itself, the one multiple that does not map to
    /// itself: `round_up(0)` is the unit, not zero.
    ///
    /// # Panics
    ///
    /// Panics if the rounded value overflows `T`. See
    /// [`Granularity::checked_round_up`].
    ///
    /// ```
    /// use adpod_core::{duration::Duration, granularity::Granularity};
    ///
    /// let g = Granularity::<i64>::default();
    /// assert_eq!(g.round_up(Duration::new(11)), Duration::new(15));
    /// assert_eq!(g.round_up(Duration::new(1)), Duration::new(5));
    /// assert_eq!(g.round_up(Duration::new(30)), Duration::new(30));
    /// assert_eq!(g.round_up(Duration::new(0)), Duration::new(5));
    /// ```
    pub fn round_up(self, d: Duration<T>) -> Duration<T> {
        self.checked_round_up(d).expect("overflow in Granularity::round_up")
    }

    /// Like [`Granularity::round_up`], but `None` on overflow.
    pub fn checked_round_up(self, d: Duration<T>) -> Option<Duration<T>> {
        let nearest = self.checked_round_nearest(d)?;
        if nearest.is_zero() {
            return Some(self.as_duration());
        }
        if nearest == d {
            return Some(d);
        }
        if nearest < d {
            return nearest.checked_add(self.as_duration());
        }
        Some(nearest)
    }

    /// Rounds an upper bound onto the unit without exceeding it.
    ///
    /// An upper bound whose floor multiple is zero is returned unchanged,
    /// so a small positive bound never collapses to nothing.
    ///
    /// ```
    /// use adpod_core::{duration::Duration, granularity::Granularity};
    ///
    /// let g = Granularity::<i64>::default();
    /// assert_eq!(g.round_down(Duration::new(12)), Duration::new(10));
    /// assert_eq!(g.round_down(Duration::new(124)), Duration::new(120));
    /// assert_eq!(g.round_down(Duration::new(4)), Duration::new(4));
    /// ```
    pub fn round_down(self, d: Duration<T>) -> Duration<T> {
        if self.is_multiple(d) {
            return d;
        }
        let floor = Duration::new((d.value() / self.0) * self.0);
        if floor.is_zero() {
            return d;
        }
        floor
    }

    /// Rounds a `[min, max]` pair the way requested bounds are normalized:
    /// an exact pair snaps both ends to the nearest multiple, otherwise the
    /// lower end rounds up and the upper end rounds down.
    ///
    /// # Panics
    ///
    /// Panics on overflow. See [`Granularity::checked_round_bounds`].
    pub fn round_bounds(self, min: Duration<T>, max: Duration<T>) -> (Duration<T>, Duration<T>) {
        self.checked_round_bounds(min, max).expect("overflow in Granularity::round_bounds")
    }

    /// Like [`Granularity::round_bounds`], but `None` on overflow.
    pub fn checked_round_bounds(
        self,
        min: Duration<T>,
        max: Duration<T>,
    ) -> Option<(Duration<T>, Duration<T>)> {
        if min == max {
            let v = self.checked_round_nearest(min)?;
            Some((v, v))
        } else {
            Some((self.checked_round_up(min)?, self.round_down(max)))
        }
    }
}

impl<T: PrimInt + Signed> Default for Granularity<T> {
    fn default() -> Self {
        let unit: T = NumCast::from(DEFAULT_GRANULARITY).unwrap_or_else(T::one);
        Self(unit)
    }
}

impl<T: PrimInt + Signed + Display> Display for Granularity<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Granularity({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g5() -> Granularity<i64> {
        Granularity::default()
    }

    fn d(v: i64) -> Duration<i64> {
        Duration::new(v)
    }

    #[test]
    fn test_granularity_rejects_non_positive() {
        assert!(Granularity::new(0_i64).is_none());
        assert!(Granularity::new(-5_i64).is_none());
        assert_eq!(Granularity::new(5_i64), Some(g5()));
    }

    #[test]
    fn test_is_multiple() {
        assert!(!g5().is_multiple(d(6)));
        assert!(g5().is_multiple(d(0)));
        assert!(g5().is_multiple(d(90)));
    }

    #[test]
    fn test_round_nearest() {
        assert_eq!(g5().round_nearest(d(9)), d(10));
        assert_eq!(g5().round_nearest(d(7)), d(5));
        assert_eq!(g5().round_nearest(d(8)), d(10));
        assert_eq!(g5().round_nearest(d(67)), d(65));
        assert_eq!(g5().round_nearest(d(-7)), d(-5));
    }

    #[test]
    fn test_round_nearest_even_unit_rounds_half_up() {
        let g = Granularity::new(10_i64).unwrap();
        assert_eq!(g.round_nearest(d(15)), d(20));
        assert_eq!(g.round_nearest(d(14)), d(10));
    }

    #[test]
    fn test_round_up_cases() {
        assert_eq!(g5().round_up(d(0)), d(5));
        assert_eq!(g5().round_up(d(2)), d(5));
        assert_eq!(g5().round_up(d(4)), d(5));
        assert_eq!(g5().round_up(d(8)), d(10));
        assert_eq!(g5().round_up(d(118)), d(120));
        assert_eq!(g5().round_up(d(127)), d(130));
    }

    #[test]
    fn test_round_down_cases() {
        assert_eq!(g5().round_down(d(9)), d(5));
        assert_eq!(g5().round_down(d(17)), d(15));
        assert_eq!(g5().round_down(d(128)), d(125));
        assert_eq!(g5().round_down(d(2)), d(2));
        assert_eq!(g5().round_down(d(0)), d(0));
    }

    #[test]
    fn test_rounding_is_idempotent_on_multiples() {
        for k in 0..50 {
            let v = d(k * 5);
            assert_eq!(g5().round_nearest(v), v);
            assert_eq!(g5().round_down(v), v);
            if k > 0 {
                assert_eq!(g5().round_up(v), v);
            }
        }
    }

    #[test]
    fn test_round_up_zero_is_one_unit() {
        assert_eq!(g5().round_up(d(0)), d(5));
        let g = Granularity::new(10_i64).unwrap();
        assert_eq!(g.round_up(d(0)), d(10));
    }

    #[test]
    fn test_checked_rounding_near_max() {
        let g10 = Granularity::new(10_i64).unwrap();
        assert_eq!(g10.checked_round_nearest(d(i64::MAX)), None);
        assert_eq!(g10.checked_round_bounds(d(i64::MAX), d(i64::MAX)), None);

        let g = g5();
        assert_eq!(g.checked_round_up(d(i64::MAX - 1)), None);
        assert_eq!(g.checked_round_bounds(d(i64::MAX - 1), d(i64::MAX)), None);

        let top = i64::MAX - i64::MAX % 5;
        assert_eq!(g.checked_round_nearest(d(i64::MAX)), Some(d(top)));
        assert_eq!(g.checked_round_nearest(d(top + 1)), Some(d(top)));
        assert_eq!(g.round_down(d(i64::MAX)), d(top));
    }

    #[test]
    fn test_checked_rounding_near_min() {
        let g = g5();
        assert_eq!(g.checked_round_nearest(d(i64::MIN)), None);
        assert_eq!(g.checked_round_nearest(d(-8)), Some(d(-10)));
    }

    #[test]
    fn test_large_unit_halves() {
        let g = Granularity::new(i64::MAX).unwrap();
        assert_eq!(g.checked_round_nearest(d(i64::MAX / 2)), Some(d(0)));
        assert_eq!(g.checked_round_nearest(d(i64::MAX / 2 + 1)), Some(d(i64::MAX)));
        assert_eq!(g.checked_round_nearest(d(i64::MAX)), Some(d(i64::MAX)));
    }

    #[test]
    fn test_directional_bound_safety() {
        for g in [2_i64, 3, 5, 7, 10] {
            let g = Granularity::new(g).unwrap();
            for v in 0..200 {
                assert!(g.round_up(d(v)) >= d(v), "round_up({v}) below request");
                assert!(g.round_down(d(v)) <= d(v), "round_down({v}) above request");
            }
        }
    }

    #[test]
    fn test_round_bounds() {
        assert_eq!(g5().round_bounds(d(126), d(126)), (d(125), d(125)));
        assert_eq!(g5().round_bounds(d(1), d(90)), (d(5), d(90)));
        assert_eq!(g5().round_bounds(d(127), d(128)), (d(130), d(125)));
        assert_eq!(g5().round_bounds(d(45), d(45)), (d(45), d(45)));
    }
}
