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

//! Planner output: slots, plan results and derived sub-impressions.

use adpod_core::{SolverVariable, duration::Duration};
use serde::Serialize;
use std::fmt::Display;

/// One ad position within a pod.
///
/// `min` and `max` are normally equal. They differ only on the slot that
/// absorbed the remainder lost to rounding the pod bounds, where `min` is
/// pinned to the requested slot minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Slot<T: SolverVariable> {
    min: Duration<T>,
    max: Duration<T>,
}

impl<T: SolverVariable> Slot<T> {
    #[inline]
    pub fn new(min: Duration<T>, max: Duration<T>) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn min(&self) -> Duration<T> {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Duration<T> {
        self.max
    }

    /// A slot that never received any time.
    #[inline]
    pub fn is_unfilled(&self) -> bool {
        self.min.is_zero() || self.max.is_zero()
    }
}

impl<T: SolverVariable> Display for Slot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Slot({}, {})", self.min.value(), self.max.value())
    }
}

/// Result of planning one pod.
///
/// An empty slot list with `free_time` equal to the requested pod maximum
/// is the failure signal; there is no partial plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PlanResult<T: SolverVariable> {
    slots: Vec<Slot<T>>,
    total_allocated: Duration<T>,
    free_time: Duration<T>,
}

impl<T: SolverVariable> PlanResult<T> {
    /// A successful plan. `free_time` is what remains of `requested_max`.
    pub fn allocated(slots: Vec<Slot<T>>, requested_max: Duration<T>) -> Self {
        let total_allocated: Duration<T> = slots.iter().map(|s| s.max).sum();
        Self {
            slots,
            total_allocated,
            free_time: requested_max - total_allocated,
        }
    }

    /// A failed plan: no slots, nothing allocated.
    pub fn failed(requested_max: Duration<T>) -> Self {
        Self {
            slots: Vec::new(),
            total_allocated: Duration::zero(),
            free_time: requested_max,
        }
    }

    #[inline]
    pub fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }

    #[inline]
    pub fn total_allocated(&self) -> Duration<T> {
        self.total_allocated
    }

    #[inline]
    pub fn free_time(&self) -> Duration<T> {
        self.free_time
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        !self.slots.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// One sub-impression per slot, with ids `<base_id>_<seq>` and
    /// sequence numbers starting at 1.
    ///
    /// ```
    /// use adpod_core::duration::Duration;
    /// use adpod_model::slot::{PlanResult, Slot};
    ///
    /// let d = Duration::<i64>::new;
    /// let plan = PlanResult::allocated(vec![Slot::new(d(15), d(15)), Slot::new(d(10), d(10))], d(30));
    /// let imps = plan.impressions("imp");
    /// assert_eq!(imps[1].id(), "imp_2");
    /// assert_eq!(imps[1].sequence(), 2);
    /// ```
    pub fn impressions(&self, base_id: &str) -> Vec<SlotImpression<T>> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, s)| SlotImpression::new(base_id, i + 1, s.min, s.max))
            .collect()
    }
}

/// A slot expressed as a standalone sub-impression for a downstream auction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SlotImpression<T: SolverVariable> {
    id: String,
    sequence: usize,
    min_duration: Duration<T>,
    max_duration: Duration<T>,
}

impl<T: SolverVariable> SlotImpression<T> {
    pub fn new(
        base_id: &str,
        sequence: usize,
        min_duration: Duration<T>,
        max_duration: Duration<T>,
    ) -> Self {
        Self {
            id: format!("{}_{}", base_id, sequence),
            sequence,
            min_duration,
            max_duration,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    #[inline]
    pub fn min_duration(&self) -> Duration<T> {
        self.min_duration
    }

    #[inline]
    pub fn max_duration(&self) -> Duration<T> {
        self.max_duration
    }

    /// Splits a sub-impression id into its base id and sequence number.
    ///
    /// The sequence is the second `_`-separated part; it defaults to `1`
    /// when missing or not a number.
    pub fn decode_id(id: &str) -> (&str, usize) {
        let mut parts = id.split('_');
        let base = parts.next().unwrap_or(id);
        let sequence = parts
            .next()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(1);
        (base, sequence)
    }
}
