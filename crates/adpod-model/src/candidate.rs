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

//! Duration candidates and the combinations drawn from them.

use adpod_core::{SolverVariable, duration::Duration};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt::Display;

/// A duration together with how many distinct ads exist at that duration.
///
/// A duration may appear more than once in a combination only when
/// `available_ad_count > 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DurationCandidate<T: SolverVariable> {
    duration: Duration<T>,
    available_ad_count: usize,
}

impl<T: SolverVariable> DurationCandidate<T> {
    #[inline]
    pub fn new(duration: Duration<T>, available_ad_count: usize) -> Self {
        Self {
            duration,
            available_ad_count,
        }
    }

    #[inline]
    pub fn duration(&self) -> Duration<T> {
        self.duration
    }

    #[inline]
    pub fn available_ad_count(&self) -> usize {
        self.available_ad_count
    }

    #[inline]
    pub fn allows_repetition(&self) -> bool {
        self.available_ad_count > 1
    }

    /// Groups raw ad durations into candidates, in first-seen order.
    ///
    /// ```
    /// use adpod_core::duration::Duration;
    /// use adpod_model::candidate::DurationCandidate;
    ///
    /// let raw = [15_i64, 30, 15, 10].map(Duration::new);
    /// let c = DurationCandidate::from_durations(raw);
    /// assert_eq!(c.len(), 3);
    /// assert_eq!(c[0].duration(), Duration::new(15));
    /// assert_eq!(c[0].available_ad_count(), 2);
    /// ```
    pub fn from_durations<I>(durations: I) -> Vec<Self>
    where
        I: IntoIterator<Item = Duration<T>>,
    {
        let mut index: FxHashMap<Duration<T>, usize> = FxHashMap::default();
        let mut out: Vec<Self> = Vec::new();
        for d in durations {
            match index.get(&d) {
                Some(&i) => out[i].available_ad_count += 1,
                None => {
                    index.insert(d, out.len());
                    out.push(Self::new(d, 1));
                }
            }
        }
        out
    }
}

impl<T: SolverVariable> Display for DurationCandidate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.duration.value(), self.available_ad_count)
    }
}

/// An ordered selection of durations, one per ad.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Combination<T: SolverVariable>(Vec<Duration<T>>);

impl<T: SolverVariable> Combination<T> {
    #[inline]
    pub fn new(durations: Vec<Duration<T>>) -> Self {
        Self(durations)
    }

    #[inline]
    pub fn durations(&self) -> &[Duration<T>] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all durations.
    #[inline]
    pub fn total(&self) -> Duration<T> {
        self.0.iter().sum()
    }

    #[inline]
    pub fn into_vec(self) -> Vec<Duration<T>> {
        self.0
    }

    /// Raw duration values, mostly useful for assertions and reports.
    pub fn values(&self) -> Vec<T> {
        self.0.iter().map(|d| d.value()).collect()
    }
}

impl<T: SolverVariable> Display for Combination<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d.value())?;
        }
        write!(f, "]")
    }
}
