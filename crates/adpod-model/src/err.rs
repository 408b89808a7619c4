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

use adpod_core::{SolverVariable, duration::Duration};
use std::fmt::{Debug, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NegativeDurationError<T: SolverVariable> {
    field: &'static str,
    value: Duration<T>,
}

impl<T: SolverVariable> NegativeDurationError<T> {
    #[inline]
    pub fn new(field: &'static str, value: Duration<T>) -> Self {
        Self { field, value }
    }

    #[inline]
    pub fn field(&self) -> &'static str {
        self.field
    }

    #[inline]
    pub fn value(&self) -> Duration<T> {
        self.value
    }
}

impl<T: SolverVariable> Display for NegativeDurationError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} must not be negative, got {}", self.field, self.value)
    }
}

impl<T: SolverVariable> std::error::Error for NegativeDurationError<T> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvertedBoundsError<V> {
    field: &'static str,
    min: V,
    max: V,
}

impl<V: Copy> InvertedBoundsError<V> {
    #[inline]
    pub fn new(field: &'static str, min: V, max: V) -> Self {
        Self { field, min, max }
    }

    #[inline]
    pub fn field(&self) -> &'static str {
        self.field
    }

    #[inline]
    pub fn min(&self) -> V {
        self.min
    }

    #[inline]
    pub fn max(&self) -> V {
        self.max
    }
}

impl<V: Display> Display for InvertedBoundsError<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} bounds are inverted: min {} > max {}",
            self.field, self.min, self.max
        )
    }
}

impl<V: Display + Debug> std::error::Error for InvertedBoundsError<V> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZeroMinAdsError;

impl Display for ZeroMinAdsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "min_ads must be at least 1")
    }
}

impl std::error::Error for ZeroMinAdsError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidGranularityError<T: SolverVariable> {
    value: T,
}

impl<T: SolverVariable> InvalidGranularityError<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Self { value }
    }

    #[inline]
    pub fn value(&self) -> T {
        self.value
    }
}

impl<T: SolverVariable> Display for InvalidGranularityError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "granularity must be positive, got {}", self.value)
    }
}

impl<T: SolverVariable> std::error::Error for InvalidGranularityError<T> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PodConfigError<T: SolverVariable> {
    NegativeDuration(NegativeDurationError<T>),
    InvertedDurationBounds(InvertedBoundsError<Duration<T>>),
    InvertedAdCount(InvertedBoundsError<usize>),
    ZeroMinAds(ZeroMinAdsError),
    InvalidGranularity(InvalidGranularityError<T>),
    MissingPodDuration,
}

impl<T: SolverVariable> Display for PodConfigError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use PodConfigError::*;
        match self {
            NegativeDuration(e) => write!(f, "{}", e),
            InvertedDurationBounds(e) => write!(f, "{}", e),
            InvertedAdCount(e) => write!(f, "{}", e),
            ZeroMinAds(e) => write!(f, "{}", e),
            InvalidGranularity(e) => write!(f, "{}", e),
            MissingPodDuration => write!(f, "Missing pod duration"),
        }
    }
}

impl<T: SolverVariable> std::error::Error for PodConfigError<T> {}

impl<T: SolverVariable> From<NegativeDurationError<T>> for PodConfigError<T> {
    fn from(err: NegativeDurationError<T>) -> Self {
        Self::NegativeDuration(err)
    }
}

impl<T: SolverVariable> From<InvertedBoundsError<Duration<T>>> for PodConfigError<T> {
    fn from(err: InvertedBoundsError<Duration<T>>) -> Self {
        Self::InvertedDurationBounds(err)
    }
}

impl<T: SolverVariable> From<InvertedBoundsError<usize>> for PodConfigError<T> {
    fn from(err: InvertedBoundsError<usize>) -> Self {
        Self::InvertedAdCount(err)
    }
}

impl<T: SolverVariable> From<ZeroMinAdsError> for PodConfigError<T> {
    fn from(err: ZeroMinAdsError) -> Self {
        Self::ZeroMinAds(err)
    }
}

impl<T: SolverVariable> From<InvalidGranularityError<T>> for PodConfigError<T> {
    fn from(err: InvalidGranularityError<T>) -> Self {
        Self::InvalidGranularity(err)
    }
}
